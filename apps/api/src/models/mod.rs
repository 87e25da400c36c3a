pub mod audit;
pub mod candidate;
pub mod drive;
