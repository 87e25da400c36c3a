// Screening engine: policy gateway, then fitness scoring for eligible candidates.
// Embedding work goes through crate::embedding only.

pub mod completeness;
pub mod fitness;
pub mod handlers;
pub mod pipeline;
pub mod policy_gateway;
pub mod relevance;
pub mod skills;
pub mod suggestions;
