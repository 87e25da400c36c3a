use crate::models::candidate::Candidate;

const SKILLS_FULL_POINTS: u32 = 30;
const SKILLS_PARTIAL_POINTS: u32 = 15;
const PROJECTS_POINTS: u32 = 30;
const CERTIFICATIONS_POINTS: u32 = 20;
const PHONE_POINTS: u32 = 10;
const RESUME_POINTS: u32 = 10;
/// Resume text must be longer than this many characters to earn credit.
const RESUME_MIN_CHARS: usize = 100;

/// Profile completeness in [0, 1] from an additive 100-point checklist.
pub fn compute_completeness(candidate: &Candidate) -> f64 {
    let mut points = 0;

    points += match candidate.skills.len() {
        0 => 0,
        1 | 2 => SKILLS_PARTIAL_POINTS,
        _ => SKILLS_FULL_POINTS,
    };
    if !candidate.projects.is_empty() {
        points += PROJECTS_POINTS;
    }
    if !candidate.certifications.is_empty() {
        points += CERTIFICATIONS_POINTS;
    }
    if candidate.has_phone() {
        points += PHONE_POINTS;
    }
    let resume_chars = candidate
        .resume_text
        .as_deref()
        .map(|t| t.chars().count())
        .unwrap_or(0);
    if resume_chars > RESUME_MIN_CHARS {
        points += RESUME_POINTS;
    }

    f64::from(points) / 100.0
}
