//! Fitness Aggregator — blends semantic, project and completeness components into the CRS.
//!
//! CRS = semantic × 0.5 + project × 0.3 + completeness × 0.2, every component on 0–100.
//! Callers must only score candidates that passed the policy gateway.

use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingContext;
use crate::models::candidate::Candidate;
use crate::models::drive::Drive;
use crate::screening::completeness::compute_completeness;
use crate::screening::relevance::{project_relevance, similarity};
use crate::screening::suggestions::generate_suggestions;

/// Raw cosine values cluster low; this spreads them across the 0–100 range.
const SEMANTIC_SCALE: f64 = 150.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CrsWeights {
    pub semantic: f64,
    pub project: f64,
    pub completeness: f64,
}

pub const CRS_WEIGHTS: CrsWeights = CrsWeights {
    semantic: 0.5,
    project: 0.3,
    completeness: 0.2,
};

impl CrsWeights {
    pub fn combine(&self, semantic: f64, project: f64, completeness: f64) -> f64 {
        (self.semantic * semantic + self.project * project + self.completeness * completeness)
            .clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    pub crs_score: f64,
    pub semantic_score: f64,
    pub project_score: f64,
    pub completeness_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Scores an eligible candidate against a drive.
pub async fn compute_fitness(
    embeddings: &EmbeddingContext,
    candidate: &Candidate,
    drive: &Drive,
) -> ScoreResult {
    let candidate_text = candidate_text(candidate);
    let drive_text = drive_text(drive);

    // Component 1: semantic match, floored by literal skill overlap
    let sim = similarity(embeddings, &candidate_text, &drive_text).await;
    let mut semantic_score = (sim * SEMANTIC_SCALE).clamp(0.0, 100.0);

    let (matched_skills, missing_skills) =
        partition_skills(&drive.required_skills, &candidate.skills);
    if !drive.required_skills.is_empty() {
        let direct_ratio = matched_skills.len() as f64 / drive.required_skills.len() as f64;
        semantic_score = semantic_score.max(direct_ratio * 100.0);
    }

    // Component 2: project relevance
    let project_score =
        project_relevance(embeddings, &candidate.projects, &drive_text).await * 100.0;

    // Component 3: profile completeness
    let completeness_score = compute_completeness(candidate) * 100.0;

    let crs_score = round1(CRS_WEIGHTS.combine(semantic_score, project_score, completeness_score));
    let suggestions = generate_suggestions(&missing_skills, crs_score);

    ScoreResult {
        crs_score,
        semantic_score: round1(semantic_score),
        project_score: round1(project_score),
        completeness_score: round1(completeness_score),
        matched_skills,
        missing_skills,
        suggestions,
    }
}

/// Resume text when present, otherwise skills and projects run together.
fn candidate_text(candidate: &Candidate) -> String {
    match candidate.resume() {
        Some(resume) => resume.to_string(),
        None => candidate
            .skills
            .iter()
            .chain(candidate.projects.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Job description when present, otherwise the required skills.
fn drive_text(drive: &Drive) -> String {
    match drive.job_description() {
        Some(jd) => jd.to_string(),
        None => drive.required_skills.join(" "),
    }
}

/// Splits required skills into (matched, missing), keeping the drive's order.
///
/// A required skill matches when it equals, contains, or is contained in any
/// candidate skill, ignoring case. Short skills can therefore match inside
/// unrelated longer ones.
pub fn partition_skills(required: &[String], candidate_skills: &[String]) -> (Vec<String>, Vec<String>) {
    let have: Vec<String> = candidate_skills.iter().map(|s| s.to_lowercase()).collect();

    required.iter().cloned().partition(|skill| {
        let want = skill.to_lowercase();
        have.iter()
            .any(|h| *h == want || h.contains(&want) || want.contains(h.as_str()))
    })
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn tcs_drive() -> Drive {
        Drive {
            id: "DRIVE_TCS_2026".to_string(),
            company_name: "TCS".to_string(),
            job_role: "Software Developer".to_string(),
            jd_text: Some(
                "Looking for software developer with strong fundamentals in Python or Java. \
                 Experience with web frameworks (Django/Spring Boot), databases (SQL/NoSQL), \
                 and cloud technologies. Must have good problem-solving skills."
                    .to_string(),
            ),
            required_skills: strings(&["Python", "Java", "SQL", "REST APIs", "Problem Solving"]),
            min_cgpa: Some(6.0),
            max_backlogs: Some(0),
            eligible_branches: strings(&["CSE", "IT", "ECE", "MCA"]),
            ..Default::default()
        }
    }

    fn make_candidate(skills: &[&str], projects: &[&str]) -> Candidate {
        Candidate {
            id: "STU_2024_0099".to_string(),
            name: "Test Candidate".to_string(),
            branch: "CSE".to_string(),
            cgpa: 8.0,
            skills: strings(skills),
            projects: strings(projects),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_matched_and_missing_skills_scenario() {
        let ctx = EmbeddingContext::fallback_only();
        let candidate = make_candidate(&["Python", "Java", "SQL"], &[]);

        let result = compute_fitness(&ctx, &candidate, &tcs_drive()).await;
        assert_eq!(result.matched_skills, strings(&["Python", "Java", "SQL"]));
        assert_eq!(result.missing_skills, strings(&["REST APIs", "Problem Solving"]));
        assert_eq!(
            result.suggestions[0],
            "Learn missing skills: REST APIs, Problem Solving"
        );
        // 3/5 literal overlap floors the semantic component
        assert!(result.semantic_score >= 60.0);
        // no projects → baseline 0.3
        assert_eq!(result.project_score, 30.0);
    }

    #[tokio::test]
    async fn test_scores_are_bounded() {
        let ctx = EmbeddingContext::fallback_only();
        let cases = [
            make_candidate(&[], &[]),
            make_candidate(&["Python", "Java", "SQL", "REST APIs", "Problem Solving"], &["Python Java SQL"]),
            make_candidate(&["Pastry"], &["Wedding cakes"]),
        ];
        for candidate in &cases {
            let r = compute_fitness(&ctx, candidate, &tcs_drive()).await;
            for score in [r.crs_score, r.semantic_score, r.project_score, r.completeness_score] {
                assert!((0.0..=100.0).contains(&score), "score out of range: {score}");
            }
        }
    }

    #[tokio::test]
    async fn test_crs_is_weighted_combination() {
        let ctx = EmbeddingContext::fallback_only();
        let candidate = Candidate {
            certifications: strings(&["Oracle Java SE"]),
            phone: Some("9876543002".to_string()),
            ..make_candidate(&["Java", "Spring Boot", "MySQL"], &["Banking System Backend"])
        };
        let r = compute_fitness(&ctx, &candidate, &tcs_drive()).await;
        let expected = 0.5 * r.semantic_score + 0.3 * r.project_score + 0.2 * r.completeness_score;
        // components are rounded independently of the CRS
        assert!((r.crs_score - expected).abs() <= 0.1 + 1e-9);
        assert_eq!(r.completeness_score, 90.0);
    }

    #[tokio::test]
    async fn test_empty_required_skills_skips_direct_ratio() {
        let ctx = EmbeddingContext::fallback_only();
        let drive = Drive {
            id: "DRIVE_X".to_string(),
            jd_text: Some("underwater basket weaving".to_string()),
            ..Default::default()
        };
        let r = compute_fitness(&ctx, &make_candidate(&["Python"], &[]), &drive).await;
        assert!(r.matched_skills.is_empty());
        assert!(r.missing_skills.is_empty());
        assert_eq!(r.semantic_score, 0.0);
    }

    #[tokio::test]
    async fn test_drive_text_falls_back_to_required_skills() {
        let ctx = EmbeddingContext::fallback_only();
        let drive = Drive {
            id: "DRIVE_X".to_string(),
            required_skills: strings(&["Kotlin", "Android"]),
            ..Default::default()
        };
        let candidate = make_candidate(&["Kotlin", "Android"], &[]);
        let r = compute_fitness(&ctx, &candidate, &drive).await;
        // candidate text "Kotlin Android" equals drive text
        assert_eq!(r.semantic_score, 100.0);
    }

    #[test]
    fn test_partition_is_exact_cover() {
        let required = strings(&["Go", "Distributed Systems", "Kubernetes", "Python"]);
        let have = strings(&["golang", "python", "Docker"]);
        let (matched, missing) = partition_skills(&required, &have);

        assert_eq!(matched.len() + missing.len(), required.len());
        assert!(matched.iter().all(|s| !missing.contains(s)));
        for skill in &required {
            assert!(matched.contains(skill) || missing.contains(skill));
        }
        // "go" is contained in "golang"
        assert_eq!(matched, strings(&["Go", "Python"]));
    }

    #[test]
    fn test_partition_loose_substring_false_positive() {
        // "C" is a substring of "Docker"; the loose rule counts it as matched
        let (matched, missing) = partition_skills(&strings(&["C"]), &strings(&["Docker"]));
        assert_eq!(matched, strings(&["C"]));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum = CRS_WEIGHTS.semantic + CRS_WEIGHTS.project + CRS_WEIGHTS.completeness;
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(CRS_WEIGHTS.combine(200.0, 200.0, 200.0), 100.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(66.66), 66.7);
        assert_eq!(round1(30.0), 30.0);
    }
}
