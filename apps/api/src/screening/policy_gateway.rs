//! Policy Gateway — deterministic hard-rule eligibility check.
//!
//! Runs before any fitness scoring. Every rule is evaluated so the explanation
//! is always complete; the overall verdict is the AND of all rules.
//! Location and package range are informational only (see `summarize_policy`).

use serde::{Deserialize, Serialize};

use crate::models::candidate::Candidate;
use crate::models::drive::Drive;

pub const RULE_MIN_CGPA: &str = "Minimum CGPA";
pub const RULE_ACTIVE_BACKLOGS: &str = "Active Backlogs";
pub const RULE_BRANCH: &str = "Branch Eligibility";

/// The value side of a rule check, kept typed so it serializes as a plain JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Count(u32),
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleCheck {
    pub rule: String,
    pub required: RuleValue,
    pub actual: RuleValue,
    pub passed: bool,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub passed: bool,
    pub checks: Vec<RuleCheck>,
    pub reasoning: String,
    pub failed_rules: Vec<String>,
}

/// Evaluates every hard rule of `drive` against `candidate`. Pure.
pub fn evaluate(candidate: &Candidate, drive: &Drive) -> EligibilityResult {
    let checks = vec![
        check_cgpa(candidate, drive),
        check_backlogs(candidate, drive),
        check_branch(candidate, drive),
    ];

    let failed: Vec<&RuleCheck> = checks.iter().filter(|c| !c.passed).collect();
    let passed = failed.is_empty();

    let reasoning = if passed {
        format!(
            "Candidate '{}' passed all {} policy checks. Proceeding to fitness scoring.",
            candidate.name,
            checks.len()
        )
    } else {
        let reasons: Vec<&str> = failed.iter().map(|c| c.detail.as_str()).collect();
        format!(
            "Candidate '{}' failed {} rule(s): {}. Rejected without fitness scoring.",
            candidate.name,
            failed.len(),
            reasons.join("; ")
        )
    };

    let failed_rules = failed.iter().map(|c| c.rule.clone()).collect();

    EligibilityResult {
        passed,
        checks,
        reasoning,
        failed_rules,
    }
}

fn check_cgpa(candidate: &Candidate, drive: &Drive) -> RuleCheck {
    let required = drive.min_cgpa.unwrap_or(0.0);
    let passed = candidate.cgpa >= required;
    RuleCheck {
        rule: RULE_MIN_CGPA.to_string(),
        required: RuleValue::Number(required),
        actual: RuleValue::Number(candidate.cgpa),
        passed,
        detail: format!(
            "CGPA {} {} required {}",
            format_decimal(candidate.cgpa),
            if passed { "≥" } else { "<" },
            format_decimal(required)
        ),
    }
}

fn check_backlogs(candidate: &Candidate, drive: &Drive) -> RuleCheck {
    let max_backlogs = drive.max_backlogs.unwrap_or(0);
    let passed = candidate.active_backlogs <= max_backlogs;
    RuleCheck {
        rule: RULE_ACTIVE_BACKLOGS.to_string(),
        required: RuleValue::Text(format!("≤ {max_backlogs}")),
        actual: RuleValue::Count(candidate.active_backlogs),
        passed,
        detail: format!(
            "Candidate has {} backlog(s), max allowed is {}",
            candidate.active_backlogs, max_backlogs
        ),
    }
}

fn check_branch(candidate: &Candidate, drive: &Drive) -> RuleCheck {
    let eligible = &drive.eligible_branches;
    let passed = eligible.is_empty() || eligible.iter().any(|b| *b == candidate.branch);
    let required = if eligible.is_empty() {
        "All".to_string()
    } else {
        eligible.join(", ")
    };
    RuleCheck {
        rule: RULE_BRANCH.to_string(),
        required: RuleValue::Text(required),
        actual: RuleValue::Text(candidate.branch.clone()),
        passed,
        detail: format!(
            "Branch '{}' {} in eligible list",
            candidate.branch,
            if passed { "is" } else { "is NOT" }
        ),
    }
}

/// Human-readable list of a drive's rules. Informational, not authoritative:
/// location and package appear here but are never enforced by `evaluate`.
pub fn summarize_policy(drive: &Drive) -> Vec<String> {
    let mut rules = Vec::new();

    if let Some(min_cgpa) = drive.min_cgpa.filter(|v| *v != 0.0) {
        rules.push(format!("Min CGPA: {}", format_decimal(min_cgpa)));
    }
    if let Some(max_backlogs) = drive.max_backlogs {
        rules.push(format!("Max Active Backlogs: {max_backlogs}"));
    }
    if !drive.eligible_branches.is_empty() {
        rules.push(format!(
            "Eligible Branches: {}",
            drive.eligible_branches.join(", ")
        ));
    }
    if let Some(location) = drive.location.as_deref().filter(|l| !l.is_empty()) {
        rules.push(format!("Location: {location}"));
    }
    if let (Some(min), Some(max)) = (
        drive.package_min.filter(|v| *v != 0.0),
        drive.package_max.filter(|v| *v != 0.0),
    ) {
        rules.push(format!(
            "Package: {} - {} LPA",
            format_decimal(min),
            format_decimal(max)
        ));
    }

    rules
}

/// Formats a real so whole numbers keep one decimal place (`6.0`, not `6`).
fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
