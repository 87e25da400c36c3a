use serde::{Deserialize, Serialize};

/// Lifecycle of a placement drive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveStatus {
    #[default]
    Active,
    Closed,
    Completed,
}

/// A job requisition candidates are screened against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Drive {
    pub id: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_role: String,
    #[serde(default)]
    pub jd_text: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub min_cgpa: Option<f64>,
    #[serde(default)]
    pub max_backlogs: Option<u32>,
    /// Empty means every branch is eligible.
    #[serde(default)]
    pub eligible_branches: Vec<String>,
    /// Informational only, never enforced by the policy gateway.
    #[serde(default)]
    pub location: Option<String>,
    /// Package range in LPA. Informational only.
    #[serde(default)]
    pub package_min: Option<f64>,
    #[serde(default)]
    pub package_max: Option<f64>,
    #[serde(default)]
    pub drive_date: Option<String>,
    #[serde(default)]
    pub status: DriveStatus,
}

impl Drive {
    /// Job description text, if the drive carries a non-blank one.
    pub fn job_description(&self) -> Option<&str> {
        self.jd_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    pub fn accepts_applications(&self) -> bool {
        self.status == DriveStatus::Active
    }
}
