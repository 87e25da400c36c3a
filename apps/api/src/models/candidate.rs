use serde::{Deserialize, Serialize};

/// A candidate profile as supplied by the caller.
/// Everything except `id` is optional on the wire and falls back to an empty value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub cgpa: f64,
    #[serde(default)]
    pub active_backlogs: u32,
    #[serde(default)]
    pub graduation_year: Option<i32>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Candidate {
    /// Resume text, if the candidate supplied a non-blank one.
    pub fn resume(&self) -> Option<&str> {
        self.resume_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    pub fn has_phone(&self) -> bool {
        self.phone
            .as_deref()
            .map(|p| !p.trim().is_empty())
            .unwrap_or(false)
    }
}
