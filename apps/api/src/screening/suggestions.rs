/// Feedback for a scored candidate: the first few missing skills, then exactly one
/// tier of advice chosen by the CRS.
pub fn generate_suggestions(missing_skills: &[String], crs: f64) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !missing_skills.is_empty() {
        let top: Vec<&str> = missing_skills.iter().take(3).map(|s| s.as_str()).collect();
        suggestions.push(format!("Learn missing skills: {}", top.join(", ")));
    }

    if crs < 50.0 {
        suggestions.push("Build 2-3 real-world projects to improve project relevance score".to_string());
        suggestions.push("Complete relevant online certifications on Coursera or Udemy".to_string());
    } else if crs < 75.0 {
        suggestions.push("Strengthen your portfolio with more domain-specific projects".to_string());
        suggestions.push("Consider getting an industry-recognized certification".to_string());
    } else {
        suggestions.push("Strong profile! Focus on competitive programming to stand out".to_string());
        suggestions.push("Contribute to open-source to boost visibility".to_string());
    }

    suggestions
}
