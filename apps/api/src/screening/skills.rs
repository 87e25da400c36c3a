//! Pulls canonical skill names out of free text.
//!
//! Matching is a case-insensitive substring search against a fixed vocabulary,
//! so short terms such as "go" also hit inside longer words.

use std::collections::BTreeSet;

/// Hand-curated vocabulary of technologies, frameworks and practice areas (lower case).
const KNOWN_SKILLS: &[&str] = &[
    // languages
    "python",
    "java",
    "javascript",
    "typescript",
    "golang",
    "go",
    "c++",
    "c#",
    "php",
    "kotlin",
    "swift",
    "embedded c",
    "matlab",
    "verilog",
    "bash",
    "shell scripting",
    // web and app frameworks
    "react",
    "vue",
    "angular",
    "next.js",
    "node.js",
    "express",
    "django",
    "flask",
    "fastapi",
    "spring",
    "spring boot",
    "hibernate",
    "laravel",
    "react native",
    "flutter",
    "android",
    "ios",
    "html",
    "css",
    "bootstrap",
    "tailwind",
    "socket.io",
    "websocket",
    // data stores and messaging
    "sql",
    "mysql",
    "postgresql",
    "mongodb",
    "redis",
    "elasticsearch",
    "kafka",
    "celery",
    // cloud and delivery
    "docker",
    "kubernetes",
    "aws",
    "azure",
    "gcp",
    "terraform",
    "jenkins",
    "ci/cd",
    "devops",
    "git",
    "linux",
    // ml and data
    "machine learning",
    "deep learning",
    "nlp",
    "computer vision",
    "pytorch",
    "tensorflow",
    "pandas",
    "numpy",
    "scikit-learn",
    "transformers",
    "hugging face",
    "power bi",
    "tableau",
    "data analysis",
    "statistics",
    // architecture and fundamentals
    "rest api",
    "graphql",
    "grpc",
    "microservices",
    "system design",
    "data structures",
    "algorithms",
    "oop",
    "agile",
    "scrum",
    // security
    "cybersecurity",
    "ethical hacking",
    "network security",
    // embedded
    "rtos",
    "arduino",
    "raspberry pi",
    "iot",
    "vlsi",
];

/// Returns the canonical (title-cased) form of every vocabulary term found in `text`.
pub fn extract_skills(text: &str) -> BTreeSet<String> {
    let text_lower = text.to_lowercase();
    KNOWN_SKILLS
        .iter()
        .filter(|skill| text_lower.contains(*skill))
        .map(|skill| title_case(skill))
        .collect()
}

/// Upper-cases a letter when it follows a non-letter, lower-cases every other letter.
/// `node.js` becomes `Node.Js`, `ci/cd` becomes `Ci/Cd`.
fn title_case(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    let mut prev_is_letter = false;
    for ch in term.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}
