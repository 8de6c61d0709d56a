//! Skill matching against a configurable vocabulary.
//!
//! Matches are reported in vocabulary order using the vocabulary's spelling,
//! so the output is deterministic regardless of where skills appear in the text.

use regex::{Regex, RegexBuilder};

pub const DEFAULT_SKILLS: &[&str] = &[
    "Python",
    "Java",
    "C++",
    "C#",
    "Go",
    "Rust",
    "JavaScript",
    "TypeScript",
    "Ruby",
    "PHP",
    "Kotlin",
    "Swift",
    "Scala",
    "SQL",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "Flask",
    "Django",
    "FastAPI",
    "Spring Boot",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "HTML",
    "CSS",
    "GraphQL",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "Terraform",
    "Linux",
    "Git",
    "spaCy",
    "NLP",
    "Machine Learning",
    "TensorFlow",
    "PyTorch",
    "Pandas",
];

struct SkillPattern {
    name: String,
    pattern: Regex,
}

/// A compiled skill vocabulary.
pub struct SkillVocabulary {
    skills: Vec<SkillPattern>,
}

impl SkillVocabulary {
    /// Builds a vocabulary. Blank and case-insensitive duplicate entries are dropped,
    /// keeping the first spelling.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: Vec<String> = Vec::new();
        let mut skills = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || seen.contains(&name.to_lowercase()) {
                continue;
            }
            seen.push(name.to_lowercase());
            skills.push(SkillPattern {
                name: name.to_string(),
                pattern: skill_pattern(name),
            });
        }
        Self { skills }
    }

    /// Parses a comma-separated list such as `"Rust, Go, Kubernetes"`.
    pub fn from_csv(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn find_in(&self, text: &str) -> Vec<String> {
        self.skills
            .iter()
            .filter(|s| s.pattern.is_match(text))
            .map(|s| s.name.clone())
            .collect()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS)
    }
}

impl std::fmt::Debug for SkillVocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// `+`, `#` and inner `.` are token characters, so `C++`, `C#` and `Node.js`
/// only match as whole tokens. A `.js` suffix still ends a token, so `Vue`
/// is found in "Vue.js". Very short names ("Go") are matched
/// case-sensitively to avoid hits on ordinary words.
fn skill_pattern(name: &str) -> Regex {
    let pattern = format!(
        r"(?:^|[^A-Za-z0-9+#]){}(?:$|[^A-Za-z0-9+#.]|\.(?:js\b|$|[^A-Za-z0-9]))",
        regex::escape(name)
    );
    let short = name.chars().filter(|c| c.is_alphanumeric()).count() <= 2;
    RegexBuilder::new(&pattern)
        .case_insensitive(!short)
        .build()
        .expect("escaped skill pattern is always valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_matches_common_skills() {
        let vocab = SkillVocabulary::default();
        let found = vocab.find_in("Skills: python, Go, Docker and KUBERNETES.");
        assert_eq!(found, vec!["Python", "Go", "Docker", "Kubernetes"]);
    }

    #[test]
    fn test_output_follows_vocabulary_order() {
        let vocab = SkillVocabulary::new(["Rust", "SQL", "Python"]);
        assert_eq!(
            vocab.find_in("Python first, then SQL, then Rust"),
            vec!["Rust", "SQL", "Python"]
        );
    }

    #[test]
    fn test_symbol_skills_need_token_boundaries() {
        let vocab = SkillVocabulary::new(["C++", "C#", "Node.js", "Java"]);
        assert_eq!(
            vocab.find_in("Wrote C++ and Node.js services"),
            vec!["C++", "Node.js"]
        );
        assert!(vocab.find_in("JavaScript only").is_empty());
        assert!(vocab.find_in("Node.jsx").is_empty());
    }

    #[test]
    fn test_short_skills_are_case_sensitive() {
        let vocab = SkillVocabulary::default();
        assert!(!vocab.find_in("ready to go the extra mile").contains(&"Go".to_string()));
        assert!(vocab.find_in("Services written in Go.").contains(&"Go".to_string()));
        assert!(!vocab.find_in("Google Cloud").contains(&"Go".to_string()));
    }

    #[test]
    fn test_js_suffix_ends_a_token() {
        let vocab = SkillVocabulary::new(["Vue", "React", "Express", "Node.js"]);
        assert_eq!(
            vocab.find_in("Frontends in Vue.js and React.js, APIs on Express.js"),
            vec!["Vue", "React", "Express"]
        );
        assert!(vocab.find_in("Vue.jsx templates").is_empty());
        assert!(vocab.find_in("React.json fixtures").is_empty());
    }

    #[test]
    fn test_csv_vocabulary_dedups_and_trims() {
        let vocab = SkillVocabulary::from_csv(" Rust , rust,, Elixir ");
        assert_eq!(vocab.names().collect::<Vec<_>>(), vec!["Rust", "Elixir"]);
        assert_eq!(vocab.len(), 2);
        assert!(SkillVocabulary::from_csv(" , ,").is_empty());
    }

    #[test]
    fn test_multi_word_skill() {
        let vocab = SkillVocabulary::default();
        assert!(vocab
            .find_in("Interested in machine learning research")
            .contains(&"Machine Learning".to_string()));
    }
}
