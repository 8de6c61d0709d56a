//! Field Parser: pattern and heuristic extraction of structured fields from
//! resume text. Parsing never fails; text that matches nothing yields an
//! all-empty record that still carries the full text.

pub mod contact;
pub mod sections;
pub mod skills;

use crate::models::candidate::ParsedResume;

pub use skills::SkillVocabulary;

pub const DEFAULT_SUMMARY_CHARS: usize = 400;

#[derive(Debug)]
pub struct FieldParser {
    vocabulary: SkillVocabulary,
    summary_chars: usize,
}

impl FieldParser {
    pub fn new(vocabulary: SkillVocabulary, summary_chars: usize) -> Self {
        Self {
            vocabulary,
            summary_chars,
        }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn parse(&self, text: &str) -> ParsedResume {
        let sections = sections::split_sections(text);

        ParsedResume {
            full_name: contact::extract_name(text),
            emails: contact::find_emails(text),
            phones: contact::find_phones(text),
            skills: self.vocabulary.find_in(text),
            education: sections::extract_education(&sections),
            experience: sections::extract_experience(&sections),
            summary: summarize(text, self.summary_chars),
            full_text: text.to_string(),
        }
    }
}

impl Default for FieldParser {
    fn default() -> Self {
        Self::new(SkillVocabulary::default(), DEFAULT_SUMMARY_CHARS)
    }
}

/// First `max_chars` characters of the text, trimmed. Cuts on a char boundary.
pub fn summarize(text: &str, max_chars: usize) -> String {
    let end = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].trim().to_string()
}
