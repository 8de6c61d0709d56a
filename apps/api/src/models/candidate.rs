use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One education segment. `None` means the field could not be found,
/// which is different from a present-but-empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: Option<String>,
    pub institution: Option<String>,
    /// Source lines of the segment, joined with a single space.
    #[serde(default)]
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub raw: String,
}

/// Output of the field parser. Everything a `Candidate` carries except the
/// identity the store assigns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub full_name: Option<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub summary: String,
    pub full_text: String,
}

/// A stored, immutable resume record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub summary: String,
    pub full_text: String,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    /// Binds a parsed record to a freshly allocated identity.
    pub fn from_parsed(parsed: ParsedResume, id: Uuid, created_at: DateTime<Utc>) -> Self {
        let ParsedResume {
            full_name,
            emails,
            phones,
            skills,
            education,
            experience,
            summary,
            full_text,
        } = parsed;
        Self {
            id,
            full_name,
            emails,
            phones,
            skills,
            education,
            experience,
            summary,
            full_text,
            created_at,
        }
    }

    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(String::as_str)
    }
}

/// One ranked hit returned by `GET /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub summary: String,
    pub skills: Vec<String>,
    pub score: f64,
}

/// Listing entry for `GET /candidates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub summary: String,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Candidate> for CandidateSummary {
    fn from(candidate: Candidate) -> Self {
        Self {
            email: candidate.primary_email().map(str::to_string),
            id: candidate.id,
            full_name: candidate.full_name,
            summary: candidate.summary,
            skills: candidate.skills,
            created_at: candidate.created_at,
        }
    }
}
