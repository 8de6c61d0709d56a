//! Section segmentation plus education/experience extraction.
//!
//! A resume is split into sections by heading lines ("Education",
//! "Work Experience:", ...). Education and experience sections are then cut
//! into segments, one per entry, and each segment is split best-effort
//! into degree/institution or title/company. A segment nothing can be read
//! from still yields an entry with absent sub-fields.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::candidate::{Education, Experience};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    Education,
    Experience,
    Skills,
    Projects,
    Other,
}

/// A run of lines under one heading. `kind == None` is the preamble before
/// the first recognized heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: Option<SectionKind>,
    pub lines: Vec<String>,
}

const HEADINGS: &[(&str, SectionKind)] = &[
    ("summary", SectionKind::Summary),
    ("professional summary", SectionKind::Summary),
    ("profile", SectionKind::Summary),
    ("professional profile", SectionKind::Summary),
    ("objective", SectionKind::Summary),
    ("career objective", SectionKind::Summary),
    ("about me", SectionKind::Summary),
    ("education", SectionKind::Education),
    ("academic background", SectionKind::Education),
    ("academics", SectionKind::Education),
    ("qualifications", SectionKind::Education),
    ("academic qualifications", SectionKind::Education),
    ("educational qualifications", SectionKind::Education),
    ("education and training", SectionKind::Education),
    ("experience", SectionKind::Experience),
    ("work experience", SectionKind::Experience),
    ("professional experience", SectionKind::Experience),
    ("relevant experience", SectionKind::Experience),
    ("employment", SectionKind::Experience),
    ("employment history", SectionKind::Experience),
    ("work history", SectionKind::Experience),
    ("career history", SectionKind::Experience),
    ("skills", SectionKind::Skills),
    ("technical skills", SectionKind::Skills),
    ("key skills", SectionKind::Skills),
    ("core competencies", SectionKind::Skills),
    ("technologies", SectionKind::Skills),
    ("skills and tools", SectionKind::Skills),
    ("projects", SectionKind::Projects),
    ("personal projects", SectionKind::Projects),
    ("selected projects", SectionKind::Projects),
    ("certifications", SectionKind::Other),
    ("certificates", SectionKind::Other),
    ("licenses and certifications", SectionKind::Other),
    ("awards", SectionKind::Other),
    ("achievements", SectionKind::Other),
    ("honors", SectionKind::Other),
    ("publications", SectionKind::Other),
    ("languages", SectionKind::Other),
    ("interests", SectionKind::Other),
    ("hobbies", SectionKind::Other),
    ("references", SectionKind::Other),
    ("volunteering", SectionKind::Other),
    ("volunteer experience", SectionKind::Other),
    ("contact", SectionKind::Other),
    ("contact information", SectionKind::Other),
];

const MONTH: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?";

static DATE_RANGE: Lazy<Regex> = Lazy::new(|| {
    let point = format!(
        r"(?:(?:{MONTH}\s+)?(?:\d{{1,2}}/)?(?:19|20)\d{{2}}|present|current|now|today)"
    );
    Regex::new(&format!(
        r"(?i)\(?\b{point}(?:\s*(?:-|–|—|to|until)\s*{point})?\b\)?"
    ))
    .unwrap()
});

static DEGREE_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:bachelor|master)(?:'?s)?\b|associate(?:'?s)? degree\b|ph\.?\s?d\b|doctorate\b|mba\b|diploma\b|high school\b|[bm]\.?\s?(?:sc|tech|eng)\b|[bm]\.[as]\.)",
    )
    .unwrap()
});

static INSTITUTION_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:university|college|school|institute|academy|polytechnic)\b").unwrap()
});

static EDUCATION_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*[,|–—]\s*|\s+-\s+|\s+(?:at|from)\s+").unwrap());

static TITLE_AT_COMPANY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+(?:at|@)\s+").unwrap());

static EXPERIENCE_PARTS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[,|–—]\s*|\s+-\s+").unwrap());

const MAX_JOB_SIDE_WORDS: usize = 6;
const MAX_HEADER_WORDS: usize = 8;

const BULLETS: &[char] = &['•', '-', '*', '–', '·', '▪', '◦', '●', '►', '✓'];

/// Returns the section a heading line opens, along with any content that
/// follows an inline `Heading: content` form.
pub fn heading(line: &str) -> Option<(SectionKind, Option<&str>)> {
    let line = line.trim().trim_start_matches('#').trim();
    let (head, rest) = match line.split_once(':') {
        Some((head, rest)) => (head, Some(rest.trim()).filter(|r| !r.is_empty())),
        None => (line, None),
    };
    let normalized = head
        .to_lowercase()
        .replace('&', "and")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    HEADINGS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, kind)| (*kind, rest))
}

pub fn is_heading(line: &str) -> bool {
    heading(line).is_some()
}

/// Splits text into sections. Empty lines are dropped; all kept lines are trimmed.
pub fn split_sections(text: &str) -> Vec<Section> {
    let mut sections = vec![Section {
        kind: None,
        lines: Vec::new(),
    }];

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match heading(line) {
            Some((kind, rest)) => sections.push(Section {
                kind: Some(kind),
                lines: rest.map(|r| vec![r.to_string()]).unwrap_or_default(),
            }),
            None => {
                if let Some(current) = sections.last_mut() {
                    current.lines.push(line.to_string());
                }
            }
        }
    }
    sections
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

pub fn extract_education(sections: &[Section]) -> Vec<Education> {
    let found: Vec<&Section> = sections
        .iter()
        .filter(|s| s.kind == Some(SectionKind::Education))
        .collect();

    if found.is_empty() {
        // No heading: only preamble lines that name a degree or school count.
        return sections
            .iter()
            .filter(|s| s.kind.is_none())
            .flat_map(|s| s.lines.iter())
            .filter(|l| DEGREE_KEYWORD.is_match(l) || INSTITUTION_KEYWORD.is_match(l))
            .map(|l| education_from_segment(&[strip_bullet(l)]))
            .collect();
    }

    found
        .iter()
        .flat_map(|s| segment_education(&s.lines))
        .map(|segment| education_from_segment(&segment))
        .collect()
}

fn segment_education(lines: &[String]) -> Vec<Vec<&str>> {
    let mut segments: Vec<Vec<&str>> = Vec::new();
    let mut has_degree = false;
    let mut has_institution = false;

    for line in lines.iter().map(|l| strip_bullet(l)).filter(|l| !l.is_empty()) {
        let degree = DEGREE_KEYWORD.is_match(line);
        let institution = INSTITUTION_KEYWORD.is_match(line);
        let starts_new =
            segments.is_empty() || (degree && has_degree) || (institution && has_institution);

        if starts_new {
            segments.push(vec![line]);
            has_degree = degree;
            has_institution = institution;
        } else if let Some(current) = segments.last_mut() {
            current.push(line);
            has_degree |= degree;
            has_institution |= institution;
        }
    }
    segments
}

fn education_from_segment(lines: &[&str]) -> Education {
    let mut degree = None;
    let mut institution = None;

    for line in lines {
        let cleaned = strip_dates(line);
        for part in EDUCATION_PARTS.split(&cleaned).map(clean_part) {
            if part.is_empty() {
                continue;
            }
            if degree.is_none() && DEGREE_KEYWORD.is_match(part) {
                degree = Some(part.to_string());
            } else if institution.is_none() && INSTITUTION_KEYWORD.is_match(part) {
                institution = Some(part.to_string());
            }
        }
    }

    Education {
        degree,
        institution,
        raw: lines.join(" "),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct ExperienceSegment<'a> {
    header: Vec<&'a str>,
    body: Vec<&'a str>,
    closed: bool,
}

impl<'a> ExperienceSegment<'a> {
    fn raw(&self) -> String {
        self.header
            .iter()
            .chain(self.body.iter())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn extract_experience(sections: &[Section]) -> Vec<Experience> {
    let found: Vec<&Section> = sections
        .iter()
        .filter(|s| s.kind == Some(SectionKind::Experience))
        .collect();

    if found.is_empty() {
        // No heading: any job-shaped line outside education and skills counts.
        return sections
            .iter()
            .filter(|s| !matches!(s.kind, Some(SectionKind::Education | SectionKind::Skills)))
            .flat_map(|s| s.lines.iter())
            .map(|l| strip_bullet(l))
            .filter_map(|l| {
                let (title, company) = job_line(l)?;
                Some(Experience {
                    title: Some(title),
                    company: Some(company),
                    raw: l.to_string(),
                })
            })
            .collect();
    }

    found
        .iter()
        .flat_map(|s| segment_experience(&s.lines))
        .map(|segment| experience_from_segment(&segment))
        .collect()
}

fn segment_experience(lines: &[String]) -> Vec<ExperienceSegment<'_>> {
    let mut segments: Vec<ExperienceSegment<'_>> = Vec::new();

    for line in lines.iter().map(String::as_str) {
        if is_body_line(line) {
            if segments.is_empty() {
                segments.push(ExperienceSegment::default());
            }
            if let Some(current) = segments.last_mut() {
                current.body.push(line);
                current.closed = true;
            }
            continue;
        }

        match segments.last_mut() {
            Some(current) if !current.closed => {
                current.header.push(line);
                current.closed = current.header.len() >= 2 || closes_header(line);
            }
            _ => segments.push(ExperienceSegment {
                header: vec![line],
                body: Vec::new(),
                closed: closes_header(line),
            }),
        }
    }
    segments
}

fn experience_from_segment(segment: &ExperienceSegment<'_>) -> Experience {
    let mut title = None;
    let mut company = None;

    if let Some(first) = segment.header.first() {
        if let Some((t, c)) = split_title_at_company(first) {
            title = Some(t);
            company = Some(c);
        } else {
            let cleaned = strip_dates(first);
            let mut parts = EXPERIENCE_PARTS
                .split(&cleaned)
                .map(clean_part)
                .filter(|p| !p.is_empty());
            title = parts.next().map(str::to_string);
            company = parts.next().map(str::to_string);
        }
        if company.is_none() {
            company = segment
                .header
                .get(1)
                .map(|l| {
                    let cleaned = strip_dates(l);
                    EXPERIENCE_PARTS
                        .split(&cleaned)
                        .map(clean_part)
                        .find(|p| !p.is_empty())
                        .unwrap_or_default()
                        .to_string()
                })
                .filter(|c| !c.is_empty());
        }
    }

    Experience {
        title,
        company,
        raw: segment.raw(),
    }
}

fn split_title_at_company(line: &str) -> Option<(String, String)> {
    let cleaned = strip_dates(line);
    let mut halves = TITLE_AT_COMPANY.splitn(&cleaned, 2);
    let title = clean_part(halves.next()?);
    let company_part = halves.next()?;
    let company = EXPERIENCE_PARTS
        .split(company_part)
        .map(clean_part)
        .find(|p| !p.is_empty())?;
    (!title.is_empty()).then(|| (title.to_string(), company.to_string()))
}

/// A `Title at Company` line whose sides are short enough to be a job
/// rather than a sentence that happens to contain "at".
fn job_line(line: &str) -> Option<(String, String)> {
    let (title, company) = split_title_at_company(line)?;
    let short = |s: &str| s.split_whitespace().count() <= MAX_JOB_SIDE_WORDS;
    (short(&title) && short(&company)).then_some((title, company))
}

/// Lines that describe a job rather than name it: bullets, date lines and
/// long unbulleted prose. A job line is never body, whatever its punctuation.
fn is_body_line(line: &str) -> bool {
    if line.starts_with(BULLETS) || is_date_line(line) {
        return true;
    }
    job_line(line).is_none() && line.split_whitespace().count() > MAX_HEADER_WORDS
}

fn closes_header(line: &str) -> bool {
    TITLE_AT_COMPANY.is_match(line) || DATE_RANGE.is_match(line)
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

pub fn is_date_line(line: &str) -> bool {
    DATE_RANGE.is_match(line)
        && DATE_RANGE
            .replace_all(line, "")
            .chars()
            .all(|c| !c.is_alphanumeric())
}

fn strip_dates(line: &str) -> String {
    DATE_RANGE.replace_all(line, "").into_owned()
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(BULLETS).trim()
}

fn clean_part(part: &str) -> &str {
    part.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '|' | '-' | '–' | '—' | '(' | ')' | ':' | ';'))
}
