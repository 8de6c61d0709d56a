//! Contact details: emails, phone numbers and the candidate's name.

use once_cell::sync::Lazy;
use regex::Regex;

use super::sections::is_heading;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9.+_-]+@[A-Za-z0-9._-]+\.[A-Za-z]+").unwrap());

// Digit runs with common separators; validated by digit count afterwards.
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\+?\(?\d[\d \t().-]{6,}\d").unwrap());

static NAME_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:full\s+)?name\s*[:\-]\s*").unwrap());

static CONTACT_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*[|•·,]\s*|\s+[-–—]\s+").unwrap());

const MIN_PHONE_DIGITS: usize = 9;
const MAX_PHONE_DIGITS: usize = 15;
const NAME_SCAN_LINES: usize = 5;

const DOCUMENT_TITLES: &[&str] = &["resume", "résumé", "cv", "curriculum vitae", "biodata"];

/// All email addresses in order of first appearance, deduplicated ignoring case.
pub fn find_emails(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    let mut emails = Vec::new();
    for m in EMAIL.find_iter(text) {
        let email = m.as_str().trim_start_matches('.');
        let key = email.to_lowercase();
        if !seen.contains(&key) {
            seen.push(key);
            emails.push(email.to_string());
        }
    }
    emails
}

/// Phone numbers in order of first appearance, deduplicated on their digits.
pub fn find_phones(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    let mut phones = Vec::new();
    for m in PHONE.find_iter(text) {
        let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
        if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits.len())
            || is_date_span(m.as_str())
        {
            continue;
        }
        if !seen.contains(&digits) {
            seen.push(digits);
            phones.push(m.as_str().trim().to_string());
        }
    }
    phones
}

/// Digit groups that read as dates: at least one year (19xx/20xx), every
/// other group a day or month. Catches `03.2018 - 05.2020` and
/// `2019-01 - 2021-06`, which carry enough digits to pass as a phone.
fn is_date_span(candidate: &str) -> bool {
    let groups: Vec<&str> = candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    groups.iter().any(|g| is_year(g)) && groups.iter().all(|g| is_year(g) || g.len() <= 2)
}

fn is_year(group: &str) -> bool {
    group.len() == 4 && (group.starts_with("19") || group.starts_with("20"))
}

fn is_contact_line(line: &str) -> bool {
    EMAIL.is_match(line) || !find_phones(line).is_empty()
}

/// Picks the first plausible name among the leading lines, stopping at the
/// first section heading or line with contact details. On a combined line such as
/// `Jane Doe | jane@x.com` only the text before the first separator is tried.
pub fn extract_name(text: &str) -> Option<String> {
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(NAME_SCAN_LINES);

    for line in lines {
        if is_heading(line) {
            break;
        }
        if is_contact_line(line) {
            let head = CONTACT_SEPARATOR.split(line).next().unwrap_or_default();
            return plausible_name(head);
        }
        if let Some(name) = plausible_name(line) {
            return Some(name);
        }
    }
    None
}

fn plausible_name(line: &str) -> Option<String> {
    let candidate = NAME_LABEL.replace(line.trim(), "");
    let words: Vec<&str> = candidate.split_whitespace().collect();

    if words.is_empty() || words.len() > 4 || candidate.chars().count() > 60 {
        return None;
    }
    if DOCUMENT_TITLES.contains(&candidate.to_lowercase().as_str()) {
        return None;
    }
    let name_chars = words
        .iter()
        .all(|w| w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-' | '’')));
    let capitalized = words[0].chars().next().is_some_and(char::is_uppercase);
    if !name_chars || !capitalized {
        return None;
    }
    Some(words.join(" "))
}
