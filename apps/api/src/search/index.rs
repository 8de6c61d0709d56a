//! In-memory inverted index over candidates.
//!
//! Scoring for a candidate `d` and deduplicated query terms `T`:
//!
//! ```text
//! score(d) = Σ_{t∈T} idf(t) · Σ_f w_f · (1 + ln tf(f, t, d))     (only fields with tf > 0)
//! idf(t)   = ln(1 + N / df(t))
//! ```
//!
//! Field weights: name = 3, skills = 2, full text = 1. There is no length
//! normalization, so an extra occurrence of a query term can only raise a
//! candidate's score, and each matched term contributes a positive amount.

use std::collections::HashMap;

use uuid::Uuid;

use super::tokenize::tokenize;
use crate::models::candidate::{Candidate, SearchResult};

const NAME_WEIGHT: f64 = 3.0;
const SKILLS_WEIGHT: f64 = 2.0;
const TEXT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default)]
struct FieldFrequencies {
    name: u32,
    skills: u32,
    text: u32,
}

impl FieldFrequencies {
    fn weighted(&self) -> f64 {
        NAME_WEIGHT * dampen(self.name)
            + SKILLS_WEIGHT * dampen(self.skills)
            + TEXT_WEIGHT * dampen(self.text)
    }
}

fn dampen(tf: u32) -> f64 {
    if tf == 0 {
        0.0
    } else {
        1.0 + f64::from(tf).ln()
    }
}

/// What the index keeps per candidate: enough to answer a search without
/// touching the store.
#[derive(Debug, Clone)]
struct IndexedCandidate {
    seq: u64,
    full_name: Option<String>,
    email: Option<String>,
    summary: String,
    skills: Vec<String>,
    terms: Vec<String>,
}

impl IndexedCandidate {
    fn to_result(&self, id: Uuid, score: f64) -> SearchResult {
        SearchResult {
            id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            summary: self.summary.clone(),
            skills: self.skills.clone(),
            score,
        }
    }
}

#[derive(Debug, Default)]
pub struct InvertedIndex {
    candidates: HashMap<Uuid, IndexedCandidate>,
    postings: HashMap<String, HashMap<Uuid, FieldFrequencies>>,
    next_seq: u64,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Indexes a candidate. Re-inserting an id replaces the previous entry.
    pub fn insert(&mut self, candidate: &Candidate) {
        self.remove(candidate.id);

        let mut frequencies: HashMap<String, FieldFrequencies> = HashMap::new();
        if let Some(name) = &candidate.full_name {
            for term in tokenize(name) {
                frequencies.entry(term).or_default().name += 1;
            }
        }
        for skill in &candidate.skills {
            for term in tokenize(skill) {
                frequencies.entry(term).or_default().skills += 1;
            }
        }
        for term in tokenize(&candidate.full_text) {
            frequencies.entry(term).or_default().text += 1;
        }

        let mut terms = Vec::with_capacity(frequencies.len());
        for (term, freq) in frequencies {
            self.postings
                .entry(term.clone())
                .or_default()
                .insert(candidate.id, freq);
            terms.push(term);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.candidates.insert(
            candidate.id,
            IndexedCandidate {
                seq,
                full_name: candidate.full_name.clone(),
                email: candidate.primary_email().map(str::to_string),
                summary: candidate.summary.clone(),
                skills: candidate.skills.clone(),
                terms,
            },
        );
    }

    /// Drops a candidate from the index. Returns whether it was present.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let Some(indexed) = self.candidates.remove(&id) else {
            return false;
        };
        for term in &indexed.terms {
            if let Some(posting) = self.postings.get_mut(term) {
                posting.remove(&id);
                if posting.is_empty() {
                    self.postings.remove(term);
                }
            }
        }
        true
    }

    /// Ranked disjunctive search over already-tokenized, deduplicated terms.
    pub fn search(&self, terms: &[String], limit: usize) -> Vec<SearchResult> {
        if terms.is_empty() || limit == 0 {
            return Vec::new();
        }

        let total = self.candidates.len() as f64;
        let mut scores: HashMap<Uuid, f64> = HashMap::new();
        for term in terms {
            let Some(posting) = self.postings.get(term) else {
                continue;
            };
            let idf = (1.0 + total / posting.len() as f64).ln();
            for (id, freq) in posting {
                *scores.entry(*id).or_default() += idf * freq.weighted();
            }
        }

        let mut ranked: Vec<(Uuid, f64, u64)> = scores
            .into_iter()
            .filter_map(|(id, score)| self.candidates.get(&id).map(|c| (id, score, c.seq)))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.2.cmp(&b.2))
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(limit);

        ranked
            .into_iter()
            .filter_map(|(id, score, _)| {
                self.candidates
                    .get(&id)
                    .map(|c| c.to_result(id, score))
            })
            .collect()
    }

    /// Candidates whose skill list contains `skill` (case-insensitive), oldest first.
    pub fn with_skill(&self, skill: &str, limit: usize) -> Vec<SearchResult> {
        let mut matches: Vec<(&Uuid, &IndexedCandidate)> = self
            .candidates
            .iter()
            .filter(|(_, c)| c.skills.iter().any(|s| s.eq_ignore_ascii_case(skill)))
            .collect();
        matches.sort_by(|a, b| a.1.seq.cmp(&b.1.seq).then_with(|| a.0.cmp(b.0)));
        matches
            .into_iter()
            .take(limit)
            .map(|(id, c)| c.to_result(*id, 1.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::search::tokenize::query_terms;

    fn candidate(name: &str, skills: &[&str], text: &str) -> Candidate {
        Candidate {
            id: Uuid::new_v4(),
            full_name: Some(name.to_string()),
            emails: vec![format!("{}@example.com", name.to_lowercase().replace(' ', "."))],
            phones: vec![],
            skills: skills.iter().map(|s| s.to_string()).collect(),
            education: vec![],
            experience: vec![],
            summary: text.chars().take(40).collect(),
            full_text: text.to_string(),
            created_at: Utc::now(),
        }
    }

    fn index_of(candidates: &[Candidate]) -> InvertedIndex {
        let mut index = InvertedIndex::new();
        for c in candidates {
            index.insert(c);
        }
        index
    }

    fn ids(results: &[SearchResult]) -> Vec<Uuid> {
        results.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_only_matching_candidates_are_returned() {
        let go = candidate("Ada Lovelace", &["Go"], "Backend services in Go and SQL");
        let py = candidate("Grace Hopper", &["Python"], "Data pipelines in Python");
        let index = index_of(&[go.clone(), py]);

        let results = index.search(&query_terms("Go"), 10);
        assert_eq!(ids(&results), vec![go.id]);
        assert_eq!(results[0].email.as_deref(), Some("ada.lovelace@example.com"));
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn test_name_outranks_body_mention() {
        let named = candidate("Rust Cohle", &[], "Detective");
        let mentioned = candidate("Marty Hart", &[], "Knows a little rust");
        let index = index_of(&[mentioned.clone(), named.clone()]);

        assert_eq!(
            ids(&index.search(&query_terms("rust"), 10)),
            vec![named.id, mentioned.id]
        );
    }

    #[test]
    fn test_more_matched_terms_rank_higher() {
        let both = candidate("A", &["Go", "Kubernetes"], "Go and Kubernetes");
        let one = candidate("B", &["Go"], "Go only");
        let index = index_of(&[one.clone(), both.clone()]);

        assert_eq!(
            ids(&index.search(&query_terms("go kubernetes"), 10)),
            vec![both.id, one.id]
        );
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let first = candidate("A", &[], "terraform");
        let second = candidate("B", &[], "terraform");
        let index = index_of(&[first.clone(), second.clone()]);

        for _ in 0..5 {
            assert_eq!(
                ids(&index.search(&query_terms("terraform"), 10)),
                vec![first.id, second.id]
            );
        }
    }

    #[test]
    fn test_adding_a_term_never_lowers_rank() {
        let query = query_terms("python docker");
        let mut target = candidate("T", &[], "python");
        let others = vec![
            candidate("O1", &[], "python python"),
            candidate("O2", &[], "python"),
            candidate("O3", &[], "java"),
        ];

        let mut all = others.clone();
        all.push(target.clone());
        let before = index_of(&all).search(&query, 10);
        let score_before = before.iter().find(|r| r.id == target.id).unwrap().score;

        target.full_text.push_str(" docker");
        let mut all = others.clone();
        all.push(target.clone());
        let after = index_of(&all).search(&query, 10);
        let rank_after = after.iter().position(|r| r.id == target.id).unwrap();
        let score_after = after[rank_after].score;

        assert!(score_after > score_before);
        // Nobody without "docker" may now sit above the target.
        for r in &after[..rank_after] {
            let other = others.iter().find(|o| o.id == r.id).unwrap();
            assert!(other.full_text.contains("docker"));
        }
        assert_eq!(rank_after, 0);
    }

    #[test]
    fn test_remove_drops_candidate_and_postings() {
        let a = candidate("A", &["Go"], "go");
        let mut index = index_of(&[a.clone()]);

        assert!(index.remove(a.id));
        assert!(!index.remove(a.id));
        assert!(index.search(&query_terms("go"), 10).is_empty());
        assert!(index.postings.is_empty());
    }

    #[test]
    fn test_reinsert_replaces_entry() {
        let mut a = candidate("A", &[], "haskell");
        let mut index = index_of(&[a.clone()]);
        a.full_text = "ocaml".to_string();
        index.insert(&a);

        assert_eq!(index.len(), 1);
        assert!(index.search(&query_terms("haskell"), 10).is_empty());
        assert_eq!(ids(&index.search(&query_terms("ocaml"), 10)), vec![a.id]);
    }

    #[test]
    fn test_limit_truncates() {
        let cs: Vec<_> = (0..5).map(|i| candidate(&format!("C{i}"), &[], "elixir")).collect();
        let index = index_of(&cs);
        assert_eq!(index.search(&query_terms("elixir"), 3).len(), 3);
        assert!(index.search(&query_terms("elixir"), 0).is_empty());
    }

    #[test]
    fn test_with_skill_is_case_insensitive_and_ordered() {
        let a = candidate("A", &["Python"], "");
        let b = candidate("B", &["Go"], "");
        let c = candidate("C", &["python"], "");
        let index = index_of(&[a.clone(), b, c.clone()]);

        assert_eq!(ids(&index.with_skill("PYTHON", 10)), vec![a.id, c.id]);
    }
}
