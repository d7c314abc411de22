//! Search candidates and their local lexical ranking.
//!
//! Matching is case-folded substring based.  A ranking is a permutation of
//! indices into the candidate slice; ties keep their original order.

use std::collections::HashSet;

use crate::core::rerank::RemoteHit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    Social,
    Project,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    pub id: String,
    pub name: String,
    /// Username for socials, first tech tag (or empty) for projects.
    pub secondary_label: String,
    pub icon_key: String,
    pub url: String,
    pub kind: CandidateKind,
    pub description: Option<String>,
    pub tech: Vec<String>,
}

impl SearchCandidate {
    /// Text placed in the input once the candidate is chosen.
    pub fn display_label(&self) -> String {
        match self.kind {
            CandidateKind::Social if !self.secondary_label.is_empty() => {
                format!("{} {}", self.name, self.secondary_label)
            }
            _ => self.name.clone(),
        }
    }

    fn haystack(&self) -> String {
        let mut parts = vec![
            self.name.as_str(),
            self.id.as_str(),
            self.secondary_label.as_str(),
        ];
        if let Some(desc) = &self.description {
            parts.push(desc);
        }
        let tech = self.tech.join(" ");
        parts.push(tech.as_str());
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Ordered indices into a candidate slice.
pub type Ranking = Vec<usize>;

/// Lexical score of one candidate.  `needle` must already be trimmed and
/// lower-cased.
pub fn local_score(candidate: &SearchCandidate, needle: &str) -> u32 {
    if needle.is_empty() {
        return 0;
    }
    let haystack = candidate.haystack();
    let mut score = 0;
    if haystack.starts_with(needle) {
        score += 3;
    } else if haystack.contains(needle) {
        score += 1;
    }
    if candidate.name.to_lowercase().starts_with(needle) {
        score += 2;
    }
    if candidate
        .description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(needle))
    {
        score += 2;
    }
    score
}

/// Rank every candidate against `query`.  A blank query keeps the original
/// order.
pub fn local_rank(query: &str, candidates: &[SearchCandidate]) -> Ranking {
    let needle = query.trim().to_lowercase();
    let mut order: Ranking = (0..candidates.len()).collect();
    if needle.is_empty() {
        return order;
    }
    let scores: Vec<u32> = candidates.iter().map(|c| local_score(c, &needle)).collect();
    // `sort_by` is stable, so equal scores keep their input order.
    order.sort_by(|a, b| scores[*b].cmp(&scores[*a]));
    order
}

/// Merge a remote ordering: ids the remote named come first in its order,
/// then every other candidate in original order.  Unknown and duplicate ids
/// are ignored.  `None` when no remote id matched anything.
pub fn merge_remote(hits: &[RemoteHit], candidates: &[SearchCandidate]) -> Option<Ranking> {
    let mut seen = HashSet::new();
    let mut order = Ranking::with_capacity(candidates.len());
    for hit in hits {
        let Some(idx) = candidates.iter().position(|c| c.id == hit.id) else {
            continue;
        };
        if seen.insert(idx) {
            order.push(idx);
        }
    }
    if order.is_empty() {
        return None;
    }
    order.extend((0..candidates.len()).filter(|i| !seen.contains(i)));
    Some(order)
}

#[cfg(test)]
pub(crate) fn social(id: &str, name: &str, username: &str) -> SearchCandidate {
    SearchCandidate {
        id: id.to_string(),
        name: name.to_string(),
        secondary_label: username.to_string(),
        icon_key: id.to_string(),
        url: format!("https://example.com/{id}"),
        kind: CandidateKind::Social,
        description: None,
        tech: Vec::new(),
    }
}
