//! State of the hero search box: query editing, debounce, the current
//! ranking, keyboard highlight, selection and remote-rank staleness.
//!
//! Every edit supersedes whatever ranking request is outstanding: its
//! cancellation token fires and the generation moves on, so a late answer
//! can never overwrite newer results.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::core::rerank::RemoteHit;
use crate::core::search::{self, Ranking, SearchCandidate};

/// Number of suggestions shown under the input.
pub const VISIBLE_RESULTS: usize = 5;

/// A remote ranking request the caller should start.
#[derive(Debug, Clone)]
pub struct RankJob {
    pub generation: u64,
    pub query: String,
    pub token: CancellationToken,
}

pub struct SearchSession {
    query: String,
    candidates: Arc<Vec<SearchCandidate>>,
    results: Ranking,
    /// Position inside the visible slice.
    highlight: usize,
    /// Candidate index of the committed result.
    selected: Option<usize>,
    focused: bool,
    open: bool,
    dirty_since: Option<Instant>,
    debounce: Duration,
    generation: u64,
    in_flight: Option<CancellationToken>,
    committed_url: Option<String>,
}

impl SearchSession {
    pub fn new(candidates: Vec<SearchCandidate>, debounce: Duration) -> Self {
        let results = (0..candidates.len()).collect();
        Self {
            query: String::new(),
            candidates: Arc::new(candidates),
            results,
            highlight: 0,
            selected: None,
            focused: false,
            open: false,
            dirty_since: None,
            debounce,
            generation: 0,
            in_flight: None,
            committed_url: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> Arc<Vec<SearchCandidate>> {
        Arc::clone(&self.candidates)
    }

    pub fn results(&self) -> &[usize] {
        &self.results
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn selected(&self) -> Option<&SearchCandidate> {
        self.selected.and_then(|i| self.candidates.get(i))
    }

    /// `true` while a remote ranking for the current query is outstanding.
    pub fn is_refining(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn committed_url(&self) -> Option<&str> {
        self.committed_url.as_deref()
    }

    // ── editing ─────────────────────────────────────────────────

    pub fn focus(&mut self) {
        self.focused = true;
        self.open = true;
    }

    pub fn input_char(&mut self, c: char, now: Instant) {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.set_query(query, now);
    }

    pub fn backspace(&mut self, now: Instant) {
        let mut query = std::mem::take(&mut self.query);
        if query.pop().is_none() {
            self.query = query;
            return;
        }
        self.set_query(query, now);
    }

    /// Replace the query as if the user typed it.  Clears the selection and
    /// schedules a debounced evaluation.
    pub fn set_query(&mut self, query: String, now: Instant) {
        self.query = query;
        self.selected = None;
        self.open = true;
        self.supersede();
        self.dirty_since = Some(now);
    }

    /// Whether the input has been idle long enough to rank.
    pub fn due(&self, now: Instant) -> bool {
        self.dirty_since
            .is_some_and(|since| now.saturating_duration_since(since) >= self.debounce)
    }

    /// Rank the current query locally and, when `remote` is set and the
    /// query is not blank, hand back a remote job to run.
    pub fn evaluate(&mut self, remote: bool) -> Option<RankJob> {
        self.dirty_since = None;
        self.supersede();
        self.highlight = 0;

        if self.query.trim().is_empty() {
            self.results = (0..self.candidates.len()).collect();
            self.selected = None;
            return None;
        }

        self.results = search::local_rank(&self.query, &self.candidates);
        if !remote || self.candidates.is_empty() {
            return None;
        }

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        Some(RankJob {
            generation: self.generation,
            query: self.query.clone(),
            token,
        })
    }

    /// Apply the outcome of a remote ranking.  `None` means it failed; the
    /// local order stays.  Returns `false` when the answer is stale.
    pub fn apply_remote(&mut self, generation: u64, hits: Option<Vec<RemoteHit>>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "dropping stale remote ranking"
            );
            return false;
        }
        self.in_flight = None;
        let Some(order) = hits.and_then(|h| search::merge_remote(&h, &self.candidates)) else {
            tracing::debug!("remote ranking unusable, keeping local order");
            return true;
        };
        self.results = order;
        self.highlight = 0;
        true
    }

    fn supersede(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    // ── suggestions ─────────────────────────────────────────────

    /// The top results shown under the input (empty while closed).
    pub fn visible(&self) -> Vec<&SearchCandidate> {
        if !self.open {
            return Vec::new();
        }
        self.results
            .iter()
            .take(VISIBLE_RESULTS)
            .filter_map(|&i| self.candidates.get(i))
            .collect()
    }

    fn visible_len(&self) -> usize {
        if self.open {
            self.results.len().min(VISIBLE_RESULTS)
        } else {
            0
        }
    }

    pub fn highlight_next(&mut self) {
        let n = self.visible_len();
        if n > 0 {
            self.highlight = (self.highlight + 1) % n;
        }
    }

    pub fn highlight_prev(&mut self) {
        let n = self.visible_len();
        if n > 0 {
            self.highlight = (self.highlight + n - 1) % n;
        }
    }

    /// Commit the highlighted suggestion.
    pub fn commit(&mut self) -> Option<SearchCandidate> {
        self.commit_visible(self.highlight)
    }

    /// Commit the suggestion at `row` of the visible list: the input takes
    /// its display label and the list closes.
    pub fn commit_visible(&mut self, row: usize) -> Option<SearchCandidate> {
        if row >= self.visible_len() {
            return None;
        }
        let idx = *self.results.get(row)?;
        let candidate = self.candidates.get(idx)?.clone();

        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.generation = self.generation.wrapping_add(1);
        self.dirty_since = None;
        self.query = candidate.display_label();
        self.selected = Some(idx);
        self.open = false;
        self.highlight = 0;
        self.committed_url = Some(candidate.url.clone());
        tracing::debug!(id = %candidate.id, "search result committed");
        Some(candidate)
    }

    /// Close the list and leave the input.
    pub fn dismiss(&mut self) {
        self.open = false;
        self.focused = false;
        self.highlight = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::search::social;

    fn session() -> SearchSession {
        SearchSession::new(
            vec![
                social("tw", "Twitter", "@me"),
                social("gh", "GitHub", "@me"),
                social("tg", "Telegram", "@me"),
            ],
            Duration::from_millis(300),
        )
    }

    fn type_str(s: &mut SearchSession, text: &str, now: Instant) {
        for c in text.chars() {
            s.input_char(c, now);
        }
    }

    fn hit(id: &str) -> RemoteHit {
        RemoteHit {
            id: id.into(),
            score: None,
            reason: None,
        }
    }

    fn visible_ids(s: &SearchSession) -> Vec<String> {
        s.visible().iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn waits_for_idle_input() {
        let mut s = session();
        let t0 = Instant::now();
        type_str(&mut s, "gi", t0);
        assert!(!s.due(t0 + Duration::from_millis(299)));
        assert!(s.due(t0 + Duration::from_millis(300)));

        s.input_char('t', t0 + Duration::from_millis(200));
        assert!(!s.due(t0 + Duration::from_millis(400)));
        assert!(s.due(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn local_rank_then_commit() {
        let mut s = session();
        s.focus();
        type_str(&mut s, "git", Instant::now());
        assert!(s.evaluate(false).is_none());
        assert_eq!(visible_ids(&s), vec!["gh", "tw", "tg"]);

        let chosen = s.commit().unwrap();
        assert_eq!(chosen.id, "gh");
        assert_eq!(s.query(), "GitHub @me");
        assert!(!s.is_open());
        assert!(s.visible().is_empty());
        assert_eq!(s.selected().map(|c| c.id.as_str()), Some("gh"));
        assert_eq!(s.committed_url(), Some("https://example.com/gh"));
    }

    #[test]
    fn editing_clears_selection() {
        let mut s = session();
        s.focus();
        type_str(&mut s, "git", Instant::now());
        s.evaluate(false);
        s.commit();
        s.backspace(Instant::now());
        assert!(s.selected().is_none());
        assert!(s.is_open());
    }

    #[test]
    fn blank_query_restores_original_order() {
        let mut s = session();
        s.focus();
        type_str(&mut s, "git", Instant::now());
        s.evaluate(true);
        s.set_query("   ".into(), Instant::now());
        assert!(s.evaluate(true).is_none());
        assert_eq!(s.results(), &[0, 1, 2]);
        assert!(!s.is_refining());
    }

    #[test]
    fn highlight_wraps_both_ways() {
        let mut s = session();
        s.focus();
        s.evaluate(false);
        assert_eq!(s.highlight(), 0);
        s.highlight_prev();
        assert_eq!(s.highlight(), 2);
        s.highlight_next();
        assert_eq!(s.highlight(), 0);
        s.highlight_next();
        s.highlight_next();
        s.highlight_next();
        assert_eq!(s.highlight(), 0);
    }

    #[test]
    fn later_query_wins_over_late_answer() {
        let mut s = session();
        s.focus();
        type_str(&mut s, "t", Instant::now());
        let first = s.evaluate(true).unwrap();
        s.input_char('g', Instant::now());
        assert!(first.token.is_cancelled());
        let second = s.evaluate(true).unwrap();
        assert!(s.is_refining());

        assert!(s.apply_remote(second.generation, Some(vec![hit("tg")])));
        assert!(!s.is_refining());
        assert_eq!(visible_ids(&s)[0], "tg");

        assert!(!s.apply_remote(first.generation, Some(vec![hit("tw")])));
        assert_eq!(visible_ids(&s)[0], "tg");
    }

    #[test]
    fn failed_remote_keeps_local_order() {
        let mut s = session();
        s.focus();
        type_str(&mut s, "git", Instant::now());
        let job = s.evaluate(true).unwrap();
        let local = s.results().to_vec();
        assert!(s.apply_remote(job.generation, None));
        assert_eq!(s.results(), local.as_slice());

        let job = {
            s.set_query("git".into(), Instant::now());
            s.evaluate(true).unwrap()
        };
        assert!(s.apply_remote(job.generation, Some(vec![hit("unknown")])));
        assert_eq!(s.results(), local.as_slice());
    }

    #[test]
    fn commit_cancels_outstanding_rank() {
        let mut s = session();
        s.focus();
        type_str(&mut s, "g", Instant::now());
        let job = s.evaluate(true).unwrap();
        s.commit_visible(1);
        assert!(job.token.is_cancelled());
        assert!(!s.apply_remote(job.generation, Some(vec![hit("tw")])));
    }

    #[test]
    fn dismiss_blurs_and_closes() {
        let mut s = session();
        s.focus();
        s.dismiss();
        assert!(!s.is_focused());
        assert!(s.visible().is_empty());
        assert!(s.commit().is_none());
    }
}
