//! Background remote ranking jobs to keep the UI loop responsive.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::search::RankJob;
use crate::core::rerank::{RemoteHit, Reranker};
use crate::core::search::SearchCandidate;

/// Result of one remote ranking, tagged with the generation it was issued
/// for.  `hits` is `None` when the call failed.
#[derive(Debug)]
pub struct RankUpdate {
    pub generation: u64,
    pub hits: Option<Vec<RemoteHit>>,
}

/// Run `job` on the runtime.  A cancelled job sends nothing.
pub fn spawn_rank_job(
    tx: mpsc::UnboundedSender<RankUpdate>,
    reranker: Arc<dyn Reranker>,
    candidates: Arc<Vec<SearchCandidate>>,
    job: RankJob,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let RankJob {
            generation,
            query,
            token,
        } = job;

        let result = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(generation, "remote ranking cancelled");
                return;
            }
            result = reranker.rerank(&query, &candidates) => result,
        };

        let hits = match result {
            Ok(hits) => {
                tracing::debug!(generation, count = hits.len(), "remote ranking received");
                Some(hits)
            }
            Err(e) => {
                tracing::warn!("remote ranking failed: {e}");
                None
            }
        };
        let _ = tx.send(RankUpdate { generation, hits });
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::app::search::SearchSession;
    use crate::core::rerank::RerankError;
    use crate::core::search::social;

    /// Answers with the candidates in reverse order after `delay`.
    struct Reverse {
        delay: Duration,
    }

    #[async_trait]
    impl Reranker for Reverse {
        async fn rerank(
            &self,
            _query: &str,
            candidates: &[SearchCandidate],
        ) -> Result<Vec<RemoteHit>, RerankError> {
            tokio::time::sleep(self.delay).await;
            Ok(candidates
                .iter()
                .rev()
                .map(|c| RemoteHit {
                    id: c.id.clone(),
                    score: None,
                    reason: None,
                })
                .collect())
        }
    }

    struct Failing;

    #[async_trait]
    impl Reranker for Failing {
        async fn rerank(
            &self,
            _query: &str,
            _candidates: &[SearchCandidate],
        ) -> Result<Vec<RemoteHit>, RerankError> {
            Err(RerankError::Status {
                status: 500,
                body: "boom".into(),
            })
        }
    }

    fn candidates() -> Arc<Vec<SearchCandidate>> {
        Arc::new(vec![social("gh", "GitHub", "@me"), social("tw", "Twitter", "@me")])
    }

    fn job(generation: u64) -> RankJob {
        RankJob {
            generation,
            query: "git".into(),
            token: CancellationToken::new(),
        }
    }

    #[tokio::test]
    async fn success_reports_hits() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reranker: Arc<dyn Reranker> = Arc::new(Reverse {
            delay: Duration::ZERO,
        });
        spawn_rank_job(tx, reranker, candidates(), job(7)).await.unwrap();

        let update = rx.recv().await.unwrap();
        assert_eq!(update.generation, 7);
        let ids: Vec<String> = update.hits.unwrap().into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["tw", "gh"]);
    }

    #[tokio::test]
    async fn failure_reports_none() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_rank_job(tx, Arc::new(Failing), candidates(), job(1))
            .await
            .unwrap();
        let update = rx.recv().await.unwrap();
        assert!(update.hits.is_none());
    }

    #[tokio::test]
    async fn cancelled_job_sends_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reranker: Arc<dyn Reranker> = Arc::new(Reverse {
            delay: Duration::from_secs(30),
        });
        let j = job(3);
        let token = j.token.clone();
        let handle = spawn_rank_job(tx, reranker, candidates(), j);
        token.cancel();
        handle.await.unwrap();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn superseded_query_never_wins() {
        let mut session = SearchSession::new(
            vec![social("gh", "GitHub", "@me"), social("tw", "Twitter", "@me")],
            Duration::ZERO,
        );
        session.focus();
        let (tx, mut rx) = mpsc::unbounded_channel();

        session.set_query("g".into(), std::time::Instant::now());
        let first = session.evaluate(true).unwrap();
        let first_generation = first.generation;
        session.set_query("gi".into(), std::time::Instant::now());
        let second = session.evaluate(true).unwrap();

        // The first answer is produced anyway to model a late response.
        let slow: Arc<dyn Reranker> = Arc::new(Reverse {
            delay: Duration::ZERO,
        });
        let late = RankJob {
            token: CancellationToken::new(),
            ..first
        };
        spawn_rank_job(tx.clone(), Arc::clone(&slow), session.candidates(), second)
            .await
            .unwrap();
        spawn_rank_job(tx, slow, session.candidates(), late).await.unwrap();

        let mut applied = Vec::new();
        while let Some(update) = rx.recv().await {
            applied.push(session.apply_remote(update.generation, update.hits));
        }
        assert_eq!(applied, vec![true, false]);
        assert_ne!(first_generation, session.generation());
        assert!(!session.is_refining());
        assert_eq!(session.results(), &[1, 0]);
    }
}
