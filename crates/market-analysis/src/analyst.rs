//! The Analysis Pipeline
//!
//! One query in, one technical snapshot out: Resolve → Fetch → Compute.
//! Stateless between invocations.

use crate::error::Result;
use crate::instrument::{Resolution, Resolver};
use crate::market::MarketDataRouter;
use crate::snapshot::Snapshot;

/// The outcome of one pipeline run.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub resolution: Resolution,
    pub snapshot: Snapshot,
}

impl Analysis {
    /// Human-readable summary: the instrument line plus the rendered
    /// snapshot. Idempotent, like [`Snapshot::render`].
    pub fn summary(&self) -> String {
        let mut text = format!("{}\n", self.resolution.instrument);
        if self.resolution.defaulted {
            text.push_str("(no known asset in the query, showing the default instrument)\n");
        }
        text.push_str(&self.snapshot.render());
        text
    }
}

/// Runs the full pipeline for free-text queries.
pub struct MarketAnalyst {
    resolver: Resolver,
    router: MarketDataRouter,
}

impl MarketAnalyst {
    pub fn new(resolver: Resolver, router: MarketDataRouter) -> Self {
        Self { resolver, router }
    }

    /// Resolve, fetch, and compute for one query.
    ///
    /// Resolution cannot fail (unmatched queries use the default
    /// instrument); everything after it surfaces as a typed error that the
    /// chat layer renders with
    /// [`crate::AnalysisError::unavailable_message`].
    pub async fn analyze(&self, query: &str) -> Result<Analysis> {
        let resolution = self.resolver.resolve(query);

        tracing::debug!(
            query,
            instrument = %resolution.instrument,
            defaulted = resolution.defaulted,
            "resolved query"
        );

        let history = self.router.fetch(&resolution.instrument).await?;
        let snapshot = Snapshot::compute(history.source, &history.bars)?;

        Ok(Analysis { resolution, snapshot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::Venue;
    use crate::market::MockMarketData;
    use std::sync::Arc;

    fn offline_analyst() -> MarketAnalyst {
        let router = MarketDataRouter::new(
            Arc::new(MockMarketData::new()),
            Arc::new(MockMarketData::new()),
        );
        MarketAnalyst::new(Resolver::default(), router)
    }

    #[tokio::test]
    async fn full_pipeline_for_a_crypto_query() {
        let analyst = offline_analyst();
        let analysis = analyst.analyze("btc price").await.unwrap();

        assert_eq!(analysis.resolution.instrument.symbol, "BTC/USDT");
        assert_eq!(analysis.resolution.instrument.venue, Venue::Crypto);
        assert_eq!(analysis.snapshot.source, "mock");
        assert!(analysis.snapshot.stop_loss < analysis.snapshot.price);
    }

    #[tokio::test]
    async fn summary_names_the_instrument() {
        let analyst = offline_analyst();
        let analysis = analyst.analyze("how is tesla doing").await.unwrap();

        let summary = analysis.summary();
        assert!(summary.contains("TSLA"));
        assert!(summary.contains("stop-loss"));
    }

    #[tokio::test]
    async fn unmatched_query_is_flagged_in_the_summary() {
        let analyst = offline_analyst();
        let analysis = analyst.analyze("xyz123").await.unwrap();

        assert!(analysis.resolution.defaulted);
        assert!(analysis.summary().contains("default instrument"));
    }
}
