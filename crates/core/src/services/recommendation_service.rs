use crate::models::holding::MarketCap;
use crate::models::recommendation::{RecommendationSet, RiskCategory, StockCandidate};
use crate::providers::catalog::StaticCatalog;

/// Number of entries in each performer ranking.
const PERFORMER_LIMIT: usize = 5;

/// Filters and ranks investment candidates for a risk category.
///
/// The candidate pool can come from live market data or from the built-in
/// catalog — the selector does not care which, as long as candidates carry
/// quotes where ranking needs them.
pub struct RecommendationService;

impl RecommendationService {
    pub fn new() -> Self {
        Self
    }

    /// Market-cap classes considered suitable for a risk category.
    /// Candidates without a cap classification pass every filter
    /// (externally-fetched pools often arrive unclassified).
    fn allowed_caps(risk: RiskCategory) -> &'static [MarketCap] {
        match risk {
            RiskCategory::Conservative => &[MarketCap::LargeCap, MarketCap::MegaCap],
            RiskCategory::Balanced => {
                &[MarketCap::MidCap, MarketCap::LargeCap, MarketCap::MegaCap]
            }
            RiskCategory::Aggressive => &[MarketCap::SmallCap, MarketCap::MidCap],
        }
    }

    /// How many stock picks each risk category surfaces.
    fn pick_limit(risk: RiskCategory) -> usize {
        match risk {
            RiskCategory::Conservative => 5,
            RiskCategory::Balanced => 8,
            RiskCategory::Aggressive => 10,
        }
    }

    /// Filter `pool` down to the risk category's asset classes, rank the
    /// gainers and losers by percentage change, and attach the catalog's
    /// mutual-fund and bond picks.
    pub fn select(&self, risk: RiskCategory, pool: Vec<StockCandidate>) -> RecommendationSet {
        let allowed = Self::allowed_caps(risk);

        let mut stocks: Vec<StockCandidate> = pool
            .into_iter()
            .filter(|c| match c.market_cap {
                Some(cap) => allowed.contains(&cap),
                None => true,
            })
            .collect();
        stocks.truncate(Self::pick_limit(risk));

        let mut top_performers: Vec<StockCandidate> = stocks
            .iter()
            .filter(|c| c.quote.is_some_and(|q| q.change_percent > 0.0))
            .cloned()
            .collect();
        let mut worst_performers: Vec<StockCandidate> = stocks
            .iter()
            .filter(|c| c.quote.is_some_and(|q| q.change_percent < 0.0))
            .cloned()
            .collect();

        top_performers.sort_by(|a, b| {
            let a_pct = a.quote.map(|q| q.change_percent).unwrap_or(0.0);
            let b_pct = b.quote.map(|q| q.change_percent).unwrap_or(0.0);
            b_pct.partial_cmp(&a_pct).unwrap_or(std::cmp::Ordering::Equal)
        });
        worst_performers.sort_by(|a, b| {
            let a_pct = a.quote.map(|q| q.change_percent).unwrap_or(0.0);
            let b_pct = b.quote.map(|q| q.change_percent).unwrap_or(0.0);
            a_pct.partial_cmp(&b_pct).unwrap_or(std::cmp::Ordering::Equal)
        });
        top_performers.truncate(PERFORMER_LIMIT);
        worst_performers.truncate(PERFORMER_LIMIT);

        RecommendationSet {
            risk_category: risk,
            stocks,
            top_performers,
            worst_performers,
            mutual_funds: StaticCatalog::mutual_funds(risk),
            bonds: StaticCatalog::bonds(risk),
        }
    }
}

impl Default for RecommendationService {
    fn default() -> Self {
        Self::new()
    }
}
