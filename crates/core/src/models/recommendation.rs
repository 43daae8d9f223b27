use serde::{Deserialize, Serialize};

use super::holding::MarketCap;
use super::user::RiskAppetite;

/// Risk vocabulary of the recommendation engine.
///
/// Distinct from [`RiskAppetite`] on purpose: profiles say
/// conservative/moderate/aggressive, recommendations say
/// conservative/balanced/aggressive. The `From` impl below is the
/// one translation table between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Conservative,
    Balanced,
    Aggressive,
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskCategory::Conservative => write!(f, "conservative"),
            RiskCategory::Balanced => write!(f, "balanced"),
            RiskCategory::Aggressive => write!(f, "aggressive"),
        }
    }
}

impl From<RiskAppetite> for RiskCategory {
    fn from(appetite: RiskAppetite) -> Self {
        match appetite {
            RiskAppetite::Conservative => RiskCategory::Conservative,
            RiskAppetite::Moderate => RiskCategory::Balanced,
            RiskAppetite::Aggressive => RiskCategory::Aggressive,
        }
    }
}

/// A market quote: last price plus day change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
}

/// One stock in a recommendation candidate pool.
///
/// Candidates can come from the live market-data providers or from the
/// built-in catalog; the selector treats both identically. A missing
/// `market_cap` means "unclassified" and passes every risk filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockCandidate {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub market_cap: Option<MarketCap>,
    #[serde(default)]
    pub quote: Option<Quote>,
}

impl StockCandidate {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            market_cap: None,
            quote: None,
        }
    }
}

/// A mutual-fund suggestion from the built-in catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutualFundPick {
    pub name: String,
    pub category: String,
    pub expected_return: String,
}

/// A bond suggestion from the built-in catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondPick {
    pub name: String,
    pub yield_range: String,
    pub duration: String,
    pub rating: String,
}

/// Everything the recommendation endpoint returns for one risk category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSet {
    pub risk_category: RiskCategory,
    /// The filtered, truncated candidate pool
    pub stocks: Vec<StockCandidate>,
    /// Gainers among `stocks`, best first, at most 5
    pub top_performers: Vec<StockCandidate>,
    /// Losers among `stocks`, worst first, at most 5
    pub worst_performers: Vec<StockCandidate>,
    pub mutual_funds: Vec<MutualFundPick>,
    pub bonds: Vec<BondPick>,
}
