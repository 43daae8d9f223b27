use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a portfolio transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Buy => write!(f, "buy"),
            TransactionKind::Sell => write!(f, "sell"),
        }
    }
}

/// One entry in a holding's append-only transaction log.
///
/// History is never edited or deleted; `quantity` and `average_cost`
/// on the holding are always reproducible by replaying this log in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub kind: TransactionKind,
    /// Units traded (always positive)
    pub quantity: f64,
    /// Price per unit (always positive)
    pub price: f64,
    /// Broker fees, folded into the cost basis on buys
    #[serde(default)]
    pub fees: f64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Transaction {
    pub fn new(kind: TransactionKind, quantity: f64, price: f64, fees: f64) -> Self {
        Self {
            kind,
            quantity,
            price,
            fees,
            date: Utc::now(),
            note: None,
        }
    }

    pub fn with_note(
        kind: TransactionKind,
        quantity: f64,
        price: f64,
        fees: f64,
        note: impl Into<String>,
    ) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::new(kind, quantity, price, fees)
        }
    }
}

/// What condition a price alert watches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    PriceAbove,
    PriceBelow,
    /// No volume feed is wired in; these stay untriggered unless set
    /// externally.
    VolumeSpike,
    /// No news feed is wired in; same as `VolumeSpike`.
    News,
}

/// A price alert on a holding. Triggers at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    /// Threshold; required for `PriceAbove`/`PriceBelow`
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub triggered: bool,
    #[serde(default)]
    pub triggered_date: Option<DateTime<Utc>>,
    pub active: bool,
}

impl Alert {
    pub fn price_above(value: f64) -> Self {
        Self {
            kind: AlertKind::PriceAbove,
            value: Some(value),
            triggered: false,
            triggered_date: None,
            active: true,
        }
    }

    pub fn price_below(value: f64) -> Self {
        Self {
            kind: AlertKind::PriceBelow,
            value: Some(value),
            triggered: false,
            triggered_date: None,
            active: true,
        }
    }
}

/// Market-capitalization class, used by the recommendation filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketCap {
    #[serde(rename = "Small Cap")]
    SmallCap,
    #[serde(rename = "Mid Cap")]
    MidCap,
    #[serde(rename = "Large Cap")]
    LargeCap,
    #[serde(rename = "Mega Cap")]
    MegaCap,
}

impl std::fmt::Display for MarketCap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MarketCap::SmallCap => "Small Cap",
            MarketCap::MidCap => "Mid Cap",
            MarketCap::LargeCap => "Large Cap",
            MarketCap::MegaCap => "Mega Cap",
        };
        write!(f, "{name}")
    }
}

/// A user's position in one ticker symbol, unique per `(user_id, symbol)`.
///
/// `quantity` and `average_cost` are derived state: they are only ever
/// written by the ledger's replay over `transactions`. A holding with
/// `quantity == 0` can exist purely as a watchlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub id: Uuid,
    pub user_id: Uuid,

    /// Ticker symbol, uppercased, at most 10 characters
    pub symbol: String,
    pub company_name: String,

    /// Units currently held; derived from `transactions`, never negative
    pub quantity: f64,
    /// Weighted-average cost per unit; derived from `transactions`
    pub average_cost: f64,
    /// Latest known market price, set by price updates
    #[serde(default)]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market_cap: Option<MarketCap>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,

    /// Append-only trade history, in insertion order
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub alerts: Vec<Alert>,

    /// Tracked for price monitoring without (necessarily) owning any units
    #[serde(default)]
    pub watchlist: bool,

    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,

    pub last_updated: DateTime<Utc>,
    pub created_at: DateTime<Utc>,

    /// Document revision, bumped by the store on every successful save
    #[serde(default)]
    pub revision: u64,
}

impl Holding {
    pub fn new(user_id: Uuid, symbol: impl Into<String>, company_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            symbol: symbol.into().trim().to_uppercase(),
            company_name: company_name.into(),
            quantity: 0.0,
            average_cost: 0.0,
            current_price: None,
            sector: None,
            industry: None,
            market_cap: None,
            dividend_yield: None,
            transactions: Vec::new(),
            alerts: Vec::new(),
            watchlist: false,
            tags: Vec::new(),
            notes: None,
            last_updated: now,
            created_at: now,
            revision: 0,
        }
    }

    // ── Derived values (computed, never stored) ─────────────────────

    /// Cost basis of the current position.
    #[must_use]
    pub fn total_invested(&self) -> f64 {
        self.quantity * self.average_cost
    }

    /// Market value of the position. Falls back to the average cost when
    /// no current price has been set yet.
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.quantity * self.current_price.unwrap_or(self.average_cost)
    }

    /// Unrealized profit/loss in currency.
    #[must_use]
    pub fn profit_loss(&self) -> f64 {
        self.current_value() - self.total_invested()
    }

    /// Unrealized profit/loss as a percentage of the invested amount.
    /// Zero when nothing is invested.
    #[must_use]
    pub fn profit_loss_percentage(&self) -> f64 {
        let invested = self.total_invested();
        if invested == 0.0 {
            return 0.0;
        }
        self.profit_loss() / invested * 100.0
    }
}

/// Input for adding a symbol to the portfolio; the facade fills in ids,
/// timestamps, and the seed transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct NewHolding {
    pub symbol: String,
    pub company_name: String,
    /// Starting position size; zero creates a pure watchlist entry
    #[serde(default)]
    pub quantity: f64,
    /// Price paid per unit for the starting position
    #[serde(default)]
    pub average_cost: f64,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market_cap: Option<MarketCap>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub watchlist: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
