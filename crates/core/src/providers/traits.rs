use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::recommendation::Quote;

/// Trait abstraction for market-data providers.
///
/// Each quote API (Yahoo Finance, Finnhub) implements this trait. If an
/// API stops working or changes, only that one implementation is replaced;
/// the rest of the codebase is untouched.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the current quote (price + day change) for a ticker symbol.
    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError>;
}
