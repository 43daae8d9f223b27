use async_trait::async_trait;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::recommendation::Quote;

/// Yahoo Finance provider for stock quotes.
///
/// - **Free**: No API key required (unofficial public API).
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// Uses the `yahoo_finance_api` crate. The day change is derived from the
/// last two daily closes of a short trailing window, since the quote
/// endpoint itself only reports prices.
pub struct YahooQuoteProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooQuoteProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl QuoteProvider for YahooQuoteProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        // A 5-day window guarantees at least two trading days across
        // weekends and market holidays.
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", "5d")
            .await
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Failed to fetch quotes for {symbol}: {e}"),
            })?;

        let quotes = resp.quotes().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to parse quotes for {symbol}: {e}"),
        })?;

        let last = quotes
            .last()
            .ok_or_else(|| CoreError::QuoteNotAvailable {
                symbol: symbol.to_uppercase(),
            })?;

        let (change, change_percent) = match quotes.len().checked_sub(2).map(|i| &quotes[i]) {
            Some(prev) if prev.close != 0.0 => {
                let change = last.close - prev.close;
                (change, change / prev.close * 100.0)
            }
            _ => (0.0, 0.0),
        };

        Ok(Quote {
            price: last.close,
            change,
            change_percent,
        })
    }
}
