use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::recommendation::Quote;

const BASE_URL: &str = "https://finnhub.io/api/v1";

/// Finnhub API provider for stock quotes.
///
/// - **Free tier**: 60 requests/minute.
/// - **Requires**: API key (configured under the `"finnhub"` key).
/// - **Endpoint**: `/quote?symbol={symbol}` — returns current price (`c`),
///   day change (`d`), and day change percent (`dp`).
///
/// Finnhub answers unknown symbols with an all-zero quote rather than an
/// error; that case is mapped to `QuoteNotAvailable`.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
}

impl FinnhubProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Finnhub API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct QuoteResponse {
    /// Current price
    c: f64,
    /// Day change
    d: Option<f64>,
    /// Day change percent
    dp: Option<f64>,
}

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn name(&self) -> &str {
        "Finnhub"
    }

    async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        let url = format!("{BASE_URL}/quote");
        let resp: QuoteResponse = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.to_uppercase().as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Finnhub".into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        if resp.c == 0.0 {
            return Err(CoreError::QuoteNotAvailable {
                symbol: symbol.to_uppercase(),
            });
        }

        Ok(Quote {
            price: resp.c,
            change: resp.d.unwrap_or(0.0),
            change_percent: resp.dp.unwrap_or(0.0),
        })
    }
}
