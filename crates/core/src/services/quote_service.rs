use log::{debug, warn};

use crate::errors::CoreError;
use crate::models::recommendation::Quote;
use crate::providers::registry::QuoteProviderRegistry;

/// Fetches market quotes through the provider registry with automatic
/// fallback.
///
/// Providers are tried in registration order; if the primary fails (API
/// down, rate limited, unknown symbol), the next one is tried. Returned
/// prices are validated before being trusted.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self { registry }
    }

    /// True if at least one provider is registered.
    pub fn has_provider(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Names of the registered providers, in priority order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry
            .providers()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Get a quote for `symbol`, trying each provider in order.
    ///
    /// Quotes with a non-finite or negative price are treated as provider
    /// failures and fall through to the next source.
    pub async fn get_quote(&self, symbol: &str) -> Result<Quote, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoQuoteSource(symbol.to_string()));
        }

        let mut last_error = None;
        for provider in providers {
            match provider.get_quote(symbol).await {
                Ok(quote) => {
                    if !quote.price.is_finite() || quote.price < 0.0 {
                        warn!(
                            "{} returned invalid price {} for {symbol}, trying next provider",
                            provider.name(),
                            quote.price
                        );
                        last_error = Some(CoreError::Api {
                            provider: provider.name().to_string(),
                            message: format!(
                                "Invalid price returned for {symbol}: {} (must be finite and non-negative)",
                                quote.price
                            ),
                        });
                        continue;
                    }
                    return Ok(quote);
                }
                Err(e) => {
                    debug!("{} failed for {symbol}: {e}", provider.name());
                    last_error = Some(e);
                    // Try next provider
                }
            }
        }

        Err(last_error.unwrap_or_else(|| CoreError::NoQuoteSource(symbol.to_string())))
    }
}
