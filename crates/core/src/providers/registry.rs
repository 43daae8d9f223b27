use std::collections::HashMap;

use super::finnhub::FinnhubProvider;
use super::traits::QuoteProvider;
use super::yahoo::YahooQuoteProvider;

/// Registry of all available quote providers, in fallback priority order.
///
/// New providers can be added without modifying existing code; consumers
/// only see the [`QuoteProvider`] trait.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(api_keys: &HashMap<String, String>) -> Self {
        let mut registry = Self::new();

        // Yahoo Finance — no API key needed (primary)
        if let Ok(yahoo) = YahooQuoteProvider::new() {
            registry.register(Box::new(yahoo));
        }

        // Finnhub — requires API key (fallback)
        if let Some(key) = api_keys.get("finnhub") {
            registry.register(Box::new(FinnhubProvider::new(key.clone())));
        }

        registry
    }

    /// Register a new quote provider at the end of the priority order.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// All registered providers, in priority order.
    pub fn providers(&self) -> &[Box<dyn QuoteProvider>] {
        &self.providers
    }

    /// True when no provider is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
