use crate::models::recommendation::{
    BondPick, MutualFundPick, Quote, RiskCategory, StockCandidate,
};

/// Built-in recommendation candidates, used when no market-data provider
/// can be reached.
///
/// Each stock table is already curated for its risk category, so catalog
/// entries carry no market-cap classification — the selector's class
/// filter passes them through untouched. The baked-in quotes are snapshot
/// values; live quotes replace them whenever a provider answers.
pub struct StaticCatalog;

impl StaticCatalog {
    /// Fallback stock candidates for a risk category.
    pub fn stocks(risk: RiskCategory) -> Vec<StockCandidate> {
        let entries: &[(&str, &str, f64, f64, f64)] = match risk {
            RiskCategory::Conservative => &[
                ("AAPL", "Apple Inc", 175.23, 2.50, 1.45),
                ("MSFT", "Microsoft Corporation", 345.67, -1.20, -0.35),
                ("JNJ", "Johnson & Johnson", 162.84, 0.89, 0.55),
                ("PG", "Procter & Gamble Co", 148.92, 1.23, 0.83),
                ("KO", "Coca-Cola Co", 59.45, -0.32, -0.54),
            ],
            RiskCategory::Balanced => &[
                ("AAPL", "Apple Inc", 175.23, 2.50, 1.45),
                ("GOOGL", "Alphabet Inc Class A", 142.87, 3.80, 2.73),
                ("MSFT", "Microsoft Corporation", 345.67, -1.20, -0.35),
                ("AMZN", "Amazon.com Inc", 156.92, 4.12, 2.70),
                ("TSLA", "Tesla Inc", 248.50, 8.30, 3.46),
                ("NVDA", "NVIDIA Corporation", 825.43, 15.67, 1.94),
                ("META", "Meta Platforms Inc", 425.18, -2.45, -0.57),
                ("V", "Visa Inc", 264.75, 1.85, 0.70),
            ],
            RiskCategory::Aggressive => &[
                ("TSLA", "Tesla Inc", 248.50, 8.30, 3.46),
                ("NVDA", "NVIDIA Corporation", 825.43, 15.67, 1.94),
                ("AMD", "Advanced Micro Devices", 142.33, 6.89, 5.08),
                ("NFLX", "Netflix Inc", 487.21, 12.45, 2.62),
                ("SHOP", "Shopify Inc", 78.92, 3.45, 4.57),
                ("SQ", "Block Inc", 68.44, 2.89, 4.41),
                ("ROKU", "Roku Inc", 65.23, 4.12, 6.74),
                ("PLTR", "Palantir Technologies", 23.87, 1.23, 5.44),
                ("COIN", "Coinbase Global Inc", 198.76, 8.94, 4.71),
                ("RBLX", "Roblox Corporation", 45.67, 2.34, 5.40),
            ],
        };

        entries
            .iter()
            .map(|&(symbol, name, price, change, change_percent)| StockCandidate {
                symbol: symbol.to_string(),
                name: name.to_string(),
                market_cap: None,
                quote: Some(Quote {
                    price,
                    change,
                    change_percent,
                }),
            })
            .collect()
    }

    /// Mutual-fund picks for a risk category.
    pub fn mutual_funds(risk: RiskCategory) -> Vec<MutualFundPick> {
        let entries: &[(&str, &str, &str)] = match risk {
            RiskCategory::Conservative => &[
                ("HDFC Balanced Advantage Fund", "Balanced", "8-10%"),
                ("ICICI Prudential Balanced Advantage Fund", "Balanced", "8-10%"),
                ("Aditya Birla SL Balanced Advantage Fund", "Balanced", "7-9%"),
            ],
            RiskCategory::Balanced => &[
                ("HDFC Flexi Cap Fund", "Equity", "10-12%"),
                ("Parag Parikh Flexi Cap Fund", "Equity", "11-13%"),
                ("ICICI Prudential Bluechip Fund", "Large Cap", "9-11%"),
                ("SBI Small Cap Fund", "Small Cap", "12-15%"),
            ],
            RiskCategory::Aggressive => &[
                ("Parag Parikh Flexi Cap Fund", "Equity", "12-15%"),
                ("SBI Small Cap Fund", "Small Cap", "15-18%"),
                ("HDFC Mid-Cap Opportunities Fund", "Mid Cap", "13-16%"),
                ("Axis Growth Opportunities Fund", "Multi Cap", "12-15%"),
                ("DSP Emerging Markets Fund", "International", "10-14%"),
            ],
        };

        entries
            .iter()
            .map(|&(name, category, expected_return)| MutualFundPick {
                name: name.to_string(),
                category: category.to_string(),
                expected_return: expected_return.to_string(),
            })
            .collect()
    }

    /// Bond picks for a risk category.
    pub fn bonds(risk: RiskCategory) -> Vec<BondPick> {
        let entries: &[(&str, &str, &str, &str)] = match risk {
            RiskCategory::Conservative => &[
                ("Government of India Bonds", "6-7%", "10-30 years", "AAA"),
                ("State Development Loans", "6.5-7.5%", "5-15 years", "AA+"),
                ("HDFC Bank Bonds", "7-8%", "3-7 years", "AAA"),
            ],
            RiskCategory::Balanced => &[
                ("Corporate Bonds (AAA rated)", "7.5-8.5%", "3-10 years", "AAA"),
                ("Tax-free Bonds", "5.5-6.5%", "10-20 years", "AAA"),
                ("Infrastructure Bonds", "8-9%", "5-15 years", "AA+"),
            ],
            RiskCategory::Aggressive => &[
                ("High-yield Corporate Bonds", "9-11%", "3-8 years", "AA"),
                ("Convertible Bonds", "7-9%", "3-7 years", "AA+"),
                ("Infrastructure Bonds", "8.5-10%", "5-12 years", "AA"),
            ],
        };

        entries
            .iter()
            .map(|&(name, yield_range, duration, rating)| BondPick {
                name: name.to_string(),
                yield_range: yield_range.to_string(),
                duration: duration.to_string(),
                rating: rating.to_string(),
            })
            .collect()
    }
}
