//! Instrument Resolution
//!
//! Maps free-text queries ("btc price", "how is tesla doing") to a canonical
//! instrument and the venue it trades on. Matching runs over a fixed, ordered
//! token table - first hit wins - so resolution is deterministic for any
//! input. An unmatched query falls back to the configured default instrument
//! rather than failing; the fallback is observable on [`Resolution`].

use serde::{Deserialize, Serialize};

/// The class of data provider an instrument is fetched from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    /// Crypto-exchange market data (symbol pairs like `BTC/USDT`).
    Crypto,
    /// Generic quote provider (equity tickers, futures-style commodity codes).
    Generic,
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Crypto => write!(f, "crypto"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

/// A resolved, fetchable instrument. Immutable for the rest of the pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Canonical symbol: `BASE/QUOTE` for crypto, provider ticker otherwise.
    pub symbol: String,
    pub venue: Venue,
}

impl Instrument {
    pub fn crypto(base: &str, quote: &str) -> Self {
        Self {
            symbol: format!("{}/{}", base.to_uppercase(), quote.to_uppercase()),
            venue: Venue::Crypto,
        }
    }

    pub fn generic(ticker: impl Into<String>) -> Self {
        Self {
            symbol: ticker.into(),
            venue: Venue::Generic,
        }
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.symbol, self.venue)
    }
}

/// Outcome of resolving one query.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Resolution {
    pub instrument: Instrument,

    /// The table token that matched, if any.
    pub matched: Option<String>,

    /// True when no token matched and the default instrument was used.
    pub defaulted: bool,
}

/// What a matched token maps to.
#[derive(Clone, Debug)]
enum Target {
    /// Crypto base asset; pairs with the configured quote currency.
    CryptoBase(&'static str),
    /// Provider-specific ticker (equities plain, commodities futures-style).
    Ticker(&'static str),
}

/// One entry of the ordered lookup table.
#[derive(Clone, Debug)]
struct TokenRule {
    token: &'static str,
    target: Target,
}

/// Resolver configuration.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Quote currency appended to crypto base assets.
    pub quote_currency: String,

    /// Instrument used when nothing in the query matches.
    pub default_instrument: Instrument,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            quote_currency: "USDT".into(),
            default_instrument: Instrument::crypto("BTC", "USDT"),
        }
    }
}

/// Query-to-instrument resolver over a fixed token table.
///
/// Pure: no clock, no I/O, no state mutated by [`Resolver::resolve`].
#[derive(Clone, Debug)]
pub struct Resolver {
    table: Vec<TokenRule>,
    config: ResolverConfig,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            table: default_table(),
            config,
        }
    }

    /// Resolve a free-text query. Never fails: unmatched queries yield the
    /// configured default instrument with `defaulted` set.
    pub fn resolve(&self, query: &str) -> Resolution {
        let needle = query.to_lowercase();

        for rule in &self.table {
            if needle.contains(rule.token) {
                let instrument = match rule.target {
                    Target::CryptoBase(base) => {
                        Instrument::crypto(base, &self.config.quote_currency)
                    }
                    Target::Ticker(ticker) => Instrument::generic(ticker),
                };
                return Resolution {
                    instrument,
                    matched: Some(rule.token.to_string()),
                    defaulted: false,
                };
            }
        }

        tracing::debug!(query, default = %self.config.default_instrument, "query unmatched, using default instrument");

        Resolution {
            instrument: self.config.default_instrument.clone(),
            matched: None,
            defaulted: true,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }
}

/// The built-in token table. Crypto names before tickers, tickers before the
/// shorter aliases they contain, crypto block before equities before
/// commodities before forex. Order is the priority.
fn default_table() -> Vec<TokenRule> {
    use Target::{CryptoBase, Ticker};

    let entries = [
        // Crypto
        ("bitcoin", CryptoBase("BTC")),
        ("btc", CryptoBase("BTC")),
        ("ethereum", CryptoBase("ETH")),
        ("eth", CryptoBase("ETH")),
        ("solana", CryptoBase("SOL")),
        ("sol", CryptoBase("SOL")),
        ("cardano", CryptoBase("ADA")),
        ("ada", CryptoBase("ADA")),
        ("ripple", CryptoBase("XRP")),
        ("xrp", CryptoBase("XRP")),
        ("dogecoin", CryptoBase("DOGE")),
        ("doge", CryptoBase("DOGE")),
        ("polkadot", CryptoBase("DOT")),
        ("dot", CryptoBase("DOT")),
        ("bnb", CryptoBase("BNB")),
        ("matic", CryptoBase("MATIC")),
        // Equities
        ("apple", Ticker("AAPL")),
        ("aapl", Ticker("AAPL")),
        ("tesla", Ticker("TSLA")),
        ("tsla", Ticker("TSLA")),
        ("microsoft", Ticker("MSFT")),
        ("msft", Ticker("MSFT")),
        ("amazon", Ticker("AMZN")),
        ("amzn", Ticker("AMZN")),
        ("google", Ticker("GOOGL")),
        ("googl", Ticker("GOOGL")),
        ("nvidia", Ticker("NVDA")),
        ("nvda", Ticker("NVDA")),
        ("meta", Ticker("META")),
        // Commodities (futures-style codes)
        ("gold", Ticker("GC=F")),
        ("silver", Ticker("SI=F")),
        ("crude", Ticker("CL=F")),
        ("oil", Ticker("CL=F")),
        // Forex
        ("eurusd", Ticker("EURUSD=X")),
        ("eur/usd", Ticker("EURUSD=X")),
        ("usdinr", Ticker("INR=X")),
        ("usd/inr", Ticker("INR=X")),
    ];

    entries
        .into_iter()
        .map(|(token, target)| TokenRule { token, target })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_queries_resolve_to_pairs() {
        let resolver = Resolver::default();

        let res = resolver.resolve("btc price");
        assert_eq!(res.instrument.symbol, "BTC/USDT");
        assert_eq!(res.instrument.venue, Venue::Crypto);
        assert!(!res.defaulted);

        let res = resolver.resolve("What is Ethereum doing today?");
        assert_eq!(res.instrument.symbol, "ETH/USDT");
        assert_eq!(res.matched.as_deref(), Some("ethereum"));
    }

    #[test]
    fn equities_and_commodities_resolve_to_tickers() {
        let resolver = Resolver::default();

        let res = resolver.resolve("tesla stock");
        assert_eq!(res.instrument.symbol, "TSLA");
        assert_eq!(res.instrument.venue, Venue::Generic);

        let res = resolver.resolve("gold price");
        assert_eq!(res.instrument.symbol, "GC=F");
        assert_eq!(res.instrument.venue, Venue::Generic);
    }

    #[test]
    fn unmatched_query_falls_back_to_default() {
        let resolver = Resolver::default();

        let res = resolver.resolve("xyz123");
        assert!(res.defaulted);
        assert!(res.matched.is_none());
        assert_eq!(res.instrument, Instrument::crypto("BTC", "USDT"));
    }

    #[test]
    fn default_instrument_is_configurable() {
        let config = ResolverConfig {
            quote_currency: "USDC".into(),
            default_instrument: Instrument::crypto("ETH", "USDC"),
        };
        let resolver = Resolver::new(config);

        let res = resolver.resolve("nothing known here");
        assert_eq!(res.instrument.symbol, "ETH/USDC");

        // Quote currency also applies to matched crypto tokens
        let res = resolver.resolve("sol update please");
        assert_eq!(res.instrument.symbol, "SOL/USDC");
    }

    #[test]
    fn matching_is_case_insensitive_and_ordered() {
        let resolver = Resolver::default();

        let res = resolver.resolve("BITCOIN!!!");
        assert_eq!(res.instrument.symbol, "BTC/USDT");

        // "bitcoin" outranks the "btc" alias it contains; the matched token
        // must be the earlier table entry.
        assert_eq!(res.matched.as_deref(), Some("bitcoin"));

        // A query naming two assets resolves to the higher-priority one.
        let res = resolver.resolve("compare bitcoin with tesla");
        assert_eq!(res.instrument.symbol, "BTC/USDT");
    }

    #[test]
    fn resolution_is_deterministic() {
        let resolver = Resolver::default();
        let a = resolver.resolve("doge to the moon");
        let b = resolver.resolve("doge to the moon");
        assert_eq!(a.instrument, b.instrument);
        assert_eq!(a.matched, b.matched);
    }
}
