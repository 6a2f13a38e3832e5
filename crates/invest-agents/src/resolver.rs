//! Company name to canonical identifier resolution
//!
//! Resolution is the mandatory first step of every analysis and the only
//! fatal failure class: a name that cannot be resolved halts the pipeline
//! with a user-facing message. The trait keeps the mechanism pluggable
//! (an open-ended market-data lookup in production, an exact table in
//! tests), and [`CachedResolver`] makes resolution idempotent within one
//! analysis.

use async_trait::async_trait;
use cached::{Cached, TimedCache};
use invest_data::MarketData;
use invest_core::Ric;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Resolution failure
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No identifier could be found for the company name
    #[error("no identifier found for '{0}'")]
    NotFound(String),

    /// The lookup source itself failed
    #[error("lookup source error: {0}")]
    Source(String),
}

/// Maps a free-text company name to one canonical identifier
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve a company name to its primary-listing identifier
    async fn resolve(&self, company: &str) -> Result<Ric, ResolveError>;
}

/// Market-data-API-backed resolver
///
/// Queries the symbol lookup endpoint, keeps common-stock candidates, and
/// prefers the configured primary-exchange suffix when multiple listings
/// exist. The upstream search is best-effort, so the result is parsed out of
/// the candidate text rather than trusted verbatim.
pub struct LookupResolver {
    market: Arc<dyn MarketData>,
    exchange_suffix: String,
    code_pattern: Regex,
}

impl LookupResolver {
    /// Create a resolver preferring the given exchange suffix (e.g. `.L`)
    pub fn new(market: Arc<dyn MarketData>, exchange_suffix: impl Into<String>) -> Self {
        // Exchange-qualified instrument codes: up to six alphanumerics with an
        // optional short exchange suffix
        let code_pattern = Regex::new(r"[A-Z0-9]{1,6}(?:\.[A-Z]{1,4})?")
            .expect("static identifier pattern compiles");

        Self {
            market,
            exchange_suffix: exchange_suffix.into(),
            code_pattern,
        }
    }

    fn extract_code(&self, text: &str) -> Option<String> {
        self.code_pattern
            .find(text.trim())
            .map(|m| m.as_str().to_string())
    }
}

#[async_trait]
impl Resolver for LookupResolver {
    async fn resolve(&self, company: &str) -> Result<Ric, ResolveError> {
        let lookup = self
            .market
            .symbol_lookup(company)
            .await
            .map_err(|e| ResolveError::Source(e.to_string()))?;

        let stocks: Vec<_> = lookup
            .result
            .iter()
            .filter(|m| m.security_type.eq_ignore_ascii_case("common stock"))
            .collect();

        let candidate = stocks
            .iter()
            .find(|m| m.symbol.ends_with(&self.exchange_suffix))
            .or_else(|| stocks.first())
            .copied()
            .or_else(|| lookup.result.first());

        let Some(candidate) = candidate else {
            return Err(ResolveError::NotFound(company.to_string()));
        };

        let code = self
            .extract_code(&candidate.symbol)
            .ok_or_else(|| ResolveError::NotFound(company.to_string()))?;

        debug!(company, code, "Resolved identifier");
        Ok(Ric::new(code))
    }
}

/// Exact lookup table resolver, the deterministic substitute for tests
pub struct StaticResolver {
    table: HashMap<String, Ric>,
}

impl StaticResolver {
    /// Build from (name, identifier) pairs; names are matched case-insensitively
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Ric)>,
        S: Into<String>,
    {
        let table = entries
            .into_iter()
            .map(|(name, ric)| (name.into().to_lowercase(), ric))
            .collect();
        Self { table }
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn resolve(&self, company: &str) -> Result<Ric, ResolveError> {
        self.table
            .get(&company.to_lowercase())
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(company.to_string()))
    }
}

/// Caching wrapper making resolution idempotent within one analysis
///
/// Successful resolutions are cached for the configured TTL; failures are
/// not cached, so a transient source error does not poison the name.
pub struct CachedResolver {
    inner: Arc<dyn Resolver>,
    cache: RwLock<TimedCache<String, Ric>>,
}

impl CachedResolver {
    /// Wrap a resolver with a timed cache
    pub fn new(inner: Arc<dyn Resolver>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: RwLock::new(TimedCache::with_lifespan(ttl)),
        }
    }
}

#[async_trait]
impl Resolver for CachedResolver {
    async fn resolve(&self, company: &str) -> Result<Ric, ResolveError> {
        let key = company.to_lowercase();

        {
            let mut cache = self.cache.write().await;
            if let Some(ric) = cache.cache_get(&key) {
                debug!(company, "Resolver cache hit");
                return Ok(ric.clone());
            }
        }

        let ric = self.inner.resolve(company).await?;

        let mut cache = self.cache.write().await;
        cache.cache_set(key, ric.clone());
        Ok(ric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invest_data::market::{LookupResult, MarketData, NewsArticle, SymbolMatch};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn symbol_match(symbol: &str, security_type: &str) -> SymbolMatch {
        SymbolMatch {
            description: format!("{symbol} description"),
            display_symbol: symbol.to_string(),
            symbol: symbol.to_string(),
            security_type: security_type.to_string(),
        }
    }

    struct FixedLookup(Vec<SymbolMatch>);

    #[async_trait]
    impl MarketData for FixedLookup {
        async fn symbol_lookup(&self, _query: &str) -> invest_data::Result<LookupResult> {
            Ok(LookupResult {
                count: self.0.len(),
                result: self.0.clone(),
            })
        }

        async fn company_news(
            &self,
            _symbol: &str,
            _range: &invest_core::DateRange,
        ) -> invest_data::Result<Vec<NewsArticle>> {
            Ok(vec![])
        }

        async fn company_profile(&self, _symbol: &str) -> invest_data::Result<Value> {
            Ok(Value::Null)
        }

        async fn basic_financials(&self, _symbol: &str) -> invest_data::Result<Value> {
            Ok(Value::Null)
        }

        async fn insider_sentiment(
            &self,
            _symbol: &str,
            _range: &invest_core::DateRange,
        ) -> invest_data::Result<Value> {
            Ok(Value::Null)
        }

        async fn financials_reported(&self, _symbol: &str) -> invest_data::Result<Value> {
            Ok(Value::Null)
        }

        async fn filings(
            &self,
            _symbol: &str,
            _range: &invest_core::DateRange,
        ) -> invest_data::Result<Vec<invest_data::Filing>> {
            Ok(vec![])
        }

        async fn fetch_document(&self, _url: &str) -> invest_data::Result<String> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_prefers_primary_exchange_listing() {
        let market = Arc::new(FixedLookup(vec![
            symbol_match("VOD", "Common Stock"),
            symbol_match("VOD.L", "Common Stock"),
            symbol_match("VODPF", "ADR"),
        ]));
        let resolver = LookupResolver::new(market, ".L");

        let ric = resolver.resolve("Vodafone").await.unwrap();
        assert_eq!(ric, Ric::new("VOD.L"));
    }

    #[tokio::test]
    async fn test_falls_back_to_first_common_stock() {
        let market = Arc::new(FixedLookup(vec![
            symbol_match("BT", "Common Stock"),
            symbol_match("BT.PF", "Preferred"),
        ]));
        let resolver = LookupResolver::new(market, ".L");

        let ric = resolver.resolve("BT").await.unwrap();
        assert_eq!(ric, Ric::new("BT"));
    }

    #[tokio::test]
    async fn test_empty_lookup_is_not_found() {
        let market = Arc::new(FixedLookup(vec![]));
        let resolver = LookupResolver::new(market, ".L");

        let err = resolver.resolve("UnknownXYZCorp").await.unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(name) if name == "UnknownXYZCorp"));
    }

    #[tokio::test]
    async fn test_static_resolver_case_insensitive() {
        let resolver = StaticResolver::new([("Vodafone", Ric::new("VOD.L"))]);
        assert_eq!(resolver.resolve("vodafone").await.unwrap(), Ric::new("VOD.L"));
        assert!(resolver.resolve("Unknown").await.is_err());
    }

    /// Resolver returning a different identifier on every call, to observe
    /// whether the cache short-circuits the second resolution
    struct CountingResolver(AtomicUsize);

    #[async_trait]
    impl Resolver for CountingResolver {
        async fn resolve(&self, _company: &str) -> Result<Ric, ResolveError> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Ric::new(format!("SYM{n}.L")))
        }
    }

    #[tokio::test]
    async fn test_cached_resolution_is_idempotent() {
        let inner = Arc::new(CountingResolver(AtomicUsize::new(0)));
        let resolver = CachedResolver::new(inner, Duration::from_secs(60));

        let first = resolver.resolve("Vodafone").await.unwrap();
        let second = resolver.resolve("Vodafone").await.unwrap();
        let third = resolver.resolve("VODAFONE").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, third);
    }
}
