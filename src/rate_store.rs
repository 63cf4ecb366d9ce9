// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory exchange rate cache.
//!
//! Rates are kept relative to [`BASE_CURRENCY`] and seeded from the fallback
//! table, so every supported currency always has a usable rate. Reads never
//! touch the network; [`RateStore::refresh`] pulls fresh rates from the
//! configured providers at most once per TTL window.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::api::{HttpRateProvider, RateProvider, DEFAULT_ENDPOINTS, DEFAULT_TIMEOUT};
use crate::config::Config;
use crate::models::{
    fallback_rate, find_currency, RateEntry, SupportedCurrency, BASE_CURRENCY, FALLBACK_RATES,
    SUPPORTED_CURRENCIES,
};
use crate::utils::round2;

/// How long fetched rates are considered fresh
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    /// Only fallback data, no refresh has succeeded yet
    Cold,
    /// At least one refresh succeeded
    Warm,
}

#[derive(Debug)]
struct Cache {
    entries: HashMap<String, RateEntry>,
    last_fetch: Option<DateTime<Utc>>,
}

pub struct RateStore {
    providers: Vec<Arc<dyn RateProvider>>,
    ttl: Duration,
    attempt_timeout: Duration,
    cache: RwLock<Cache>,
}

impl RateStore {
    /// Store backed by the default public endpoints
    pub fn new() -> Self {
        let providers = HttpRateProvider::from_templates(DEFAULT_ENDPOINTS, DEFAULT_TIMEOUT)
            .into_iter()
            .map(|p| Arc::new(p) as Arc<dyn RateProvider>)
            .collect();
        Self::with_providers(providers)
    }

    pub fn with_providers(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        let now = Utc::now();
        let entries = FALLBACK_RATES
            .iter()
            .map(|(code, rate)| (code.to_string(), RateEntry::new(code, *rate, now)))
            .collect();

        Self {
            providers,
            ttl: DEFAULT_TTL,
            attempt_timeout: DEFAULT_TIMEOUT,
            cache: RwLock::new(Cache {
                entries,
                last_fetch: None,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let providers =
            HttpRateProvider::from_templates(config.endpoints.as_slice(), config.timeout())
                .into_iter()
                .map(|p| Arc::new(p) as Arc<dyn RateProvider>)
                .collect();

        Self::with_providers(providers)
            .with_ttl(config.ttl())
            .with_attempt_timeout(config.timeout())
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Upper bound for a single provider attempt, on top of any HTTP timeout
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn currencies(&self) -> &'static [SupportedCurrency] {
        SUPPORTED_CURRENCIES
    }

    pub fn find_currency(&self, key: &str) -> Option<&'static SupportedCurrency> {
        find_currency(key)
    }

    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        self.cache.read().last_fetch
    }

    pub fn state(&self) -> StoreState {
        match self.last_fetch() {
            Some(_) => StoreState::Warm,
            None => StoreState::Cold,
        }
    }

    /// Rate for a code or country key. Falls back to the seed table, then to 1.0.
    pub fn rate(&self, key: &str) -> f64 {
        let code = match find_currency(key) {
            Some(currency) => currency.code.to_string(),
            None => key.trim().to_uppercase(),
        };

        if let Some(entry) = self.cache.read().entries.get(&code) {
            return entry.rate;
        }

        fallback_rate(&code).unwrap_or(1.0)
    }

    /// Current entries in display order
    pub fn snapshot(&self) -> Vec<RateEntry> {
        let cache = self.cache.read();
        SUPPORTED_CURRENCIES
            .iter()
            .filter_map(|c| cache.entries.get(c.code).cloned())
            .collect()
    }

    /// Convert between two currencies (codes or country keys) via the base currency.
    ///
    /// Unknown currencies leave the amount untouched.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
        let (from, to) = match (find_currency(from), find_currency(to)) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                debug!(from, to, "Unknown currency, returning amount unchanged");
                return amount;
            }
        };

        let base_amount = amount / self.rate(from.code);
        round2(base_amount * self.rate(to.code))
    }

    pub fn convert_to_base(&self, amount: f64, from: &str) -> f64 {
        self.convert(amount, from, BASE_CURRENCY)
    }

    pub fn convert_from_base(&self, amount: f64, to: &str) -> f64 {
        self.convert(amount, BASE_CURRENCY, to)
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_fetch() {
            None => false,
            Some(last) => match (now - last).to_std() {
                Ok(age) => age < self.ttl,
                // Clock moved backwards since the last fetch
                Err(_) => true,
            },
        }
    }

    /// Refresh rates unless the cache is still fresh.
    ///
    /// Returns `false` only when every provider failed; the cache is then left as it was.
    pub async fn refresh(&self) -> bool {
        if self.is_fresh(Utc::now()) {
            debug!("Exchange rates still fresh, skipping refresh");
            return true;
        }

        self.force_refresh().await
    }

    /// Query providers in order regardless of cache age
    pub async fn force_refresh(&self) -> bool {
        for provider in &self.providers {
            let attempt = tokio::time::timeout(self.attempt_timeout, provider.fetch_rates(BASE_CURRENCY));

            match attempt.await {
                Ok(Ok(rates)) => {
                    let updated = self.apply(&rates);
                    info!(
                        provider = provider.name(),
                        updated, "Exchange rates refreshed"
                    );
                    return true;
                }
                Ok(Err(e)) => {
                    warn!(provider = provider.name(), error = %e, "Rate provider failed");
                }
                Err(_) => {
                    warn!(
                        provider = provider.name(),
                        timeout_ms = self.attempt_timeout.as_millis() as u64,
                        "Rate provider timed out"
                    );
                }
            }
        }

        warn!("All rate providers failed, keeping cached rates");
        false
    }

    /// Replace entries for tracked codes present in `rates`; returns how many changed
    fn apply(&self, rates: &HashMap<String, f64>) -> usize {
        let now = Utc::now();
        let mut cache = self.cache.write();
        let mut updated = 0;

        for (code, _) in FALLBACK_RATES {
            if let Some(&rate) = rates.get(*code) {
                if rate.is_finite() && rate > 0.0 {
                    cache.entries.insert(code.to_string(), RateEntry::new(code, rate, now));
                    updated += 1;
                }
            }
        }

        cache.last_fetch = Some(match cache.last_fetch {
            Some(previous) if previous > now => previous,
            _ => now,
        });

        updated
    }
}

impl Default for RateStore {
    fn default() -> Self {
        Self::new()
    }
}
