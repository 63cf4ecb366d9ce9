// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Latest known rate for one currency, relative to the base currency
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    pub code: String,
    pub rate: f64,
    pub updated_at: DateTime<Utc>,
}

impl RateEntry {
    pub fn new(code: &str, rate: f64, updated_at: DateTime<Utc>) -> Self {
        Self {
            code: code.to_string(),
            rate,
            updated_at,
        }
    }
}

/// Rates document returned by the public exchange-rate endpoints.
///
/// Only `rates` is required; `base`, `base_code`, timestamps and the like are ignored
/// whatever their shape.
#[derive(Debug, Deserialize)]
pub struct RatesDocument {
    pub rates: HashMap<String, Value>,
}

impl RatesDocument {
    /// Numeric rates only; non-numbers, zero, negative and non-finite values are dropped
    pub fn usable_rates(&self) -> HashMap<String, f64> {
        self.rates
            .iter()
            .filter_map(|(code, value)| {
                value
                    .as_f64()
                    .filter(|rate| rate.is_finite() && *rate > 0.0)
                    .map(|rate| (code.to_uppercase(), rate))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_exchangerate_api_document() {
        let body = r#"{
            "provider": "https://www.exchangerate-api.com",
            "base": "USD",
            "date": "2025-06-01",
            "time_last_updated": 1748736001,
            "rates": {"USD": 1, "INR": 85.6, "EUR": 0.881}
        }"#;
        let doc: RatesDocument = serde_json::from_str(body).unwrap();

        let rates = doc.usable_rates();
        assert_eq!(rates.len(), 3);
        assert_relative_eq!(rates["INR"], 85.6);
        assert_relative_eq!(rates["USD"], 1.0);
    }

    #[test]
    fn test_parse_open_er_api_document() {
        let body = r#"{"result": "success", "base_code": "USD", "rates": {"GBP": 0.74}}"#;
        let doc: RatesDocument = serde_json::from_str(body).unwrap();
        assert_relative_eq!(doc.usable_rates()["GBP"], 0.74);
    }

    #[test]
    fn test_base_fields_do_not_affect_parsing() {
        // Both spellings of the base field at once
        let body = r#"{"base": "USD", "base_code": "USD", "rates": {"INR": 85.0}}"#;
        let doc: RatesDocument = serde_json::from_str(body).unwrap();
        assert_relative_eq!(doc.usable_rates()["INR"], 85.0);

        // Base given as an object instead of a string
        let body = r#"{"base": {"code": "USD"}, "rates": {"EUR": 0.9}}"#;
        let doc: RatesDocument = serde_json::from_str(body).unwrap();
        assert_relative_eq!(doc.usable_rates()["EUR"], 0.9);
    }

    #[test]
    fn test_unusable_rates_are_dropped() {
        let body = r#"{"rates": {"INR": "86", "EUR": 0, "GBP": -1.0, "CAD": null, "JPY": 150.5}}"#;
        let doc: RatesDocument = serde_json::from_str(body).unwrap();
        let rates = doc.usable_rates();
        assert_eq!(rates.len(), 1);
        assert_relative_eq!(rates["JPY"], 150.5);
    }

    #[test]
    fn test_document_without_rates_is_rejected() {
        assert!(serde_json::from_str::<RatesDocument>(r#"{"base": "USD"}"#).is_err());
        assert!(serde_json::from_str::<RatesDocument>(r#"{"rates": [1, 2]}"#).is_err());
        assert!(serde_json::from_str::<RatesDocument>("[]").is_err());
    }
}
