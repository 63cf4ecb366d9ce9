// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::Serialize;

/// Base currency every cached rate is expressed against
pub const BASE_CURRENCY: &str = "USD";

/// Static metadata for a currency the application can display and convert
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportedCurrency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub country: &'static str,
}

const fn currency(
    code: &'static str,
    name: &'static str,
    symbol: &'static str,
    country: &'static str,
) -> SupportedCurrency {
    SupportedCurrency {
        code,
        name,
        symbol,
        country,
    }
}

/// All supported currencies, in display order
pub const SUPPORTED_CURRENCIES: &[SupportedCurrency] = &[
    currency("USD", "US Dollar", "$", "usa"),
    currency("INR", "Indian Rupee", "₹", "india"),
    currency("GBP", "British Pound", "£", "uk"),
    currency("CAD", "Canadian Dollar", "C$", "canada"),
    currency("AUD", "Australian Dollar", "A$", "australia"),
    currency("EUR", "Euro", "€", "germany"),
    currency("JPY", "Japanese Yen", "¥", "japan"),
    currency("SGD", "Singapore Dollar", "S$", "singapore"),
    currency("AED", "UAE Dirham", "د.إ", "uae"),
];

/// Rates used until a provider answers (units of currency per 1 USD)
pub const FALLBACK_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("INR", 86.15),
    ("GBP", 0.79),
    ("CAD", 1.37),
    ("AUD", 1.55),
    ("EUR", 0.92),
    ("JPY", 157.0),
    ("SGD", 1.35),
    ("AED", 3.67),
];

/// Look up a currency by ISO code or by country key, ignoring case
pub fn find_currency(key: &str) -> Option<&'static SupportedCurrency> {
    let key = key.trim();
    SUPPORTED_CURRENCIES
        .iter()
        .find(|c| c.code.eq_ignore_ascii_case(key) || c.country.eq_ignore_ascii_case(key))
}

/// Fallback rate for an ISO code, if the code is in the fallback table
pub fn fallback_rate(code: &str) -> Option<f64> {
    FALLBACK_RATES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, rate)| *rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_currency_has_fallback_rate() {
        for currency in SUPPORTED_CURRENCIES {
            let rate = fallback_rate(currency.code);
            assert!(
                rate.is_some(),
                "Currency {} is supported but has no fallback rate",
                currency.code
            );
            let rate = rate.unwrap();
            assert!(rate.is_finite() && rate > 0.0);
        }
        assert_eq!(fallback_rate(BASE_CURRENCY), Some(1.0));
    }

    #[test]
    fn test_codes_and_countries_are_unique() {
        let codes: HashSet<_> = SUPPORTED_CURRENCIES.iter().map(|c| c.code).collect();
        let countries: HashSet<_> = SUPPORTED_CURRENCIES.iter().map(|c| c.country).collect();
        assert_eq!(codes.len(), SUPPORTED_CURRENCIES.len());
        assert_eq!(countries.len(), SUPPORTED_CURRENCIES.len());
    }

    #[test]
    fn test_find_currency() {
        assert_eq!(find_currency("INR").map(|c| c.country), Some("india"));
        assert_eq!(find_currency("inr").map(|c| c.code), Some("INR"));
        assert_eq!(find_currency("India").map(|c| c.code), Some("INR"));
        assert_eq!(find_currency(" usa ").map(|c| c.code), Some("USD"));
        assert!(find_currency("unknown-code").is_none());
        assert!(find_currency("").is_none());
    }
}
