// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Financial and health formulas behind the advice screens.

use clap::ValueEnum;
use serde::Serialize;

use crate::models::{find_currency, SupportedCurrency, BASE_CURRENCY};
use crate::rate_store::RateStore;
use crate::utils::{round1, round2};

/// Wealth targets reported by [`milestones`]
pub const MILESTONE_TARGETS: [f64; 6] = [
    10_000.0,
    50_000.0,
    100_000.0,
    250_000.0,
    500_000.0,
    1_000_000.0,
];

/// Milestones further away than this are not reported
pub const MAX_MILESTONE_YEARS: f64 = 50.0;

/// Longest horizon [`savings_projection`] will compute; longer requests are clamped
pub const MAX_PROJECTION_YEARS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bmi {
    pub value: f64,
    pub category: BmiCategory,
}

/// Body-mass index from weight in kilograms and height in centimetres
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<Bmi> {
    if !(weight_kg > 0.0 && height_cm > 0.0) {
        return None;
    }

    let height_m = height_cm / 100.0;
    let value = round1(weight_kg / (height_m * height_m));
    let category = if value < 18.5 {
        BmiCategory::Underweight
    } else if value < 25.0 {
        BmiCategory::Normal
    } else if value < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    };

    Some(Bmi { value, category })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum RiskLevel {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum InsuranceType {
    Health,
    Property,
    Life,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Returns {
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

impl Returns {
    pub fn for_risk(&self, risk: RiskLevel) -> f64 {
        match risk {
            RiskLevel::Conservative => self.conservative,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::Aggressive => self.aggressive,
        }
    }
}

/// Premium multipliers relative to US pricing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PremiumMultipliers {
    pub health: f64,
    pub property: f64,
    pub life: f64,
    pub auto: f64,
}

impl PremiumMultipliers {
    pub fn for_type(&self, insurance: InsuranceType) -> f64 {
        match insurance {
            InsuranceType::Health => self.health,
            InsuranceType::Property => self.property,
            InsuranceType::Life => self.life,
            InsuranceType::Auto => self.auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryProfile {
    pub country: &'static str,
    pub currency: &'static str,
    pub tax_rate: f64,
    pub retirement_age: u32,
    pub returns: Returns,
    pub multipliers: PremiumMultipliers,
}

impl CountryProfile {
    pub fn currency(&self) -> Option<&'static SupportedCurrency> {
        find_currency(self.currency)
    }
}

pub const COUNTRY_PROFILES: &[CountryProfile] = &[
    CountryProfile {
        country: "usa",
        currency: "USD",
        tax_rate: 0.25,
        retirement_age: 65,
        returns: Returns {
            conservative: 0.04,
            moderate: 0.07,
            aggressive: 0.10,
        },
        multipliers: PremiumMultipliers {
            health: 1.0,
            property: 1.0,
            life: 1.0,
            auto: 1.0,
        },
    },
    CountryProfile {
        country: "india",
        currency: "INR",
        tax_rate: 0.20,
        retirement_age: 60,
        returns: Returns {
            conservative: 0.06,
            moderate: 0.12,
            aggressive: 0.15,
        },
        multipliers: PremiumMultipliers {
            health: 0.15,
            property: 0.20,
            life: 0.12,
            auto: 0.18,
        },
    },
    CountryProfile {
        country: "uk",
        currency: "GBP",
        tax_rate: 0.20,
        retirement_age: 66,
        returns: Returns {
            conservative: 0.03,
            moderate: 0.06,
            aggressive: 0.08,
        },
        multipliers: PremiumMultipliers {
            health: 0.30,
            property: 0.80,
            life: 0.85,
            auto: 0.90,
        },
    },
    CountryProfile {
        country: "canada",
        currency: "CAD",
        tax_rate: 0.26,
        retirement_age: 65,
        returns: Returns {
            conservative: 0.035,
            moderate: 0.065,
            aggressive: 0.09,
        },
        multipliers: PremiumMultipliers {
            health: 0.25,
            property: 0.75,
            life: 0.80,
            auto: 0.85,
        },
    },
    CountryProfile {
        country: "australia",
        currency: "AUD",
        tax_rate: 0.32,
        retirement_age: 67,
        returns: Returns {
            conservative: 0.04,
            moderate: 0.07,
            aggressive: 0.095,
        },
        multipliers: PremiumMultipliers {
            health: 0.40,
            property: 0.85,
            life: 0.90,
            auto: 0.95,
        },
    },
    CountryProfile {
        country: "germany",
        currency: "EUR",
        tax_rate: 0.42,
        retirement_age: 67,
        returns: Returns {
            conservative: 0.025,
            moderate: 0.05,
            aggressive: 0.075,
        },
        multipliers: PremiumMultipliers {
            health: 0.20,
            property: 0.70,
            life: 0.75,
            auto: 0.80,
        },
    },
];

/// Profile for a country key or its currency code; unknown keys get the US profile
pub fn country_profile(key: &str) -> &'static CountryProfile {
    let country = find_currency(key).map(|c| c.country).unwrap_or(key);
    COUNTRY_PROFILES
        .iter()
        .find(|p| p.country.eq_ignore_ascii_case(country))
        .unwrap_or(&COUNTRY_PROFILES[0])
}

/// Value after `years` of a lump sum compounded yearly plus monthly contributions
/// compounded monthly
pub fn future_value(principal: f64, monthly: f64, annual_return: f64, years: u32) -> f64 {
    let years = f64::from(years);
    let months = years * 12.0;
    let monthly_return = annual_return / 12.0;

    if monthly_return > 0.0 {
        principal * (1.0 + annual_return).powf(years)
            + monthly * (((1.0 + monthly_return).powf(months) - 1.0) / monthly_return)
    } else {
        principal + monthly * months
    }
}

/// Months of steady saving needed to accumulate `goal`
pub fn months_to_goal(goal: f64, monthly: f64, annual_return: f64) -> Option<f64> {
    if monthly <= 0.0 {
        return None;
    }
    if goal <= 0.0 {
        return Some(0.0);
    }

    let monthly_return = annual_return / 12.0;
    if monthly_return > 0.0 {
        Some((1.0 + goal * monthly_return / monthly).ln() / (1.0 + monthly_return).ln())
    } else {
        Some(goal / monthly)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    pub amount: f64,
    pub years: f64,
    pub monthly_income: f64,
}

pub fn milestones(monthly: f64, annual_return: f64) -> Vec<Milestone> {
    MILESTONE_TARGETS
        .iter()
        .filter_map(|&amount| {
            let years = months_to_goal(amount, monthly, annual_return)? / 12.0;
            (years <= MAX_MILESTONE_YEARS).then(|| Milestone {
                amount,
                years: round1(years),
                monthly_income: round2(amount * annual_return / 12.0),
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsProjection {
    pub currency: &'static str,
    pub years: u32,
    pub annual_return: f64,
    pub simple_total: f64,
    pub investment_total: f64,
    pub gains: f64,
    pub after_tax_total: f64,
    pub wealth_multiplier: f64,
    pub monthly_passive_income: f64,
    pub milestones: Vec<Milestone>,
}

/// Compare saving `monthly` as cash against investing it for `years`
pub fn savings_projection(
    monthly: f64,
    years: u32,
    country: &str,
    risk: RiskLevel,
) -> SavingsProjection {
    let profile = country_profile(country);
    let annual_return = profile.returns.for_risk(risk);
    let years = years.min(MAX_PROJECTION_YEARS);

    let simple_total = monthly * 12.0 * years as f64;
    let investment_total = future_value(0.0, monthly, annual_return, years);
    let gains = investment_total - simple_total;
    let after_tax_total = investment_total - gains * profile.tax_rate;
    let wealth_multiplier = if simple_total > 0.0 {
        investment_total / simple_total
    } else {
        1.0
    };

    SavingsProjection {
        currency: profile.currency,
        years,
        annual_return,
        simple_total: round2(simple_total),
        investment_total: round2(investment_total),
        gains: round2(gains),
        after_tax_total: round2(after_tax_total),
        wealth_multiplier: round2(wealth_multiplier),
        monthly_passive_income: round2(investment_total * annual_return / 12.0),
        milestones: milestones(monthly, annual_return),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Premium {
    pub currency: &'static str,
    pub symbol: &'static str,
    pub amount: f64,
    pub monthly: f64,
    pub quarterly: f64,
    pub usd_equivalent: f64,
}

/// Yearly premium for `country`, adjusted from a US base price and converted to local currency
pub fn country_premium(
    store: &RateStore,
    base_premium_usd: f64,
    country: &str,
    insurance: InsuranceType,
) -> Premium {
    let profile = country_profile(country);
    let adjusted_usd = base_premium_usd * profile.multipliers.for_type(insurance);
    let local = store.convert(adjusted_usd, BASE_CURRENCY, profile.currency);
    let symbol = profile.currency().map(|c| c.symbol).unwrap_or("$");

    Premium {
        currency: profile.currency,
        symbol,
        amount: local,
        monthly: round2(local / 12.0),
        quarterly: round2(local / 4.0),
        usd_equivalent: round2(adjusted_usd),
    }
}
