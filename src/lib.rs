// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Currency layer for the WishInsured advice screens: a self-refreshing exchange
//! rate cache plus the financial formulas that display converted amounts.

pub mod api;
pub mod config;
pub mod exchange_rates;
pub mod finance;
pub mod models;
pub mod rate_store;
pub mod scheduler;
pub mod utils;

pub use rate_store::{RateStore, StoreState};
pub use scheduler::RefreshScheduler;
