// SPDX-FileCopyrightText: 2025 Joost van der Laan
// SPDX-License-Identifier: AGPL-3.0-only

use crate::models::find_currency;
use crate::rate_store::RateStore;
use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Export the store's current rates to a timestamped CSV in `output_dir`
pub fn export_rates_csv(store: &RateStore, output_dir: &Path) -> Result<PathBuf> {
    // Create output directory if it doesn't exist
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = output_dir.join(format!("exchange_rates_{}.csv", timestamp));
    let mut writer = Writer::from_path(&path)?;

    writer.write_record([
        "Code",
        "Name",
        "Symbol",
        "Country",
        "Rate",
        "Updated At",
    ])?;

    for entry in store.snapshot() {
        let (name, symbol, country) = find_currency(&entry.code)
            .map(|c| (c.name, c.symbol, c.country))
            .unwrap_or(("", "", ""));

        writer.write_record([
            entry.code.as_str(),
            name,
            symbol,
            country,
            entry.rate.to_string().as_str(),
            entry.updated_at.to_rfc3339().as_str(),
        ])?;
    }

    writer.flush()?;
    info!(path = %path.display(), "Exchange rates exported");
    Ok(path)
}
