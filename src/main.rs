// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use wishinsured_fx::config;
use wishinsured_fx::exchange_rates::export_rates_csv;
use wishinsured_fx::finance::{self, InsuranceType, RiskLevel};
use wishinsured_fx::{RateStore, RefreshScheduler};

#[derive(Parser)]
#[command(name = "wishinsured-fx", about = "Exchange rates and savings math for WishInsured")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List supported currencies
    Currencies,
    /// Show the rate of a currency against USD
    Rate {
        currency: String,
        #[arg(long)]
        refresh: bool,
    },
    /// Convert an amount between two currencies (ISO codes or country keys)
    Convert {
        amount: f64,
        from: String,
        to: String,
        #[arg(long)]
        refresh: bool,
    },
    /// Fetch fresh rates and print the table
    Refresh,
    /// Export current rates to CSV
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        refresh: bool,
    },
    /// Keep rates refreshed until Ctrl-C
    Watch,
    /// Body-mass index from weight (kg) and height (cm)
    Bmi { weight_kg: f64, height_cm: f64 },
    /// Project monthly savings over a number of years
    Project {
        monthly: f64,
        years: u32,
        #[arg(long, default_value = "usa")]
        country: String,
        #[arg(long, value_enum, default_value = "moderate")]
        risk: RiskLevel,
    },
    /// Yearly premium in local currency from a US base premium
    Premium {
        base_usd: f64,
        #[arg(value_enum)]
        insurance: InsuranceType,
        #[arg(long, default_value = "usa")]
        country: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load_config()?;
    let store = Arc::new(RateStore::from_config(&config));

    match cli.command {
        Command::Currencies => {
            for c in store.currencies() {
                println!("{:<4} {:<3} {:<18} {}", c.code, c.symbol, c.name, c.country);
            }
        }
        Command::Rate { currency, refresh } => {
            if refresh {
                refresh_or_warn(&store).await;
            }
            match store.find_currency(&currency) {
                Some(c) => println!("1 USD = {} {}", store.rate(c.code), c.code),
                None => bail!("Unsupported currency: {}", currency),
            }
        }
        Command::Convert {
            amount,
            from,
            to,
            refresh,
        } => {
            if refresh {
                refresh_or_warn(&store).await;
            }
            for key in [&from, &to] {
                if store.find_currency(key).is_none() {
                    println!("⚠️  Warning: {} is not a supported currency, amount left as is", key);
                }
            }
            println!("{} {} = {} {}", amount, from, store.convert(amount, &from, &to), to);
        }
        Command::Refresh => {
            if store.refresh().await {
                println!("✅ Exchange rates refreshed");
            } else {
                println!("{}", STALE_RATES_WARNING);
            }
            print_rates(&store);
        }
        Command::Export { output, refresh } => {
            if refresh {
                refresh_or_warn(&store).await;
            }
            let dir = output.unwrap_or(config.output_dir.clone());
            let path = export_rates_csv(&store, &dir)?;
            println!("✅ Exchange rates written to {}", path.display());
        }
        Command::Watch => {
            let scheduler = RefreshScheduler::start(store.clone());
            println!("Refreshing rates every {}s, press Ctrl-C to stop", store.ttl().as_secs());
            tokio::signal::ctrl_c().await?;
            scheduler.shutdown().await;
            print_rates(&store);
        }
        Command::Bmi {
            weight_kg,
            height_cm,
        } => match finance::bmi(weight_kg, height_cm) {
            Some(result) => println!("BMI {} ({:?})", result.value, result.category),
            None => bail!("Weight and height must be positive"),
        },
        Command::Project {
            monthly,
            years,
            country,
            risk,
        } => {
            let projection = finance::savings_projection(monthly, years, &country, risk);
            println!("{}", serde_json::to_string_pretty(&projection)?);
        }
        Command::Premium {
            base_usd,
            insurance,
            country,
        } => {
            refresh_or_warn(&store).await;
            let premium = finance::country_premium(&store, base_usd, &country, insurance);
            println!("{}", serde_json::to_string_pretty(&premium)?);
        }
    }

    Ok(())
}

const STALE_RATES_WARNING: &str = "⚠️  All rate providers failed, using cached rates";

/// Refresh, telling the user when the rates shown are not fresh
async fn refresh_or_warn(store: &RateStore) -> bool {
    let ok = store.refresh().await;
    if !ok {
        println!("{}", STALE_RATES_WARNING);
    }
    ok
}

fn print_rates(store: &RateStore) {
    println!("State: {:?}", store.state());
    for entry in store.snapshot() {
        println!(
            "{:<4} {:>12.4}  {}",
            entry.code,
            entry.rate,
            entry.updated_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
}
