//! CLI definition using clap

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dmv_types::{EngineType, OutputFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dmv-office")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Vehicle registration and driver licensing rules for DMV facilities")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scenario file, or every .toml scenario in a folder
    Run {
        /// Scenario file or folder
        path: PathBuf,

        /// Write the registration ledger to an Excel file
        #[arg(long, short = 'o')]
        export: Option<PathBuf>,

        /// Date used as "today" (YYYY-MM-DD). Defaults to the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Show plate category and registration fee for an engine type
    Quote {
        /// Engine type
        #[arg(long, short = 'e', value_enum)]
        engine: EngineType,
    },

    /// Check whether a registration is due for renewal
    Renewal {
        /// Date of the registration (YYYY-MM-DD)
        #[arg(long)]
        registered_on: NaiveDate,

        /// Date to check against (YYYY-MM-DD). Defaults to the local date.
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set the base registration fee
        #[arg(long)]
        set_base_fee: Option<u64>,

        /// Set the electric vehicle surcharge
        #[arg(long)]
        set_ev_surcharge: Option<u64>,

        /// Set the minimum age for the written test
        #[arg(long)]
        set_min_age: Option<u32>,

        /// Set the number of years before a registration is due for renewal
        #[arg(long)]
        set_renewal_years: Option<u32>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}
