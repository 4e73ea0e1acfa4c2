//! Command line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::filter::DateSelection;
use crate::data::loader::parse_date;

/// File the dashboard opens when nothing else is given.
pub const DEFAULT_DATASET: &str = "MegaDataset_v2_Nov2024_onward.csv";

#[derive(Debug, Parser)]
#[command(
    name = "health-dash",
    version,
    about = "Personal health dashboard: weight, blood pressure and bloods over time"
)]
pub struct Cli {
    /// Dataset to open (CSV, TSV, JSON records or Parquet).
    #[arg(long, env = "HEALTH_DASH_DATA", default_value = DEFAULT_DATASET)]
    pub data: PathBuf,

    /// First day of the initial date range (inclusive).
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    /// Last day of the initial date range (inclusive).
    #[arg(long, value_name = "DATE", value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,

    /// Print the chart specifications as JSON instead of opening a window.
    #[arg(long)]
    pub dump_specs: bool,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).ok_or_else(|| format!("'{s}' is not a recognised date"))
}

impl Cli {
    /// Whether `--from` or `--to` was given.
    pub fn has_range(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Initial date selection. Missing ends are left open.
    pub fn selection(&self) -> DateSelection {
        DateSelection {
            start: self.from,
            end: self.to,
        }
    }
}
