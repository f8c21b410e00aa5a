//! Command-line arguments
//!
//! ```bash
//! panel-fleet resolve shop.example.com --mode full
//! panel-fleet locate shop.example.com
//! panel-fleet search "shop*"
//! panel-fleet accounts --status suspended --created-from 2024-01-01
//! panel-fleet status --format json
//! panel-fleet inventory 10
//! ```

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use panel_fleet_core::types::{AccountFilter, AccountStatus, SearchMode};
use panel_fleet_core::utils::datetime::parse_day;

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "panel-fleet")]
#[command(version)]
#[command(about = "Find which WHM/cPanel server and account hosts a domain", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Fleet configuration file [default: <config dir>/panel-fleet/servers.toml]
    #[arg(short, long, global = true, env = "PANEL_FLEET_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a domain to its hosting server, listing all candidates
    Resolve {
        domain: String,
        /// fast (main domains only), full (all domains) or smart (fast, then full)
        #[arg(short, long, default_value = "smart")]
        mode: SearchMode,
    },

    /// Print only the canonical match; exits with 2 when the domain is not found
    Locate {
        domain: String,
        #[arg(short, long, default_value = "smart")]
        mode: SearchMode,
    },

    /// Find domains containing a keyword or matching a `*`/`?` pattern
    Search { keyword: String },

    /// List or filter hosting accounts
    Accounts(AccountsArgs),

    /// Probe every server and report reachability and panel version
    Status,

    /// Full domain inventory of one server
    Inventory {
        #[arg(value_name = "SERVER_ID")]
        server_id: String,
    },
}

#[derive(Args, Debug)]
pub struct AccountsArgs {
    /// Restrict to one server
    #[arg(long, value_name = "SERVER_ID")]
    pub server: Option<String>,

    /// Substring or wildcard matched against main domain and user
    #[arg(long)]
    pub pattern: Option<String>,

    /// Created on or after this day (YYYY-MM-DD)
    #[arg(long, value_parser = day_arg)]
    pub created_from: Option<NaiveDate>,

    /// Created on or before this day (YYYY-MM-DD)
    #[arg(long, value_parser = day_arg)]
    pub created_to: Option<NaiveDate>,

    /// Minimum disk usage in MB
    #[arg(long, value_name = "MB")]
    pub min_disk: Option<f64>,

    #[arg(long)]
    pub package: Option<String>,

    /// active or suspended
    #[arg(long)]
    pub status: Option<AccountStatus>,
}

impl AccountsArgs {
    pub fn filter(&self) -> AccountFilter {
        AccountFilter {
            pattern: self.pattern.clone(),
            created_from: self.created_from,
            created_to: self.created_to,
            min_disk_mb: self.min_disk,
            package: self.package.clone(),
            status: self.status,
        }
    }
}

fn day_arg(s: &str) -> Result<NaiveDate, String> {
    parse_day(s).ok_or_else(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
}
