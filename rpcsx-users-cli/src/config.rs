//! Command line and environment configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Directory name used under the platform data/config dirs
const APP_DIR: &str = "rpcsx";

/// Manage RPCSX user accounts
#[derive(Debug, Parser)]
#[command(name = "rpcsx-users", version, about)]
pub struct Cli {
    /// Emulator `dev_hdd0` directory (accounts live in `<hdd0>/home`)
    #[arg(long, env = "RPCSX_HDD0_DIR", global = true)]
    pub hdd0: Option<PathBuf>,

    /// Settings JSON file
    #[arg(long, env = "RPCSX_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List accounts, marking the signed-in one
    List,
    /// Print the signed-in user id
    Whoami,
    /// Create an account in the first free slot
    Create {
        /// 3-16 characters of `[A-Za-z0-9_]`
        username: String,
    },
    /// Rename an account
    Rename { user_id: String, username: String },
    /// Delete an account and all of its data
    Remove { user_id: String },
    /// Sign in as another account
    Login {
        user_id: String,
        /// Stop a running emulator instead of refusing
        #[arg(long)]
        stop_emulator: bool,
    },
}

/// Resolved filesystem locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub hdd0: PathBuf,
    pub settings: PathBuf,
}

impl Cli {
    /// Apply platform defaults to unset paths
    pub fn paths(&self) -> Paths {
        Paths {
            hdd0: self.hdd0.clone().unwrap_or_else(default_hdd0_dir),
            settings: self.settings.clone().unwrap_or_else(default_settings_path),
        }
    }
}

fn default_hdd0_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("dev_hdd0")
}

fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("settings.json")
}
