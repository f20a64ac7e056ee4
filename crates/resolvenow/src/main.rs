// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ResolveNow - complaint ticketing with realtime agent chat.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod serve;
mod shutdown;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use resolvenow_config::{ConfigError, ResolveNowConfig};
use resolvenow_core::ResolveError;

/// ResolveNow - complaint ticketing with realtime agent chat.
#[derive(Parser, Debug)]
#[command(name = "resolvenow", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP and WebSocket server (default).
    Serve,
    /// Create an admin account.
    CreateAdmin {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Validate configuration and print the effective values.
    CheckConfig,
}

fn load(path: Option<&Path>) -> Result<ResolveNowConfig, Vec<ConfigError>> {
    match path {
        Some(path) => resolvenow_config::load_and_validate_path(path),
        None => resolvenow_config::load_and_validate(),
    }
}

fn check_config(config: &ResolveNowConfig) -> Result<(), ResolveError> {
    let rendered = resolvenow_config::render_effective(config)
        .map_err(|e| ResolveError::Config(e.to_string()))?;
    println!("{rendered}");
    eprintln!("resolvenow: configuration is valid");
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            resolvenow_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::CreateAdmin {
            name,
            email,
            password,
        } => admin::run_create_admin(&config, name, email, password).await,
        Commands::CheckConfig => check_config(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["resolvenow"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn create_admin_requires_all_flags() {
        assert!(Cli::try_parse_from(["resolvenow", "create-admin", "--name", "Root"]).is_err());
        let cli = Cli::try_parse_from([
            "resolvenow",
            "create-admin",
            "--name",
            "Root",
            "--email",
            "root@example.com",
            "--password",
            "hunter22",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::CreateAdmin { .. })));
    }

    #[test]
    fn config_flag_is_global() {
        let cli =
            Cli::try_parse_from(["resolvenow", "check-config", "--config", "/tmp/r.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/r.toml")));
    }
}
