// SPDX-FileCopyrightText: 2026 Skillbridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Skillbridge - a virtual assistant host that hands conversations to skills.
//!
//! This is the binary entry point.

mod serve;
mod skills;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use skillbridge_config::BridgeConfig;

/// Skillbridge - route conversation turns to remote skills.
#[derive(Parser, Debug)]
#[command(name = "skillbridge", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the standard lookup paths.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the assistant HTTP endpoint.
    Serve,
    /// List the registered skills and their actions.
    Skills,
    /// Validate configuration and skill manifests, then exit.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> BridgeConfig {
    let loaded = match path {
        Some(path) => skillbridge_config::load_and_validate_path(path),
        None => skillbridge_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            skillbridge_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("skillbridge: use --help for available commands");
        return;
    };

    let config = load_config(cli.config.as_ref());

    let result = match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Skills => skills::run_skills(&config),
        Commands::Check => skills::run_check(&config),
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
    fn parses_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["skillbridge", "serve", "--config", "bridge.toml"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.config, Some(PathBuf::from("bridge.toml")));
    }

    #[test]
    fn no_subcommand_is_accepted() {
        let cli = Cli::try_parse_from(["skillbridge"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["skillbridge", "deploy"]).is_err());
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = skillbridge_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.server.port, 3978);
    }
}
