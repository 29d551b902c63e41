// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! hitpack command-line tool.
//!
//! ```text
//! hitpack convert --from binary --to json response.bin
//! hitpack inspect response.json
//! hitpack sample --seed 7 --format binary -o sample.bin
//! ```
//!
//! Settings come from `cli.json` in the user config dir (or `--config PATH`);
//! command-line flags override them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_fs;

use anyhow::{Context, Result};
use cli::{Cli, Command};
use config::{CliConfig, ConfigService, CLI_CONFIG_KEY};
use config_fs::FsConfigStore;
use std::io::Write;
use std::path::Path;
use tracing::{debug, warn};

/// Execute the parsed command line, writing results to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "effective settings");
    match &cli.command {
        Command::Convert(args) => commands::convert(args, &config, out),
        Command::Inspect(args) => commands::inspect(args, &config, out),
        Command::Sample(args) => commands::sample(args, &config, out),
    }
}

/// Resolve settings from an explicit file or the user config dir.
///
/// An explicit file must exist and parse. A missing user config yields the
/// defaults.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    if let Some(path) = path {
        return config_fs::load_file(path)
            .with_context(|| format!("load config {}", path.display()));
    }
    let store = match FsConfigStore::new() {
        Ok(store) => store,
        Err(err) => {
            warn!(%err, "user config dir unavailable, using defaults");
            return Ok(CliConfig::default());
        }
    };
    let base = store.base().display().to_string();
    let loaded = ConfigService::new(store)
        .load(CLI_CONFIG_KEY)
        .with_context(|| format!("load config from {base}"))?;
    Ok(loaded.unwrap_or_default())
}
