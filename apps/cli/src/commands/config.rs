//! `config show` and `config init`.

use clap::Subcommand;
use portos_client::ClientConfig;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{CliError, CliResult};
use crate::output::Output;

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the effective settings and where they come from
    Show,
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize)]
struct ConfigView<'a> {
    config_file: Option<PathBuf>,
    session_file: Option<PathBuf>,
    settings: &'a ClientConfig,
}

pub fn show(config: &ClientConfig, config_path: Option<PathBuf>, json: bool) -> CliResult<()> {
    let out = Output::new(json, &config.display.currency_symbol);
    let view = ConfigView {
        config_file: config_path.or_else(ClientConfig::default_config_path),
        session_file: config.session_path(),
        settings: config,
    };

    let rendered = toml::to_string_pretty(config)
        .map_err(|e| CliError::input(format!("cannot render config: {e}")))?;
    out.emit(Ok::<_, CliError>(view), |view| {
        match &view.config_file {
            Some(path) if path.exists() => println!("# config file: {}", path.display()),
            Some(path) => println!("# config file: {} (not created)", path.display()),
            None => println!("# config file: none"),
        }
        if let Some(path) = &view.session_file {
            println!("# session file: {}", path.display());
        }
        print!("{rendered}");
    })
}

pub fn init(config_path: Option<PathBuf>, force: bool, json: bool) -> CliResult<()> {
    let out = Output::new(json, portos_core::money::CURRENCY_SYMBOL);
    let target = config_path.clone().or_else(ClientConfig::default_config_path);

    if let Some(path) = target.as_ref().filter(|p| p.exists() && !force) {
        return out.emit(
            Err::<PathBuf, _>(CliError::input(format!(
                "{} already exists; pass --force to overwrite",
                path.display()
            ))),
            |_| {},
        );
    }

    let result = ClientConfig::default().save(target);
    out.emit(result, |path| println!("Wrote {}", path.display()))
}
