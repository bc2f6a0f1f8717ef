//! Command line and environment configuration.

use crate::error::ConfigError;
use crate::storage::{FileStore, Storage};
use clap::Parser;
use std::path::PathBuf;

const APP_DIR: &str = "tarefas";

#[derive(Debug, Parser)]
#[command(name = "tarefas", version, about = "Terminal task and project tracker")]
pub struct Cli {
    /// Directory holding the `tarefas.json` and `projetos.json` documents.
    #[arg(long, env = "TAREFAS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level or flexi_logger spec, e.g. `debug` or `info, tarefas=trace`.
    #[arg(long, env = "TAREFAS_LOG", default_value = "info")]
    pub log_level: String,

    /// Directory for rotating log files. Defaults to `<data-dir>/logs`.
    #[arg(long, env = "TAREFAS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to the data directory.
    #[arg(long)]
    pub ephemeral: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub ephemeral: bool,
}

impl Config {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let data_dir = match cli.data_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(ConfigError::NoDataDir)?,
        };
        let log_dir = cli.log_dir.unwrap_or_else(|| data_dir.join("logs"));
        Ok(Self {
            data_dir,
            log_dir,
            log_level: cli.log_level,
            ephemeral: cli.ephemeral,
        })
    }

    pub fn storage(&self) -> Storage {
        if self.ephemeral {
            Storage::in_memory()
        } else {
            Storage::new(FileStore::new(&self.data_dir))
        }
    }
}
