use crate::cli::{Cli, Command};
use crate::config::Settings;

/// The command to run together with the defaults that fill in any flag the
/// user left out.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command: Command,
    pub settings: Settings,
}

impl RuntimeConfig {
    pub fn new(cli: Cli, settings: Settings) -> Self {
        Self {
            command: cli.command,
            settings,
        }
    }

    pub fn decimals(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.settings.decimals)
    }

    pub fn dir_mode(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.settings.dir_mode)
    }

    pub fn file_mode(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.settings.file_mode)
    }

    /// `--no-overwrite` can only tighten what the settings allow.
    pub fn overwrite(&self, no_overwrite: bool) -> bool {
        self.settings.overwrite && !no_overwrite
    }
}
