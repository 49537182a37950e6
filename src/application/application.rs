use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;
use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info};

use treekit::ext::NormalizedPathExt;
use treekit::filesystem::{self, FsError, bytes};
use treekit::path::{is_absolute, join, normalize};

use crate::application::RuntimeConfig;
use crate::cli::{Cli, Command};
use crate::config::{Settings, SettingsError};

pub struct Application;

impl Application {
    pub fn run(cli: Cli) -> Result<(), ApplicationError> {
        let settings = Settings::read(&cli.root).context(LoadSettingsSnafu)?;
        debug!("Loaded settings: {:?}", settings);

        colored::control::set_override(supports_color::on(Stream::Stdout).is_some());

        let config = RuntimeConfig::new(cli, settings);
        let stdout = io::stdout();
        Self::execute(&config, &mut stdout.lock())
    }

    /// Runs the configured command, writing its output to `out`.
    pub fn execute(config: &RuntimeConfig, out: &mut impl Write) -> Result<(), ApplicationError> {
        match &config.command {
            Command::Normalize { path } => {
                writeln!(out, "{}", normalize(path)).context(OutputSnafu)?;
            }
            Command::Join { paths } => {
                writeln!(out, "{}", join(paths)).context(OutputSnafu)?;
            }
            Command::IsAbsolute { path } => {
                writeln!(out, "{}", is_absolute(path)).context(OutputSnafu)?;
            }
            Command::Ls { dir } => {
                for path in filesystem::list(dir).context(OperationSnafu)? {
                    Self::print_path(out, &path)?;
                }
            }
            Command::Size {
                dir,
                decimals,
                bytes: raw,
            } => {
                let total = filesystem::size(dir);
                if *raw {
                    writeln!(out, "{total}").context(OutputSnafu)?;
                } else {
                    let formatted = bytes::format_with(total, config.decimals(*decimals));
                    writeln!(out, "{formatted}").context(OutputSnafu)?;
                }
            }
            Command::Format {
                bytes: count,
                decimals,
            } => {
                let formatted = bytes::format_with(*count, config.decimals(*decimals));
                writeln!(out, "{formatted}").context(OutputSnafu)?;
            }
            Command::Mkdir { dir, mode } => {
                filesystem::create_dir(dir, config.dir_mode(*mode)).context(OperationSnafu)?;
            }
            Command::Cp {
                origin,
                target,
                no_overwrite,
            } => {
                filesystem::copy(origin, target, config.overwrite(*no_overwrite))
                    .context(OperationSnafu)?;
                info!(
                    "Copied {} to {}",
                    origin.normalized_display(),
                    target.normalized_display()
                );
            }
            Command::Rm { paths } => {
                for path in paths {
                    filesystem::delete(path).context(OperationSnafu)?;
                    info!("Deleted {}", path.normalized_display());
                }
            }
            Command::Mv {
                origin,
                target,
                no_overwrite,
            } => {
                filesystem::rename(origin, target, config.overwrite(*no_overwrite))
                    .context(OperationSnafu)?;
                info!(
                    "Moved {} to {}",
                    origin.normalized_display(),
                    target.normalized_display()
                );
            }
            Command::Writable {
                path,
                dir_mode,
                file_mode,
            } => {
                filesystem::make_writable(
                    path,
                    config.dir_mode(*dir_mode),
                    config.file_mode(*file_mode),
                )
                .context(OperationSnafu)?;
            }
            Command::Read { file } => {
                let content = filesystem::read(file).context(OperationSnafu)?;
                out.write_all(&content).context(OutputSnafu)?;
            }
            Command::Write {
                file,
                content,
                mode,
            } => {
                filesystem::write(file, content, *mode).context(OperationSnafu)?;
            }
        }

        Ok(())
    }

    fn print_path(out: &mut impl Write, path: &Path) -> Result<(), ApplicationError> {
        let display = path.display().to_string();
        if path.is_dir() {
            writeln!(out, "{}", display.blue().bold())
        } else {
            writeln!(out, "{display}")
        }
        .context(OutputSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading settings"))]
    LoadSettingsError { source: SettingsError },
    #[snafu(display("Filesystem operation failed"))]
    OperationError { source: FsError },
    #[snafu(display("Failed to write command output"))]
    OutputError { source: std::io::Error },
}
