use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::data::LogLevel;
use crate::config::parse_octal_mode;

const MAX_MODE: u32 = 0o7777;

fn parse_mode(input: &str) -> Result<u32, String> {
    match parse_octal_mode(input) {
        Ok(mode) if mode <= MAX_MODE => Ok(mode),
        Ok(mode) => Err(format!("mode {mode:o} is out of range")),
        Err(error) => Err(format!("'{input}' is not an octal mode: {error}")),
    }
}

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Walk, copy, delete and chmod filesystem trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// Directory holding the optional treekit.yaml settings file
    #[clap(long, short, default_value = ".", global = true)]
    pub root: PathBuf,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the normalized form of a path
    Normalize { path: String },
    /// Join path fragments and normalize the result
    Join {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Tell whether a path is absolute
    IsAbsolute { path: String },
    /// List every file and directory below a directory, in natural order
    Ls { dir: PathBuf },
    /// Print the total size of the files below a directory
    Size {
        dir: PathBuf,
        #[arg(long, short)]
        decimals: Option<usize>,
        /// Print the raw byte count instead of a formatted size
        #[arg(long)]
        bytes: bool,
    },
    /// Format a byte count in base-1024 units
    Format {
        bytes: u64,
        #[arg(long, short)]
        decimals: Option<usize>,
    },
    /// Create a directory and its missing parents
    Mkdir {
        dir: PathBuf,
        #[arg(long, short, value_parser = parse_mode)]
        mode: Option<u32>,
    },
    /// Copy a file or a directory tree (a directory target is emptied first)
    Cp {
        origin: PathBuf,
        target: PathBuf,
        #[arg(long)]
        no_overwrite: bool,
    },
    /// Delete files or directory trees; absent paths are ignored
    Rm {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Move a file or a directory tree
    Mv {
        origin: PathBuf,
        target: PathBuf,
        #[arg(long)]
        no_overwrite: bool,
    },
    /// Recursively apply directory and file modes
    Writable {
        path: PathBuf,
        #[arg(long, value_parser = parse_mode)]
        dir_mode: Option<u32>,
        #[arg(long, value_parser = parse_mode)]
        file_mode: Option<u32>,
    },
    /// Print a file's content
    Read { file: PathBuf },
    /// Write content to a file, creating its parent directories
    Write {
        file: PathBuf,
        content: String,
        #[arg(long, short, value_parser = parse_mode)]
        mode: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["treekit", "ls", "some/dir", "--log-level", "debug"])
            .expect("Arguments should parse");

        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(
            cli.command,
            Command::Ls {
                dir: PathBuf::from("some/dir")
            }
        );
    }

    #[test]
    fn parses_octal_modes() {
        let cli = Cli::try_parse_from([
            "treekit",
            "writable",
            "tree",
            "--dir-mode",
            "0o755",
            "--file-mode",
            "644",
        ])
        .expect("Arguments should parse");

        assert_eq!(
            cli.command,
            Command::Writable {
                path: PathBuf::from("tree"),
                dir_mode: Some(0o755),
                file_mode: Some(0o644),
            }
        );
    }

    #[test]
    fn rejects_out_of_range_mode() {
        let result = Cli::try_parse_from(["treekit", "mkdir", "dir", "--mode", "77777"]);
        assert!(result.is_err());
    }

    #[test]
    fn rm_requires_a_path() {
        let result = Cli::try_parse_from(["treekit", "rm"]);
        assert!(result.is_err());
    }
}
