use std::fs;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

use treekit::ext::NormalizedPathExt;
use treekit::filesystem::bytes::DEFAULT_DECIMALS;
use treekit::filesystem::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE};

const SETTINGS_FILE_NAME: &str = "treekit.yaml";
const MAX_MODE: u32 = 0o7777;

fn get_settings_file_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE_NAME)
}

/// Parses `755`, `0755` or `0o755` as an octal permission mode.
pub fn parse_octal_mode(input: &str) -> Result<u32, ParseIntError> {
    let digits = input.trim();
    let digits = digits
        .strip_prefix("0o")
        .or_else(|| digits.strip_prefix("0O"))
        .unwrap_or(digits);
    u32::from_str_radix(digits, 8)
}

/// Defaults applied by the command line when a flag is not given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dir_mode: u32,
    pub file_mode: u32,
    pub decimals: usize,
    pub overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: DEFAULT_FILE_MODE,
            decimals: DEFAULT_DECIMALS,
            overwrite: true,
        }
    }
}

impl Settings {
    /// Reads `treekit.yaml` from `root`, falling back to the defaults when
    /// the file does not exist.
    pub fn read(root: &Path) -> Result<Self, SettingsError> {
        let path = get_settings_file_path(root);
        if !path.is_file() {
            info!(
                "No settings file at {}, using defaults",
                path.normalized_display()
            );
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    pub fn from_path(path: PathBuf) -> Result<Self, SettingsError> {
        debug!("Reading settings file: {}", path.normalized_display());
        let contents = fs::read_to_string(&path).context(ReadSnafu {
            file_path: path.normalized_display(),
        })?;
        debug!("Successfully read settings file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    fn apply(mut self, top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, SettingsError> {
        for (key, value) in top_level {
            let Yaml::Value(Scalar::String(key)) = key else {
                debug!("Skipping non-string settings key: {:?}", key);
                continue;
            };

            match key.as_ref() {
                "dirMode" => self.dir_mode = parse_mode(key, value)?,
                "fileMode" => self.file_mode = parse_mode(key, value)?,
                "decimals" => self.decimals = parse_decimals(key, value)?,
                "overwrite" => self.overwrite = parse_bool(key, value)?,
                other => debug!("Ignoring unknown settings key '{}'", other),
            }
        }
        Ok(self)
    }
}

fn parse_mode(key: &str, value: &Yaml) -> Result<u32, SettingsError> {
    let mode = match value {
        // Unquoted digits are read the same way as on the command line
        Yaml::Value(Scalar::Integer(mode)) => parse_octal_mode(&mode.to_string()).ok(),
        Yaml::Value(Scalar::String(mode)) => parse_octal_mode(mode).ok(),
        _ => None,
    };
    mode.filter(|mode| *mode <= MAX_MODE)
        .context(InvalidModeSnafu {
            key,
            value: format!("{value:?}"),
        })
}

fn parse_decimals(key: &str, value: &Yaml) -> Result<usize, SettingsError> {
    match value {
        Yaml::Value(Scalar::Integer(decimals)) => usize::try_from(*decimals).ok(),
        _ => None,
    }
    .context(InvalidNumberSnafu {
        key,
        value: format!("{value:?}"),
    })
}

fn parse_bool(key: &str, value: &Yaml) -> Result<bool, SettingsError> {
    match value {
        Yaml::Value(Scalar::Boolean(flag)) => Some(*flag),
        _ => None,
    }
    .context(InvalidBoolSnafu {
        key,
        value: format!("{value:?}"),
    })
}

impl TryFrom<&str> for Settings {
    type Error = SettingsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents)
            .map_err(|e| SettingsError::ParseError { source: e })?;

        // An empty file carries no overrides
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };

        let top_level = document
            .as_mapping()
            .ok_or(SettingsError::TopLevelNotMap)?;

        Self::default().apply(top_level)
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsError {
    #[snafu(display("Failed to read the settings file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of the settings file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Setting '{}' is not a valid permission mode: {}", key, value))]
    InvalidMode { key: String, value: String },
    #[snafu(display("Setting '{}' should be a non-negative integer: {}", key, value))]
    InvalidNumber { key: String, value: String },
    #[snafu(display("Setting '{}' should be a boolean: {}", key, value))]
    InvalidBool { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempfile::TempDir;

    #[rstest]
    #[case("755", 0o755)]
    #[case("0755", 0o755)]
    #[case("0o644", 0o644)]
    #[case(" 700 ", 0o700)]
    fn parses_octal_modes(#[case] input: &str, #[case] expected: u32) {
        assert_eq!(parse_octal_mode(input).expect("Mode should parse"), expected);
    }

    #[rstest]
    #[case("")]
    #[case("888")]
    #[case("rwx")]
    fn rejects_non_octal_modes(#[case] input: &str) {
        assert!(parse_octal_mode(input).is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let settings = Settings::read(temp_dir.path()).expect("Missing file should be fine");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reads_settings_file_from_root() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(
            temp_dir.path().join(SETTINGS_FILE_NAME),
            "dirMode: \"0750\"\nfileMode: \"640\"\ndecimals: 1\noverwrite: false\n",
        )
        .expect("Failed to write settings file");

        let settings = Settings::read(temp_dir.path()).expect("Failed to read settings");
        assert_eq!(
            settings,
            Settings {
                dir_mode: 0o750,
                file_mode: 0o640,
                decimals: 1,
                overwrite: false,
            }
        );
    }

    #[rstest]
    #[case("fileMode: 644\ndirMode: 755", 0o755, 0o644)]
    #[case("fileMode: \"644\"\ndirMode: \"755\"", 0o755, 0o644)]
    #[case("fileMode: 600\ndirMode: 0700", 0o700, 0o600)]
    fn unquoted_modes_are_octal(
        #[case] contents: &str,
        #[case] dir_mode: u32,
        #[case] file_mode: u32,
    ) {
        let result: Result<Settings, _> = contents.try_into();
        let settings = result.expect("Failed to parse settings");
        assert_eq!(settings.dir_mode, dir_mode);
        assert_eq!(settings.file_mode, file_mode);
    }

    #[test]
    fn empty_content_yields_defaults() {
        let result: Result<Settings, _> = "".try_into();
        assert_eq!(result.expect("Empty settings are valid"), Settings::default());
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let result: Result<Settings, _> = "decimals: 3".try_into();
        let settings = result.expect("Failed to parse settings");
        assert_eq!(settings.decimals, 3);
        assert_eq!(settings.dir_mode, DEFAULT_DIR_MODE);
        assert!(settings.overwrite);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let result: Result<Settings, _> = "colour: blue\n42: answer".try_into();
        assert_eq!(result.expect("Unknown keys are fine"), Settings::default());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let result: Result<Settings, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(SettingsError::ParseError { .. })));
    }

    #[test]
    fn list_top_level_is_rejected() {
        let result: Result<Settings, _> = "- item1\n- item2".try_into();
        assert!(matches!(result, Err(SettingsError::TopLevelNotMap)));
    }

    #[rstest]
    #[case("dirMode: \"rwx\"")]
    #[case("fileMode: \"77777\"")]
    #[case("dirMode: [1, 2]")]
    #[case("fileMode: 648")]
    #[case("fileMode: -644")]
    fn invalid_modes_are_rejected(#[case] contents: &str) {
        let result: Result<Settings, _> = contents.try_into();
        assert!(matches!(result, Err(SettingsError::InvalidMode { .. })));
    }

    #[test]
    fn negative_decimals_are_rejected() {
        let result: Result<Settings, _> = "decimals: -1".try_into();
        assert!(matches!(result, Err(SettingsError::InvalidNumber { .. })));
    }

    #[test]
    fn non_boolean_overwrite_is_rejected() {
        let result: Result<Settings, _> = "overwrite: \"yes please\"".try_into();
        assert!(matches!(result, Err(SettingsError::InvalidBool { .. })));
    }
}
