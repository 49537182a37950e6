mod settings;

pub use settings::{Settings, SettingsError, parse_octal_mode};
