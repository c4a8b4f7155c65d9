mod settings;

pub use settings::{Settings, SettingsError, get_settings_file_path};
