use std::{
    borrow::Cow,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::filesystem::{
    CutPolicy, DEFAULT_ROOT_NAME, ExportOrder, ImportMode, PathResolution, TreePolicy,
};

const SETTINGS_FILE_NAME: &str = "treefs.yaml";

pub fn get_settings_file_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE_NAME)
}

fn key(name: &'static str) -> Yaml<'static> {
    Yaml::Value(Scalar::String(Cow::Borrowed(name)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root_name: String,
    pub policy: TreePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            policy: TreePolicy::default(),
        }
    }
}

impl Settings {
    /// Reads `treefs.yaml` from `root`, falling back to defaults when the
    /// file does not exist.
    pub async fn read(root: &Path) -> Result<Self, SettingsError> {
        Self::from_path(get_settings_file_path(root)).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, SettingsError> {
        debug!("Opening settings file: {}", path.display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(error) => {
                return Err(error).context(ReadSnafu {
                    file_path: path.display().to_string(),
                });
            }
        };

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        let settings = Self::try_from(contents.as_str())?;
        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    fn parse_policy(
        policies: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<TreePolicy, SettingsError> {
        let mut policy = TreePolicy::default();

        for (name, value) in policies {
            let Some(name) = name.as_str() else {
                debug!("Skipping non-string policy key: {:?}", name);
                continue;
            };
            let raw = value.as_str().context(InvalidValueSnafu {
                key: name,
                value: format!("{value:?}"),
            })?;
            let invalid = || InvalidValueSnafu {
                key: name,
                value: raw,
            };

            match name {
                "path_resolution" => {
                    policy.path_resolution =
                        PathResolution::from_setting(raw).with_context(invalid)?
                }
                "cut" => policy.cut = CutPolicy::from_setting(raw).with_context(invalid)?,
                "export_order" => {
                    policy.export_order = ExportOrder::from_setting(raw).with_context(invalid)?
                }
                "import" => policy.import = ImportMode::from_setting(raw).with_context(invalid)?,
                other => debug!("Skipping unknown policy '{}'", other),
            }
        }

        Ok(policy)
    }
}

impl TryFrom<&str> for Settings {
    type Error = SettingsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let Some(document) = documents.first() else {
            return Ok(Self::default());
        };
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let mut settings = Self::default();

        if let Some(value) = top_level.get(&key("root_name")) {
            let root_name = value
                .as_str()
                .filter(|name| !name.is_empty())
                .context(InvalidValueSnafu {
                    key: "root_name",
                    value: format!("{value:?}"),
                })?;
            settings.root_name = root_name.to_string();
        }

        if let Some(value) = top_level.get(&key("policies")) {
            let policies = value.as_mapping().context(PoliciesNotMapSnafu)?;
            settings.policy = Self::parse_policy(policies)?;
        }

        Ok(settings)
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsError {
    #[snafu(display("Failed to read the settings file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Settings file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Top level of settings should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Policies section should be a map"))]
    PoliciesNotMap,
    #[snafu(display("Invalid value for '{}': {}", key, value))]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use tempfile::TempDir;

    #[compio::test]
    async fn missing_settings_file_yields_defaults() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let settings = Settings::read(dir.path()).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[compio::test]
    async fn settings_file_is_read_from_the_root() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(
            get_settings_file_path(dir.path()),
            "root_name: home\npolicies:\n  cut: duplicate\n",
        )
        .expect("Failed to write settings file");

        let settings = Settings::read(dir.path()).await.unwrap();

        assert_eq!(settings.root_name, "home");
        assert_eq!(settings.policy.cut, CutPolicy::Duplicate);
        assert_eq!(settings.policy.import, ImportMode::Atomic);
    }

    #[compio::test]
    async fn settings_directory_instead_of_file_is_a_read_error() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir(get_settings_file_path(dir.path())).unwrap();

        let result = Settings::read(dir.path()).await;

        assert!(matches!(result, Err(SettingsError::ReadError { .. })));
    }

    #[test]
    fn full_settings_are_parsed() {
        let yaml = r#"
root_name: "/"
policies:
  path_resolution: reversed
  cut: duplicate
  export_order: stack
  import: prefix
"#;
        let settings = Settings::try_from(yaml).unwrap();
        assert_eq!(settings.root_name, "/");
        assert_eq!(
            settings.policy,
            TreePolicy {
                path_resolution: PathResolution::Reversed,
                cut: CutPolicy::Duplicate,
                export_order: ExportOrder::Stack,
                import: ImportMode::Prefix,
            }
        );
    }

    #[rstest]
    #[case("")]
    #[case("other: value")]
    #[case("policies: {}")]
    #[case("policies:\n  unknown_policy: whatever")]
    fn partial_settings_fall_back_to_defaults(#[case] yaml: &str) {
        let settings = Settings::try_from(yaml).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let result = Settings::try_from("invalid: yaml: content: [unclosed");
        assert!(matches!(result, Err(SettingsError::ParseError { .. })));
    }

    #[rstest]
    #[case("- item1\n- item2")]
    #[case("just a string")]
    fn top_level_must_be_a_map(#[case] yaml: &str) {
        assert!(matches!(
            Settings::try_from(yaml),
            Err(SettingsError::TopLevelNotMap)
        ));
    }

    #[test]
    fn policies_must_be_a_map() {
        assert!(matches!(
            Settings::try_from("policies:\n  - cut"),
            Err(SettingsError::PoliciesNotMap)
        ));
    }

    #[rstest]
    #[case("policies:\n  cut: teleport", "cut")]
    #[case("policies:\n  import: [a, b]", "import")]
    #[case("root_name: ''", "root_name")]
    fn unsupported_values_are_rejected(#[case] yaml: &str, #[case] expected_key: &str) {
        match Settings::try_from(yaml) {
            Err(SettingsError::InvalidValue { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }
}
