use std::io::{self, Cursor, IsTerminal};

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{Settings, SettingsError};
use crate::shell::{Session, Shell, ShellError, stdout_supports_color};
use crate::storage::{self, StorageError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let settings = Settings::read(&app_config.root)
            .await
            .context(SettingsSnafu)?;
        debug!("Loaded settings: {:?}", settings);

        let session =
            Session::new(settings, app_config.root.clone()).with_color(stdout_supports_color());
        let stdout = io::stdout().lock();

        match &app_config.script {
            Some(script) => {
                info!("Running script {}", script.display());
                let bytes = storage::read_bytes(script).await.context(ScriptSnafu)?;
                Shell::new(session, Cursor::new(bytes), stdout)
                    .run()
                    .await
                    .context(ShellExecutionSnafu)?;
            }
            None => {
                let stdin = io::stdin();
                let interactive = stdin.is_terminal();
                Shell::new(session, stdin.lock(), stdout)
                    .interactive(interactive)
                    .run()
                    .await
                    .context(ShellExecutionSnafu)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while reading settings"))]
    SettingsError { source: SettingsError },
    #[snafu(display("Critical failure encountered while reading the script"))]
    ScriptError { source: StorageError },
    #[snafu(display("Critical failure encountered during shell execution"))]
    ShellExecutionError { source: ShellError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::get_settings_file_path;
    use tempfile::TempDir;

    #[compio::test]
    async fn script_commands_write_into_the_root() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let script = dir.path().join("commands.txt");
        std::fs::write(&script, "mkdir docs\ntouch a.txt -p docs\nexport out.txt\nexit\n")
            .expect("Failed to write script");

        Application::run(RuntimeConfig {
            root: dir.path().to_path_buf(),
            script: Some(script),
        })
        .await
        .unwrap();

        let exported = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(exported, "D root\n  D docs\n    F a.txt\n");
    }

    #[compio::test]
    async fn settings_shape_the_session() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(get_settings_file_path(dir.path()), "root_name: home\n").unwrap();
        let script = dir.path().join("commands.txt");
        std::fs::write(&script, "export out.txt\n").unwrap();

        Application::run(RuntimeConfig {
            root: dir.path().to_path_buf(),
            script: Some(script),
        })
        .await
        .unwrap();

        let exported = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(exported, "D home\n");
    }

    #[compio::test]
    async fn missing_script_is_an_error() {
        let dir = TempDir::new().expect("Failed to create temp directory");

        let result = Application::run(RuntimeConfig {
            root: dir.path().to_path_buf(),
            script: Some(dir.path().join("missing.txt")),
        })
        .await;

        assert!(matches!(result, Err(ApplicationError::ScriptError { .. })));
    }

    #[compio::test]
    async fn broken_settings_are_an_error() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(get_settings_file_path(dir.path()), "- not\n- a map\n").unwrap();

        let result = Application::run(RuntimeConfig {
            root: dir.path().to_path_buf(),
            script: None,
        })
        .await;

        assert!(matches!(result, Err(ApplicationError::SettingsError { .. })));
    }
}
