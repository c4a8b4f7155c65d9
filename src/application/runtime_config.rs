use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Holds `treefs.yaml`; export, import and snapshot files resolve here.
    pub root: PathBuf,
    /// Commands to run instead of reading stdin.
    pub script: Option<PathBuf>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            script: cli.script,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn cli_arguments_become_runtime_config() {
        let cli = Cli::parse_from(["treefs", "--root", "work", "--script", "cmds.txt"]);
        let config = RuntimeConfig::from(cli);
        assert_eq!(config.root, PathBuf::from("work"));
        assert_eq!(config.script, Some(PathBuf::from("cmds.txt")));
    }

    #[test]
    fn defaults_read_stdin_in_the_current_directory() {
        let config = RuntimeConfig::from(Cli::parse_from(["treefs"]));
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.script, None);
    }
}
