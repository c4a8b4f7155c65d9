use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// One shell line; the first word selects the command.
#[derive(Parser, Debug)]
#[command(multicall = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a directory
    Mkdir {
        name: String,
        /// Path of the parent directory, the root when omitted
        #[arg(long, short)]
        parent: Option<String>,
    },
    /// Create a file
    Touch {
        name: String,
        /// Path of the parent directory, the root when omitted
        #[arg(long, short)]
        parent: Option<String>,
    },
    /// Copy a file or directory into a directory
    Copy { source: String, destination: String },
    /// Move a file or directory into a directory
    Cut { source: String, destination: String },
    /// Detach a node and append it to a directory
    Paste { source: String, destination: String },
    /// Move every child of the second directory into the first
    Merge { into: String, from: String },
    /// Delete a node and everything below it
    #[command(alias = "rm")]
    Delete { name: String },
    /// Search by name
    Find { name: String },
    /// Search by `/`-separated path
    #[command(alias = "findpath")]
    Resolve { path: String },
    /// Write the structure to a text file
    Export { file: PathBuf },
    /// Read a text file into the root directory
    Import { file: PathBuf },
    /// List every node in level order
    #[command(alias = "ls")]
    Display,
    /// Show a directory found by path
    Open { path: String },
    /// Save a binary snapshot of the whole tree
    Save { file: PathBuf },
    /// Replace the tree with a binary snapshot
    Load { file: PathBuf },
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

impl Command {
    /// Parses a shell line. Blank lines yield `None`; `help` and malformed
    /// lines come back as a clap error carrying the text to show.
    pub fn parse_line(line: &str) -> Result<Option<Self>, clap::Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Ok(None);
        }
        ShellLine::try_parse_from(words).map(|parsed| Some(parsed.command))
    }
}
