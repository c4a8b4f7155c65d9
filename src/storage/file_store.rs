use std::path::{Path, PathBuf};

use compio::fs;
use snafu::{ResultExt, Snafu};
use tracing::debug;

/// Reads the whole file and splits it into lines.
pub async fn read_lines(path: &Path) -> Result<Vec<String>, StorageError> {
    let bytes = read_bytes(path).await?;
    let text = String::from_utf8(bytes).context(EncodingSnafu {
        path: path.to_path_buf(),
    })?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Replaces the file with `lines`, each terminated by a newline.
pub async fn write_lines(path: &Path, lines: &[String]) -> Result<(), StorageError> {
    let mut text = String::with_capacity(lines.iter().map(|line| line.len() + 1).sum());
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    write_bytes(path, text.into_bytes()).await
}

pub async fn read_bytes(path: &Path) -> Result<Vec<u8>, StorageError> {
    debug!("Reading {}", path.display());
    let bytes = fs::read(path).await.context(NotOpenableSnafu {
        path: path.to_path_buf(),
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

pub async fn write_bytes(path: &Path, bytes: Vec<u8>) -> Result<(), StorageError> {
    debug!("Writing {} bytes to {}", bytes.len(), path.display());
    let res = fs::write(path, bytes).await;
    res.0.context(IoFailureSnafu {
        path: path.to_path_buf(),
    })?;
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum StorageError {
    #[snafu(display("Unable to open file: {}", path.display()))]
    NotOpenable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Unable to create file: {}", path.display()))]
    IoFailure {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("File is not valid UTF-8: {}", path.display()))]
    EncodingError {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
}
