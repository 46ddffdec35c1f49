//! Where the identifiers of a batch come from: a single identifier on the
//! command line, a file with identifiers, or `-` for standard input.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    Single(String),
    File(PathBuf),
    Stdin,
}

impl TargetSource {
    /// `-` means stdin, an existing file is read, anything else is an identifier.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else if Path::new(arg).is_file() {
            Self::File(PathBuf::from(arg))
        } else {
            Self::Single(arg.to_string())
        }
    }

    pub async fn read(&self) -> Result<Vec<String>> {
        match self {
            Self::Single(id) => Ok(vec![id.clone()]),
            Self::File(path) => {
                let file = File::open(path)
                    .await
                    .with_context(|| format!("failed to open targets file {}", path.display()))?;
                read_ids(BufReader::new(file))
                    .await
                    .with_context(|| format!("failed to read targets file {}", path.display()))
            }
            Self::Stdin => read_ids(BufReader::new(tokio::io::stdin()))
                .await
                .context("failed to read targets from stdin"),
        }
    }
}

/// Every whitespace-separated token is an identifier. A blank line yields one
/// empty identifier, which is kept so the line still shows up in the report.
pub async fn read_ids(reader: impl AsyncBufRead + Unpin) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let before = ids.len();
        ids.extend(line.split_whitespace().map(str::to_string));
        if ids.len() == before {
            ids.push(String::new());
        }
    }
    Ok(ids)
}
