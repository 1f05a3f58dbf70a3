use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use tracing::debug;

use super::{Source, sanitise_path};
use crate::error::{Error, Result};

/// A file that already holds `go tool objdump` output.
#[derive(Debug, Clone)]
pub struct DumpReader {
    path: PathBuf,
}

impl DumpReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Source for DumpReader {
    fn open(&self) -> Result<Box<dyn BufRead + Send>> {
        let path = sanitise_path(&self.path)?;
        if !path.is_file() {
            return Err(Error::NotFound(path));
        }
        debug!(path = %path.display(), "opening dump file");
        Ok(Box::new(BufReader::new(File::open(&path)?)))
    }

    fn describe(&self) -> String {
        format!("dump file {}", self.path.display())
    }
}
