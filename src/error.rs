use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: file does not exist or permission denied", .0.display())]
    NotFound(PathBuf),

    #[error("error getting current folder: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to launch disassembler {}: {source}", program.display())]
    Disassembler {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: object parse error: {source}", path.display())]
    Object {
        path: PathBuf,
        #[source]
        source: goblin::error::Error,
    },

    #[error("{}: unrecognised object format (magic {magic:#x})", path.display())]
    UnknownObject { path: PathBuf, magic: u64 },

    #[error("could not find entry point `{entry_point}`: input is not an executable")]
    UnsupportedInput { entry_point: String },

    #[error("invalid template: {0}")]
    Template(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for failures to obtain the disassembly stream in the first place.
    pub fn is_input_access(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::NotFound(_)
                | Self::CurrentDir(_)
                | Self::Disassembler { .. }
                | Self::Object { .. }
                | Self::UnknownObject { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
