use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Lexically cleans `input` and anchors relative paths at the current directory.
///
/// `..` above the root is dropped, so `/../etc/passwd` becomes `/etc/passwd`.
pub fn sanitise_path(input: impl AsRef<Path>) -> Result<PathBuf> {
    let input = input.as_ref();
    let absolute = if input.is_absolute() {
        input.to_path_buf()
    } else {
        env::current_dir().map_err(Error::CurrentDir)?.join(input)
    };
    Ok(clean(&absolute))
}

fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_cleaned() {
        assert_eq!(sanitise_path("/root/filename").unwrap(), PathBuf::from("/root/filename"));
        assert_eq!(sanitise_path("/../etc/passwd").unwrap(), PathBuf::from("/etc/passwd"));
        assert_eq!(sanitise_path("/a/./b/../c").unwrap(), PathBuf::from("/a/c"));
    }

    #[test]
    fn relative_paths_are_joined_onto_cwd() {
        let cwd = env::current_dir().unwrap();
        assert_eq!(sanitise_path("./filename").unwrap(), cwd.join("filename"));
        assert_eq!(sanitise_path("filename").unwrap(), cwd.join("filename"));
    }
}
