//! Path primitives for navigation.
//!
//! All decisions go through `Path::components` and `Path::parent` so that
//! drive prefixes, UNC shares and Unix roots are handled by the host's own
//! path rules rather than by string matching.
use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically normalise a path: drop `.`, let `..` remove the preceding
/// component, and never climb above the root.
///
/// Symlinks are not resolved, so `..` out of a symlinked directory returns
/// to the directory the user came from.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // Already at the root (or a bare drive prefix).
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                // Relative path that starts by going up: keep the `..`.
                _ => out.push(Component::ParentDir.as_os_str()),
            },
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

/// Make `path` absolute against the working directory, then normalise it.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    Ok(normalize(&std::path::absolute(path)?))
}

/// Join `key` onto `base` and normalise the result.
pub fn resolve(base: &Path, key: &Path) -> PathBuf {
    normalize(&base.join(key))
}

/// `true` if `path` is a filesystem root, i.e. its normalised form has no parent.
pub fn is_root(path: &Path) -> bool {
    normalize(path).parent().is_none()
}

/// The normalised parent of `path`, or `None` at a root.
pub fn parent_of(path: &Path) -> Option<PathBuf> {
    normalize(path).parent().map(Path::to_path_buf)
}
