use crate::env::Environment;
use crate::error::ResolveError;
use nix::libc::mode_t;
use nix::sys::stat::Mode;
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Resolve a command name to an executable path the way a typical shell would.
///
/// Behavior:
/// - Absolute path (`/bin/ls`): checked as-is.
/// - Any other name containing `/`, or starting with `.`: joined onto the
///   snapshot's working directory, with `.` and `..` collapsed textually, then
///   checked.
/// - Bare name: each directory of `PATH` is tried left to right and the first
///   executable `<dir>/<name>` wins. A missing or empty `PATH` finds nothing;
///   there is no implicit current-directory fallback.
///
/// A match that exists but is not executable is [`ResolveError::PermissionDenied`],
/// distinct from [`ResolveError::NotFound`].
pub fn find_command_path(env: &Environment, name: &str) -> Result<PathBuf, ResolveError> {
    if name.is_empty() {
        return Err(ResolveError::NotFound);
    }

    if name.starts_with('/') {
        let path = PathBuf::from(name);
        check_executable(&path)?;
        return Ok(path);
    }

    if name.starts_with('.') || name.contains('/') {
        let path = collapse_dots(env.current_dir(), name);
        check_executable(&path)?;
        return Ok(path);
    }

    match env.get_var("PATH") {
        Some(search_paths) if !search_paths.is_empty() => find_in_path(search_paths, name),
        _ => Err(ResolveError::NotFound),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &str) -> Result<PathBuf, ResolveError> {
    let mut denied = false;
    for dir in std::env::split_paths(search_paths) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let path = dir.join(cmd);
        match check_executable(&path) {
            Ok(()) => return Ok(path),
            Err(ResolveError::PermissionDenied) => {
                trace!(candidate = %path.display(), "not executable, continuing");
                denied = true;
            }
            Err(ResolveError::NotFound) => {}
        }
    }
    if denied {
        Err(ResolveError::PermissionDenied)
    } else {
        Err(ResolveError::NotFound)
    }
}

/// Join `relative` onto `base`, dropping `.` segments and letting `..` remove
/// the previous one. Symlinks are not consulted.
pub fn collapse_dots(base: &Path, relative: &str) -> PathBuf {
    let mut out = base.to_path_buf();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            s => out.push(s),
        }
    }
    out
}

/// The file must exist, not be a directory, and carry the owner execute bit.
fn check_executable(path: &Path) -> Result<(), ResolveError> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(ResolveError::PermissionDenied);
        }
        Err(_) => return Err(ResolveError::NotFound),
    };
    let mode = Mode::from_bits_truncate(metadata.mode() as mode_t);
    if metadata.is_dir() || !mode.contains(Mode::S_IXUSR) {
        return Err(ResolveError::PermissionDenied);
    }
    Ok(())
}
