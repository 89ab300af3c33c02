//! Request-path to filesystem-path resolution.
//!
//! Resolution is purely lexical: the decoded request path is rebuilt from
//! its components and joined under the served root by the caller. Anything
//! that could climb out of the root (`..` segments in any encoding,
//! backslash separators) is rejected before the filesystem is touched.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Why a request path could not be mapped onto the served root.
#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// The decoded path tries to escape the served root.
    Traversal,
    /// The path percent-decodes to invalid UTF-8 or contains a NUL byte.
    InvalidEncoding,
}

/// Map a raw request path to a path relative to the served root.
///
/// Returns an empty path for `/`, which callers treat as the root directory
/// itself.
pub fn resolve_path(raw: &str) -> Result<PathBuf, ResolveError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| ResolveError::InvalidEncoding)?;

    if decoded.contains('\0') {
        return Err(ResolveError::InvalidEncoding);
    }

    // Some clients smuggle traversal through backslash separators; nothing
    // legitimately served here relies on them.
    if decoded.contains('\\') {
        return Err(ResolveError::Traversal);
    }

    let trimmed = decoded.trim_matches('/');
    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::RootDir | Component::CurDir => {}
            Component::Normal(segment) => relative.push(segment),
            Component::ParentDir | Component::Prefix(_) => return Err(ResolveError::Traversal),
        }
    }

    Ok(relative)
}
