//! Slash-separated path helpers for the virtual file tree.
//!
//! Folders are implied by shared prefixes, so every containment check here
//! works on whole path segments: `/Foo` contains `/Foo/a.js` but not `/Foobar`.

use crate::error::TreeError;

/// Normalize a user-supplied path to the `/a/b` form.
pub fn normalize(raw: &str) -> Result<String, TreeError> {
    let segments: Vec<&str> = raw.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(TreeError::InvalidTarget(raw.to_string()));
    }
    let mut path = String::with_capacity(raw.len() + 1);
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    Ok(path)
}

/// Parent folder of `path`; the root parent is the empty string.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Last segment of `path`.
#[cfg(test)]
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// True when `path` lies strictly below the folder `folder`.
pub fn is_under(path: &str, folder: &str) -> bool {
    path.len() > folder.len() + 1
        && path.starts_with(folder)
        && path.as_bytes()[folder.len()] == b'/'
}

/// True when `path` is `root` itself or lies below it.
pub fn is_within(path: &str, root: &str) -> bool {
    path == root || is_under(path, root)
}

/// Replace the `old_root` prefix of `path` with `new_root`.
pub fn rebase(path: &str, old_root: &str, new_root: &str) -> String {
    debug_assert!(is_within(path, old_root));
    format!("{}{}", new_root, &path[old_root.len()..])
}

/// Proper ancestors of `path`, outermost first: `/a/b/c` yields `/a`, `/a/b`.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    path.char_indices()
        .filter(|&(idx, ch)| ch == '/' && idx > 0)
        .map(move |(idx, _)| &path[..idx])
}
