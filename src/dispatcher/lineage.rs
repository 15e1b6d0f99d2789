//! Namespace helpers: cleaning, relative-to-absolute conversion and the
//! walk from a namespace up to the root.

/// Normalise a namespace: leading, trailing and repeated slashes are removed.
///
/// `"/a///b/"` becomes `"a/b"`; `"/"` becomes the root `""`.
#[must_use]
pub fn clean_namespace(namespace: &str) -> String {
    namespace
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Ancestors of a namespace, most specific first, root excluded.
///
/// `"a/b/c"` yields `["a/b/c", "a/b", "a"]`; the root yields nothing.
pub(crate) fn namespace_lineage(namespace: &str) -> impl Iterator<Item = &str> {
    let mut pos = Some(namespace.len()).filter(|len| *len > 0);
    std::iter::from_fn(move || {
        let end = pos?;
        let current = &namespace[..end];
        pos = current.rfind('/').filter(|i| *i > 0);
        Some(current)
    })
}

/// Turn a forward target into an absolute path without its leading slash.
///
/// Names not starting with `/` are relative to `current_namespace`.
pub(crate) fn action_rel_to_abs(current_namespace: &str, path: &str) -> String {
    let absolute = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("{current_namespace}/{path}")
    };
    match absolute.strip_prefix('/') {
        Some(stripped) => stripped.to_string(),
        None => absolute,
    }
}

/// Split an absolute path into `(namespace, name)` at its last slash
pub(crate) fn split_action_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => ("", path),
    }
}
