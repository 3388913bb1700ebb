use std::{
    borrow::Cow,
    path::{Component, Path, PathBuf},
};

/// Render a relative path with forward slashes and without `.` segments,
/// as platform manifests expect. An empty result becomes `.`.
pub fn to_slash(path: &Path) -> String {
    let parts: Vec<Cow<'_, str>> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            Component::ParentDir => Some(Cow::Borrowed("..")),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {
                None
            }
        })
        .collect();

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// `path` relative to `root` when it lives inside it, otherwise unchanged.
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(|rel| {
            if rel.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                rel.to_path_buf()
            }
        })
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_slash_drops_current_dir_segments() {
        assert_eq!(
            to_slash(Path::new("./server/index.mjs")),
            "server/index.mjs"
        );
        assert_eq!(to_slash(Path::new("dist/./assets")), "dist/assets");
    }

    #[test]
    fn to_slash_of_current_dir_is_dot() {
        assert_eq!(to_slash(Path::new(".")), ".");
        assert_eq!(to_slash(Path::new("./.")), ".");
    }

    #[test]
    fn to_slash_keeps_parent_segments() {
        assert_eq!(
            to_slash(Path::new("dist/_worker.js/..")),
            "dist/_worker.js/.."
        );
    }

    #[test]
    fn relative_to_strips_root() {
        let root = Path::new("/work/app");
        assert_eq!(
            relative_to(root, Path::new("/work/app/.open-next")),
            PathBuf::from(".open-next")
        );
        assert_eq!(relative_to(root, root), PathBuf::from("."));
        assert_eq!(
            relative_to(root, Path::new("/elsewhere")),
            PathBuf::from("/elsewhere")
        );
    }
}
