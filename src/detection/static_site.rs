use std::path::{Path, PathBuf};

use crate::framework::FrameworkId;

/// Find the first static-site candidate directory holding an index marker.
///
/// Returns the directory and the marker file, both relative to `root`.
pub fn find_static_root(root: &Path) -> Option<(PathBuf, PathBuf)> {
    let variant = FrameworkId::Static.variant();

    for dir in variant.output_dirs {
        for marker in variant.static_markers {
            let candidate = Path::new(dir).join(marker);
            if root.join(&candidate).is_file() {
                return Some((
                    PathBuf::from(dir),
                    strip_current_dir(&candidate),
                ));
            }
        }
    }

    None
}

fn strip_current_dir(path: &Path) -> PathBuf {
    path.strip_prefix(".").unwrap_or(path).to_path_buf()
}
