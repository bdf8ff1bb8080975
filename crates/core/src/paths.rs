//! Fixed per-series locations, remote and local.

use std::path::{Path, PathBuf};

/// Remote path of the published document.
pub fn document_path(series: &str) -> String {
    format!("char/{series}.json")
}

/// Remote path of the version marker.
pub fn version_path(series: &str) -> String {
    format!("version/char/{series}.txt")
}

/// Remote path of the manual override document.
pub fn override_path(series: &str) -> String {
    format!("special/char/{series}.json")
}

/// Join a static root URL and a relative path with exactly one slash.
pub fn join_url(root: &str, path: &str) -> String {
    format!(
        "{}/{}",
        root.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Local snapshot of the published document.
pub fn snapshot_document_file(root: &Path, series: &str) -> PathBuf {
    root.join("data").join(format!("{series}.json"))
}

/// Local snapshot of the version marker.
pub fn snapshot_version_file(root: &Path, series: &str) -> PathBuf {
    root.join("version").join(format!("{series}.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_paths() {
        assert_eq!(document_path("arknights"), "char/arknights.json");
        assert_eq!(version_path("arknights"), "version/char/arknights.txt");
        assert_eq!(override_path("arknights"), "special/char/arknights.json");
    }

    #[test]
    fn join_url_normalises_slashes() {
        assert_eq!(
            join_url("https://static.example/", "/char/a.json"),
            "https://static.example/char/a.json"
        );
        assert_eq!(
            join_url("https://static.example", "char/a.json"),
            "https://static.example/char/a.json"
        );
    }

    #[test]
    fn snapshot_files_live_under_root() {
        let root = Path::new("/srv/charsync");
        assert_eq!(
            snapshot_document_file(root, "arknights"),
            PathBuf::from("/srv/charsync/data/arknights.json")
        );
        assert_eq!(
            snapshot_version_file(root, "arknights"),
            PathBuf::from("/srv/charsync/version/arknights.txt")
        );
    }
}
