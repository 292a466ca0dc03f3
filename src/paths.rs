use std::path::PathBuf;

pub const TRANSFERS_DIR_NAME: &str = "AirXFiles";

// C:\\aaa\\1.txt -> C:/aaa/1.txt
pub fn normalize_path_format(path: &str) -> String {
    path.replace("\\\\", "/")
        .replace('\\', "/")
        .replace("//", "/")
}

pub fn file_name_of(remote_path: &str) -> String {
    let normalized = normalize_path_format(remote_path);
    let name = normalized
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("unknown");
    // Sender-controlled names must never escape the transfers directory.
    if name == "." || name == ".." {
        return "unknown".to_string();
    }
    name.to_string()
}

pub fn default_transfers_dir() -> PathBuf {
    if let Some(home) = home_dir() {
        return home.join("Downloads").join(TRANSFERS_DIR_NAME);
    }
    std::env::temp_dir().join(TRANSFERS_DIR_NAME)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("USERPROFILE").map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_should_convert_windows_separators() {
        assert_eq!(normalize_path_format("C:\\aaa\\1.txt"), "C:/aaa/1.txt");
        assert_eq!(normalize_path_format("/Users/miku/1.txt"), "/Users/miku/1.txt");
    }

    #[test]
    fn file_name_should_take_the_last_component() {
        assert_eq!(file_name_of("/Users/miku/1.txt"), "1.txt");
        assert_eq!(file_name_of("C:\\aaa\\report.pdf"), "report.pdf");
        assert_eq!(file_name_of("archive.tar.gz"), "archive.tar.gz");
    }

    #[test]
    fn file_name_should_skip_trailing_separators() {
        assert_eq!(file_name_of("/Users/miku/photos/"), "photos");
    }

    #[test]
    fn file_name_should_fall_back_for_degenerate_paths() {
        assert_eq!(file_name_of(""), "unknown");
        assert_eq!(file_name_of("///"), "unknown");
        assert_eq!(file_name_of("/Users/.."), "unknown");
    }

    #[test]
    fn default_transfers_dir_should_end_with_fixed_name() {
        let dir = default_transfers_dir();
        assert_eq!(
            dir.file_name().and_then(|value| value.to_str()),
            Some(TRANSFERS_DIR_NAME)
        );
    }
}
