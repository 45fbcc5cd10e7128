use std::path::{Path, PathBuf};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }

    fn exe_suffix(self) -> &'static str {
        match self {
            Platform::Windows => ".exe",
            Platform::Unix => "",
        }
    }

    pub fn executable(self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}{}", name, self.exe_suffix()))
    }
}

/// Windows builds land in `Release/` or `Debug/` under the source dir.
/// `Release/` wins whenever it exists.
pub fn resolve_bin_dir(platform: Platform, base: &Path) -> PathBuf {
    match platform {
        Platform::Unix => base.to_path_buf(),
        Platform::Windows => {
            let release = base.join("Release");
            if release.is_dir() {
                debug!(dir = %release.display(), "using release binaries");
                release
            } else {
                let fallback = base.join("Debug");
                debug!(dir = %fallback.display(), "no release build found, using debug binaries");
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_uses_base_dir_as_is() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("Release")).unwrap();
        assert_eq!(resolve_bin_dir(Platform::Unix, tmp.path()), tmp.path());
    }

    #[test]
    fn windows_prefers_release() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("Release")).unwrap();
        std::fs::create_dir(tmp.path().join("Debug")).unwrap();
        assert_eq!(
            resolve_bin_dir(Platform::Windows, tmp.path()),
            tmp.path().join("Release")
        );
    }

    #[test]
    fn windows_falls_back_to_debug() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_bin_dir(Platform::Windows, tmp.path()),
            tmp.path().join("Debug")
        );
    }

    #[test]
    fn release_must_be_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("Release"), b"").unwrap();
        assert_eq!(
            resolve_bin_dir(Platform::Windows, tmp.path()),
            tmp.path().join("Debug")
        );
    }

    #[test]
    fn executable_suffix_follows_platform() {
        let dir = Path::new("src");
        assert_eq!(Platform::Unix.executable(dir, "Server"), dir.join("Server"));
        assert_eq!(Platform::Windows.executable(dir, "Client"), dir.join("Client.exe"));
    }
}
