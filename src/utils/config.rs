/// Default local filename for screenshots.
pub const DEFAULT_SCREENSHOT_FILE: &str = "screenshot.png";

/// Default local filename for screen recordings.
pub const DEFAULT_RECORD_FILE: &str = "video.mp4";

/// Environment variable overriding the on-device recording staging path.
pub const REMOTE_RECORD_PATH_VAR: &str = "MADB_REMOTE_RECORD_PATH";

/// Runtime configuration.
pub struct Config {
    /// On-device staging path for screen recordings. Some devices only let
    /// screenrecord write under /sdcard, hence the override.
    pub remote_record_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_record_path: "/data/local/tmp/screenrecord.mp4".to_string(),
        }
    }
}

impl Config {
    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(REMOTE_RECORD_PATH_VAR) {
            if !path.trim().is_empty() {
                config.remote_record_path = path;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_remote_path() {
        let config = Config::default();
        assert_eq!(
            config.remote_record_path,
            "/data/local/tmp/screenrecord.mp4"
        );
    }

    #[test]
    fn test_default_filenames() {
        assert_eq!(DEFAULT_SCREENSHOT_FILE, "screenshot.png");
        assert_eq!(DEFAULT_RECORD_FILE, "video.mp4");
    }

    #[test]
    fn test_remote_path_env_override() {
        std::env::set_var(REMOTE_RECORD_PATH_VAR, "/sdcard/screenrecord.mp4");
        let config = Config::from_env();
        std::env::remove_var(REMOTE_RECORD_PATH_VAR);
        assert_eq!(config.remote_record_path, "/sdcard/screenrecord.mp4");
    }
}
