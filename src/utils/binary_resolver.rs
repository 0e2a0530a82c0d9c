use anyhow::Result;
use std::path::PathBuf;

/// Locate the adb binary.
///
/// Checked in order: `$ANDROID_HOME/platform-tools`,
/// `$ANDROID_SDK_ROOT/platform-tools`, the default SDK location under the
/// home directory, then the system PATH.
pub fn find_adb() -> Result<PathBuf> {
    let mut checked_paths = Vec::new();

    for var in ["ANDROID_HOME", "ANDROID_SDK_ROOT"] {
        if let Ok(sdk) = std::env::var(var) {
            let adb_path = PathBuf::from(sdk).join("platform-tools").join(adb_name());
            checked_paths.push(format!("{}: {:?}", var, adb_path));
            if adb_path.exists() {
                return Ok(adb_path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        let sdk_dir = if cfg!(target_os = "macos") {
            home.join("Library").join("Android").join("sdk")
        } else {
            home.join("Android").join("Sdk")
        };
        let adb_path = sdk_dir.join("platform-tools").join(adb_name());
        checked_paths.push(format!("Default SDK: {:?}", adb_path));
        if adb_path.exists() {
            return Ok(adb_path);
        }
    }

    if let Ok(path) = which::which("adb") {
        return Ok(path);
    }

    Err(anyhow::anyhow!(
        "Could not find 'adb'. Install Android platform-tools or add adb to PATH. Checked:\n{}",
        checked_paths.join("\n")
    ))
}

/// Locate the scrcpy binary on the system PATH.
pub fn find_scrcpy() -> Result<PathBuf> {
    which::which("scrcpy")
        .map_err(|_| anyhow::anyhow!("Could not find 'scrcpy'. Is it installed and in PATH?"))
}

fn adb_name() -> &'static str {
    if cfg!(windows) {
        "adb.exe"
    } else {
        "adb"
    }
}
