//! One thin wrapper per CLI operation.
//!
//! Each function builds a fixed adb (or scrcpy) argument list for one device.
//! Most of them let the child's own console output speak for itself; only
//! screenshot, wifi and record gate a confirmation line on a zero exit.

use crate::adb;
use crate::utils::binary_resolver;
use crate::utils::config::Config;
use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::process::Command;

/// `adb shell am force-stop PACKAGE`
pub async fn stop_package(serial: &str, package_name: &str) -> Result<()> {
    adb::run(serial, &["shell", "am", "force-stop", package_name]).await?;
    Ok(())
}

/// Launch a package through monkey and the launcher intent. The monkey
/// output is noise, so it is discarded.
pub async fn start_package(serial: &str, package_name: &str) -> Result<()> {
    adb::run_quiet(
        serial,
        &[
            "shell",
            "monkey",
            "-p",
            package_name,
            "-c",
            "android.intent.category.LAUNCHER",
            "1",
        ],
    )
    .await?;
    Ok(())
}

/// `adb shell pm clear PACKAGE`
pub async fn clear_package(serial: &str, package_name: &str) -> Result<()> {
    adb::run(serial, &["shell", "pm", "clear", package_name]).await?;
    Ok(())
}

/// `adb install APK`
pub async fn install_apk(serial: &str, apk_path: &str) -> Result<()> {
    adb::run(serial, &["install", apk_path]).await?;
    Ok(())
}

/// `adb uninstall PACKAGE`
pub async fn uninstall_package(serial: &str, package_name: &str) -> Result<()> {
    adb::run(serial, &["uninstall", package_name]).await?;
    Ok(())
}

/// Start scrcpy attached to the device and hand it the terminal until it
/// exits.
pub async fn run_scrcpy(serial: &str) -> Result<()> {
    let scrcpy_path = binary_resolver::find_scrcpy()?;

    log::debug!("scrcpy -s {}", serial);

    Command::new(scrcpy_path)
        .args(["-s", serial])
        .status()
        .await
        .context("Failed to execute scrcpy")?;
    Ok(())
}

/// Extract the device's IPv4 address from `ip addr show` output: the second
/// token of the first `inet` (but not `inet6`) line, with the `/prefix`
/// suffix stripped.
pub fn parse_ip_addr(output: &str) -> Option<String> {
    for line in output.lines() {
        if line.contains("inet") && !line.contains("inet6") {
            if let Some(token) = line.split_whitespace().nth(1) {
                if let Some(ip) = token.split('/').next() {
                    return Some(ip.to_string());
                }
            }
        }
    }
    None
}

/// Look up the device's wlan0 IPv4 address, print it when found.
pub async fn get_device_ip(serial: &str) -> Result<Option<String>> {
    let output = adb::shell(serial, "ip addr show wlan0").await?;

    match parse_ip_addr(&output) {
        Some(ip) => {
            println!("{}'s IP address is:\t {}", serial, ip);
            Ok(Some(ip))
        }
        None => {
            println!("Could not find IP address for device {}", serial);
            Ok(None)
        }
    }
}

/// Capture a screenshot over `exec-out screencap -p` and write the PNG bytes
/// locally.
pub async fn take_screenshot(serial: &str, filename: &str) -> Result<()> {
    let output = adb::output(serial, &["exec-out", "screencap", "-p"]).await?;

    std::fs::write(filename, &output.stdout)
        .with_context(|| format!("Failed to write {}", filename))?;

    if output.status.success() {
        println!("Screenshot saved to {}", filename);
    }
    Ok(())
}

/// Record the device screen until the stop flag is raised (Ctrl-C), then
/// pull the file off the device and clean up the staging copy.
pub async fn record_screen(serial: &str, filename: &str, stop: &AtomicBool) -> Result<()> {
    let config = Config::from_env();
    let remote_path = &config.remote_record_path;

    let mut child = adb::spawn_shell(serial, &format!("screenrecord {}", remote_path)).await?;

    println!("Recording... Press CTRL-C to stop.");

    while !stop.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    child.kill().await.ok();

    // screenrecord needs a moment to finalize the mp4 container before the
    // file is pullable.
    tokio::time::sleep(Duration::from_secs(2)).await;

    if adb::pull(serial, remote_path, filename).await? {
        println!("Screen recording saved to {}", filename);
    }

    adb::shell(serial, &format!("rm {}", remote_path)).await.ok();
    Ok(())
}

/// Switch the device's adbd to TCP and connect to it over WiFi.
pub async fn connect_wifi(serial: &str) -> Result<()> {
    let output = adb::shell(serial, "ip addr show wlan0").await?;

    let Some(ip) = parse_ip_addr(&output) else {
        println!("Could not get IP address of device");
        return Ok(());
    };

    adb::run(serial, &["tcpip", "5555"]).await?;

    let status = adb::global_run(&["connect", &format!("{}:5555", ip)]).await?;
    if status.success() {
        println!("Connected to {} via WiFi", serial);
    }
    Ok(())
}

/// Grep the device's package list for a term; the pipe runs in the device
/// shell, so matching lines stream straight to the terminal.
pub async fn search_packages(serial: &str, search_term: &str) -> Result<()> {
    adb::run(
        serial,
        &["shell", "pm", "list", "packages", "|", "grep", search_term],
    )
    .await?;
    Ok(())
}

/// Pass arbitrary arguments through to adb for the selected device.
pub async fn run_raw(serial: &str, args: &[String]) -> Result<()> {
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    adb::run(serial, &arg_refs).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip_addr_strips_prefix() {
        let output = "    inet 192.168.1.42/24 brd 192.168.1.255 scope global wlan0";
        assert_eq!(parse_ip_addr(output), Some("192.168.1.42".to_string()));
    }

    #[test]
    fn test_parse_ip_addr_ignores_inet6() {
        let output = "\
3: wlan0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc mq state UP\n\
    link/ether 02:00:00:00:00:00 brd ff:ff:ff:ff:ff:ff\n\
    inet6 fe80::1:2:3:4/64 scope link noprefixroute\n\
    inet 192.168.1.42/24 brd 192.168.1.255 scope global dynamic wlan0\n\
    valid_lft 86391sec preferred_lft 86391sec";
        assert_eq!(parse_ip_addr(output), Some("192.168.1.42".to_string()));
    }

    #[test]
    fn test_parse_ip_addr_first_match_wins() {
        let output = "    inet 127.0.0.1/8 scope host lo\n\
                      inet 192.168.1.105/24 scope global wlan0";
        assert_eq!(parse_ip_addr(output), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_parse_ip_addr_no_match() {
        let output = "3: wlan0: <BROADCAST,MULTICAST> mtu 1500 qdisc mq state DOWN\n\
                      link/ether 02:00:00:00:00:00 brd ff:ff:ff:ff:ff:ff";
        assert_eq!(parse_ip_addr(output), None);
    }

    #[test]
    fn test_parse_ip_addr_empty() {
        assert_eq!(parse_ip_addr(""), None);
    }
}
