//! Low-level adb invocation.
//!
//! Every function here builds a fixed argument list, resolves the adb binary
//! and runs it as a child process. Nothing in this module interprets adb's
//! output; callers decide whether the exit status matters.

use crate::utils::binary_resolver;
use anyhow::{Context, Result};
use std::process::{ExitStatus, Output, Stdio};
use tokio::process::{Child, Command};

fn serial_args<'a>(serial: &'a str, args: &[&'a str]) -> Vec<&'a str> {
    let mut full_args = vec!["-s", serial];
    full_args.extend_from_slice(args);
    full_args
}

/// Run an adb command against a device with stdout/stderr inherited.
///
/// The child's own console output is the user feedback; the exit status is
/// returned but most callers ignore it.
pub async fn run(serial: &str, args: &[&str]) -> Result<ExitStatus> {
    let full_args = serial_args(serial, args);
    let adb_path = binary_resolver::find_adb()?;

    log::debug!("adb {:?}", full_args);

    Command::new(adb_path)
        .args(&full_args)
        .status()
        .await
        .with_context(|| format!("Failed to execute: adb {}", full_args.join(" ")))
}

/// Run an adb command against a device with all output discarded.
pub async fn run_quiet(serial: &str, args: &[&str]) -> Result<ExitStatus> {
    let full_args = serial_args(serial, args);
    let adb_path = binary_resolver::find_adb()?;

    log::debug!("adb {:?} (quiet)", full_args);

    Command::new(adb_path)
        .args(&full_args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .with_context(|| format!("Failed to execute: adb {}", full_args.join(" ")))
}

/// Run an adb command against a device and capture its output.
pub async fn output(serial: &str, args: &[&str]) -> Result<Output> {
    let full_args = serial_args(serial, args);
    let adb_path = binary_resolver::find_adb()?;

    log::debug!("adb {:?} (captured)", full_args);

    Command::new(adb_path)
        .args(&full_args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .with_context(|| format!("Failed to execute: adb {}", full_args.join(" ")))
}

/// Run an adb shell command on a device and return its stdout as text.
///
/// A non-zero exit with output still present is tolerated; some device
/// shells set odd statuses for commands that produced usable text.
pub async fn shell(serial: &str, cmd: &str) -> Result<String> {
    let out = output(serial, &["shell", cmd]).await?;

    if out.stdout.is_empty() && !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        anyhow::bail!("adb shell '{}' failed: {}", cmd, stderr.trim());
    }

    Ok(String::from_utf8_lossy(&out.stdout).to_string())
}

/// Spawn a long-running adb shell command and hand the child back to the
/// caller, which is responsible for terminating it.
pub async fn spawn_shell(serial: &str, cmd: &str) -> Result<Child> {
    let adb_path = binary_resolver::find_adb()?;

    log::debug!("adb -s {} shell {} (spawned)", serial, cmd);

    Command::new(adb_path)
        .args(["-s", serial, "shell", cmd])
        .spawn()
        .with_context(|| format!("Failed to spawn: adb shell {}", cmd))
}

/// Pull a file from a device. Returns whether the pull succeeded.
pub async fn pull(serial: &str, remote: &str, local: &str) -> Result<bool> {
    let status = run(serial, &["pull", remote, local]).await?;
    Ok(status.success())
}

/// Run an adb command that takes no device serial (e.g. `adb devices`,
/// `adb connect HOST:PORT`) and capture its output.
pub async fn global_output(args: &[&str]) -> Result<Output> {
    let adb_path = binary_resolver::find_adb()?;

    log::debug!("adb {:?} (global, captured)", args);

    Command::new(adb_path)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .with_context(|| format!("Failed to execute: adb {}", args.join(" ")))
}

/// Run a serial-less adb command with inherited stdio.
pub async fn global_run(args: &[&str]) -> Result<ExitStatus> {
    let adb_path = binary_resolver::find_adb()?;

    log::debug!("adb {:?} (global)", args);

    Command::new(adb_path)
        .args(args)
        .status()
        .await
        .with_context(|| format!("Failed to execute: adb {}", args.join(" ")))
}
