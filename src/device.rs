//! Device enumeration and interactive selection.
//!
//! `get_devices` turns `adb devices` output into an ordered list of serials;
//! `select_device` picks one of them (or all of them) with a numbered prompt
//! when more than one device is attached.

use crate::adb;
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// What the user picked: one device, or every connected device.
///
/// Callers must branch on the variant before dispatching; fan-out commands
/// iterate `All` in list order.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceSelection {
    Single(String),
    All(Vec<String>),
}

impl DeviceSelection {
    /// Flatten the selection into the serials to operate on, in order.
    pub fn into_devices(self) -> Vec<String> {
        match self {
            Self::Single(serial) => vec![serial],
            Self::All(serials) => serials,
        }
    }
}

/// A validated menu choice, before it is resolved against the device list.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Choice {
    Index(usize),
    All,
}

/// Run `adb devices` and return the connected serials in reported order.
pub async fn get_devices() -> Result<Vec<String>> {
    let output = adb::global_output(&["devices"]).await?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_device_list(&stdout))
}

/// Parse `adb devices` output: drop the header line, then take the first
/// whitespace-delimited token of every non-empty line.
///
/// No state filtering and no de-duplication happen here; whatever adb
/// reports passes through in order.
pub fn parse_device_list(output: &str) -> Vec<String> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

/// Render the numbered menu lines for a device list, 1-indexed, with a
/// trailing ALL entry when `allow_all` is set.
pub fn render_menu(devices: &[String], allow_all: bool) -> Vec<String> {
    let mut lines: Vec<String> = devices
        .iter()
        .enumerate()
        .map(|(i, serial)| format!("{}. {}", i + 1, serial))
        .collect();
    if allow_all {
        lines.push(format!("{}. ALL", devices.len() + 1));
    }
    lines
}

/// Validate one line of user input against a menu of `n` devices.
fn parse_choice(input: &str, n: usize, allow_all: bool) -> Option<Choice> {
    let choice: i64 = input.trim().parse().ok()?;
    let index = choice - 1;

    if (0..n as i64).contains(&index) {
        Some(Choice::Index(index as usize))
    } else if allow_all && index == n as i64 {
        Some(Choice::All)
    } else {
        None
    }
}

/// Interactively select a device from `devices`.
///
/// Returns `None` when no devices are connected; the caller aborts the
/// requested operation silently. A single connected device is returned
/// without any prompt.
pub fn select_device(devices: &[String], allow_all: bool) -> Result<Option<DeviceSelection>> {
    let stdin = io::stdin();
    select_device_with(&mut stdin.lock(), devices, allow_all)
}

/// Selection logic with the input source injected, so the prompt loop is
/// testable without a terminal.
pub fn select_device_with<R: BufRead>(
    input: &mut R,
    devices: &[String],
    allow_all: bool,
) -> Result<Option<DeviceSelection>> {
    if devices.is_empty() {
        println!("No devices found");
        return Ok(None);
    }

    if devices.len() == 1 {
        return Ok(Some(DeviceSelection::Single(devices[0].clone())));
    }

    println!("Select a device:");
    for line in render_menu(devices, allow_all) {
        println!("{}", line);
    }

    let mut buf = String::new();
    loop {
        print!("Enter the number of the device: ");
        io::stdout().flush()?;

        buf.clear();
        if input.read_line(&mut buf)? == 0 {
            anyhow::bail!("stdin closed while waiting for a device choice");
        }

        match parse_choice(&buf, devices.len(), allow_all) {
            Some(Choice::Index(i)) => return Ok(Some(DeviceSelection::Single(devices[i].clone()))),
            Some(Choice::All) => return Ok(Some(DeviceSelection::All(devices.to_vec()))),
            None => println!("Invalid choice"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn serials(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_device_list_header_only() {
        let output = "List of devices attached\n";
        assert!(parse_device_list(output).is_empty());
    }

    #[test]
    fn test_parse_device_list_empty_output() {
        assert!(parse_device_list("").is_empty());
    }

    #[test]
    fn test_parse_device_list_single() {
        let output = "List of devices attached\nemulator-5554\tdevice\n";
        assert_eq!(parse_device_list(output), serials(&["emulator-5554"]));
    }

    #[test]
    fn test_parse_device_list_preserves_order_and_count() {
        let output = "List of devices attached\n\
                      emulator-5554\tdevice\n\
                      R5CRC0123456789\tdevice\n\
                      R5CRC9876543210\toffline\n";
        let devices = parse_device_list(output);
        assert_eq!(
            devices,
            serials(&["emulator-5554", "R5CRC0123456789", "R5CRC9876543210"])
        );
    }

    #[test]
    fn test_parse_device_list_skips_blank_lines() {
        let output = "List of devices attached\nemulator-5554\tdevice\n\n\n";
        assert_eq!(parse_device_list(output), serials(&["emulator-5554"]));
    }

    #[test]
    fn test_parse_device_list_takes_first_token() {
        let output = "List of devices attached\n\
                      192.168.1.100:5555 device product:generic model:SDK_Phone\n";
        assert_eq!(parse_device_list(output), serials(&["192.168.1.100:5555"]));
    }

    #[test]
    fn test_render_menu_without_all() {
        let menu = render_menu(&serials(&["a", "b"]), false);
        assert_eq!(menu, vec!["1. a", "2. b"]);
    }

    #[test]
    fn test_render_menu_with_all() {
        let menu = render_menu(&serials(&["d1", "d2", "d3", "d4", "d5"]), true);
        assert_eq!(menu.len(), 6);
        assert_eq!(menu[0], "1. d1");
        assert_eq!(menu[4], "5. d5");
        assert_eq!(menu[5], "6. ALL");
    }

    #[test]
    fn test_parse_choice_bounds() {
        assert_eq!(parse_choice("1", 2, false), Some(Choice::Index(0)));
        assert_eq!(parse_choice("2", 2, false), Some(Choice::Index(1)));
        assert_eq!(parse_choice("0", 2, false), None);
        assert_eq!(parse_choice("-1", 2, false), None);
        assert_eq!(parse_choice("3", 2, false), None);
        assert_eq!(parse_choice("3", 2, true), Some(Choice::All));
        assert_eq!(parse_choice("4", 2, true), None);
        assert_eq!(parse_choice("abc", 2, true), None);
        assert_eq!(parse_choice("  2 \n", 2, false), Some(Choice::Index(1)));
    }

    #[test]
    fn test_select_no_devices() {
        let mut input = Cursor::new(b"" as &[u8]);
        let result = select_device_with(&mut input, &[], true).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_select_single_device_skips_prompt() {
        // Empty input: any read attempt would error the loop, so this also
        // proves no prompt happens for a single device.
        let mut input = Cursor::new(b"" as &[u8]);
        let result = select_device_with(&mut input, &serials(&["only"]), true).unwrap();
        assert_eq!(result, Some(DeviceSelection::Single("only".to_string())));
    }

    #[test]
    fn test_select_by_number() {
        let devices = serials(&["a", "b"]);

        let mut input = Cursor::new(b"1\n" as &[u8]);
        let result = select_device_with(&mut input, &devices, false).unwrap();
        assert_eq!(result, Some(DeviceSelection::Single("a".to_string())));

        let mut input = Cursor::new(b"2\n" as &[u8]);
        let result = select_device_with(&mut input, &devices, false).unwrap();
        assert_eq!(result, Some(DeviceSelection::Single("b".to_string())));
    }

    #[test]
    fn test_select_reprompts_until_valid() {
        let devices = serials(&["a", "b"]);
        let mut input = Cursor::new(b"zero\n3\n0\n2\n" as &[u8]);
        let result = select_device_with(&mut input, &devices, false).unwrap();
        assert_eq!(result, Some(DeviceSelection::Single("b".to_string())));
    }

    #[test]
    fn test_select_all() {
        let devices = serials(&["a", "b"]);
        let mut input = Cursor::new(b"3\n" as &[u8]);
        let result = select_device_with(&mut input, &devices, true).unwrap();
        assert_eq!(result, Some(DeviceSelection::All(devices.clone())));
    }

    #[test]
    fn test_select_eof_is_error() {
        let devices = serials(&["a", "b"]);
        let mut input = Cursor::new(b"nope\n" as &[u8]);
        assert!(select_device_with(&mut input, &devices, false).is_err());
    }

    #[test]
    fn test_into_devices() {
        let single = DeviceSelection::Single("x".to_string());
        assert_eq!(single.into_devices(), serials(&["x"]));

        let all = DeviceSelection::All(serials(&["x", "y"]));
        assert_eq!(all.into_devices(), serials(&["x", "y"]));
    }
}
