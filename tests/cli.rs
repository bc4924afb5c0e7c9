//! End-to-end checks of the spiconsole binary's exit codes and output

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn spiconsole(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_spiconsole"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn spiconsole");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("failed to write stdin");

    child.wait_with_output().expect("failed to wait for spiconsole")
}

#[test]
fn test_missing_device_argument_exits_1() {
    let output = spiconsole(&[], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_help_exits_0() {
    let output = spiconsole(&["--help"], "");
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("DEVICE"));
}

#[cfg(feature = "linux-spi")]
#[test]
fn test_open_failure_exits_1() {
    let output = spiconsole(&["/nonexistent/spidev9.9"], "1 2 3\nq\n");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"));
    assert!(stderr.contains("/nonexistent/spidev9.9"));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("TX:"));
}

#[cfg(feature = "dummy")]
#[test]
fn test_dummy_session_exits_0() {
    let output = spiconsole(&["dummy"], "1 2 3 4\nq\n");
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TX: 01 02 03 04 00 00"));
    assert!(stdout.contains("RX: 01 02 03 04 00 00"));
    assert_eq!(stdout.matches("Enter bytes to send or 'q' to quit").count(), 2);
}

#[cfg(feature = "dummy")]
#[test]
fn test_end_of_input_exits_0() {
    let output = spiconsole(&["dummy"], "0x1a 2b 0x03");
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("TX: 1a 2b 03 00 00 00"));
}

#[cfg(feature = "dummy")]
#[test]
fn test_oversized_length_exits_1() {
    let output = spiconsole(&["--len", "99999999999999", "dummy"], "q\n");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid transfer length"));
}
