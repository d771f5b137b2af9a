//! CLI smoke tests against the built binary.

use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

fn write_snapshot() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp snapshot");
    let snapshot = serde_json::json!({
        "viewport": { "width": 1280.0, "height": 800.0 },
        "heading_text": "Launch faster with a landing page your whole team can audit and ship today",
        "cta": { "x": 40.0, "y": 500.0, "width": 200.0, "height": 60.0 },
        "tokens": { "--fg": "#111111", "--bg": "#ffffff" },
        "has_skip_link": true,
        "prefers_reduced_motion": false,
        "paint_timeline": [[900.0], [1400.0, 1800.0]]
    });
    write!(file, "{}", snapshot).expect("write snapshot");
    file
}

#[test]
fn audit_command_prints_the_report() {
    let snapshot = write_snapshot();
    let mut cmd = Command::cargo_bin("audithud").expect("binary");
    let output = cmd
        .args(["audit", "--snapshot"])
        .arg(snapshot.path())
        .output()
        .expect("run audithud");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Audit HUD"));
    assert!(stdout.contains("✔"));
    assert!(stdout.contains("LCP ~ 1800 ms"));
    assert!(stdout.contains("360/768/1024/1440"));
}

#[test]
fn audit_command_fails_on_missing_snapshot() {
    let mut cmd = Command::cargo_bin("audithud").expect("binary");
    let output = cmd
        .args(["audit", "--snapshot", "/nonexistent/page.json"])
        .output()
        .expect("run audithud");

    assert!(!output.status.success());
}
