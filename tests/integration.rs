use std::path::Path;
use std::process::Command;

fn autodocs_cmd(fixture: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_autodocs"));
    cmd.current_dir(Path::new("tests/fixtures").join(fixture));
    cmd
}

#[test]
fn check_reports_stale_comment_location() {
    let output = autodocs_cmd("stale").arg("check").output().unwrap();

    assert_eq!(output.status.code(), Some(1), "stale fixture must exit 1");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("src/lib.ts:1:1"),
        "expected stale location in output: {stdout}"
    );
}

#[test]
fn check_passes_on_clean_fixture() {
    let output = autodocs_cmd("clean").arg("check").output().unwrap();

    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("in sync"), "unexpected output: {stdout}");
}

#[test]
fn check_reports_unparseable_file_as_broken() {
    let output = autodocs_cmd("broken").arg("check").output().unwrap();

    assert_eq!(output.status.code(), Some(2), "broken fixture must exit 2");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BROKEN"), "unexpected output: {stdout}");
}
