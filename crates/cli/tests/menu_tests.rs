// End-to-end tests: drive the `xlsel` binary through its menu over piped stdin.
// Run with: cargo test -p xlsel-cli --test menu_tests -- --nocapture

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Run `xlsel` in `dir` with an empty settings file and `input` on stdin.
fn xlsel(dir: &Path, args: &[&str], input: &str) -> Output {
    let settings = dir.join("settings.toml");
    if !settings.exists() {
        fs::write(&settings, "").unwrap();
    }

    let mut child = Command::new(env!("CARGO_BIN_EXE_xlsel"))
        .args(args)
        .current_dir(dir)
        .env("XLSEL_CONFIG", &settings)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn xlsel");

    child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    child.wait_with_output().expect("wait for xlsel")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn read_csv(path: &Path) -> String {
    fs::read_to_string(path).unwrap().trim_start_matches('\u{feff}').to_string()
}

// ---------------------------------------------------------------------------
// Menu, exit codes, flags
// ---------------------------------------------------------------------------

#[test]
fn exit_from_menu() {
    let dir = TempDir::new().unwrap();
    let out = xlsel(dir.path(), &[], "5\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("goodbye"));
}

#[test]
fn end_of_input_exits_cleanly() {
    let dir = TempDir::new().unwrap();
    let out = xlsel(dir.path(), &[], "");
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn invalid_menu_choice_reprompts() {
    let dir = TempDir::new().unwrap();
    let out = xlsel(dir.path(), &[], "7\n5\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("Invalid input, enter one of 1/2/3/4/5"));
}

#[test]
fn version_and_bad_flag() {
    let dir = TempDir::new().unwrap();
    let out = xlsel(dir.path(), &["--version"], "");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).starts_with("xlsel "));

    let out = xlsel(dir.path(), &["--no-such-flag"], "");
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn operation_error_returns_to_menu() {
    let dir = TempDir::new().unwrap();
    // clean on a missing file, back to the menu, then exit
    let out = xlsel(dir.path(), &[], "4\nmissing.csv\n1\n5\n");
    assert_eq!(out.status.code(), Some(0));
    assert!(stderr(&out).contains("error:"));
    assert_eq!(stdout(&out).matches("5) exit (default 1)").count(), 2);
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[test]
fn merge_folder_with_defaults() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("jan.csv"), "id,amount\n1,10\n2,20\n").unwrap();
    fs::write(data.join("feb.csv"), "id,amount\n3,30\n,\n").unwrap();

    // merge, folder, sort, not common-only, all columns, no rename, drop blanks, CSV, default name
    let out = xlsel(dir.path(), &[], "1\n2\ndata\n\n\n\n\n\n\n\n2\n");
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    let merged = read_csv(&dir.path().join("merged_output.csv"));
    assert_eq!(merged, "amount,id\n30,3\n10,1\n20,2\n");
}

#[test]
fn merge_settings_change_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("settings.toml"),
        "[merge]\nsort_inputs = false\ndrop_blank_rows = false\noutput_name = \"all\"\n",
    )
    .unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a.csv"), "k\n1\n\"\"\n").unwrap();

    let out = xlsel(dir.path(), &[], "1\n2\ndata\n\n\n\n\n\n\n\n2\n");
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Row count matches the inputs."));
    assert!(dir.path().join("all.csv").exists());
}

#[test]
fn split_into_xlsx_parts() {
    let dir = TempDir::new().unwrap();
    let rows: String = (1..=5).map(|i| format!("{i},v{i}\n")).collect();
    fs::write(dir.path().join("in.csv"), format!("n,v\n{rows}")).unwrap();

    // split, file, all columns, no rename, chunks, start 1, to end, 2 per chunk, no limit
    let out = xlsel(dir.path(), &[], "2\nin.csv\n\n\n1\n1\n\n2\n\nparts\n\nxlsx\n2\n");
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));

    for n in 1..=3 {
        assert!(dir.path().join(format!("parts/output_part_{n}.xlsx")).exists());
    }
    assert!(!dir.path().join("parts/output_part_4.xlsx").exists());
}

#[test]
fn dedupe_writes_filtered_main() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.csv"), "email\na@x\nb@x\n").unwrap();
    fs::write(dir.path().join("seen.csv"), "mail\nb@x\n").unwrap();

    let out = xlsel(dir.path(), &[], "3\nmain.csv\nemail\nseen.csv\n\nmail\nkept.csv\n2\n");
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(read_csv(&dir.path().join("kept.csv")), "email\na@x\n");
}

#[test]
fn clean_then_back_to_menu() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("in.csv"), "a,b\n1,\n2,x\n").unwrap();

    let out = xlsel(dir.path(), &[], "4\nin.csv\nb\n\nout.csv\n1\n5\n");
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(read_csv(&dir.path().join("out.csv")), "a,b\n2,x\n");
}
