//! End-to-end tests for the `csv-splitter` binary.
//!
//! Each test writes an input file into a temp directory, runs the binary
//! against it and checks stdout, the exit status and the files left behind.

// Allow deprecated cargo_bin usage until assert_cmd updates API
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADERS: [&str; 3] = ["ID", "Name", "Value"];

fn data_rows(n: usize) -> Vec<Vec<String>> {
    (1..=n)
        .map(|i| vec![i.to_string(), format!("Name{i}"), format!("Value{i}")])
        .collect()
}

fn create_csv(path: &Path, headers: &[&str], rows: &[Vec<String>]) {
    let mut writer = csv::Writer::from_path(path).expect("create csv");
    writer.write_record(headers).unwrap();
    for row in rows {
        writer.write_record(row).unwrap();
    }
    writer.flush().unwrap();
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).expect("open csv");
    let headers = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (headers, rows)
}

fn listing(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Command running from inside the temp dir so no stray config file is picked up.
fn splitter(dir: &TempDir, input: &Path, max_lines: &str) -> Command {
    let mut cmd = Command::cargo_bin("csv-splitter").unwrap();
    cmd.current_dir(dir.path())
        .arg("--input-csv")
        .arg(input)
        .arg("--max-lines")
        .arg(max_lines);
    cmd
}

fn setup(name: &str, rows: usize) -> (TempDir, PathBuf, Vec<Vec<String>>) {
    let dir = tempfile::tempdir().expect("create tempdir");
    let input = dir.path().join(name);
    let rows = data_rows(rows);
    create_csv(&input, &HEADERS, &rows);
    (dir, input, rows)
}

#[test]
fn header_only_file() {
    let (dir, input, _) = setup("header_only.csv", 0);

    splitter(&dir, &input, "5")
        .assert()
        .success()
        .stdout(predicate::str::contains("No data rows found in the input file"))
        .stdout(predicate::str::contains("Split complete").not());

    assert_eq!(listing(&dir), vec!["header_only.csv"]);
}

#[test]
fn empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.csv");
    fs::write(&input, "").unwrap();

    splitter(&dir, &input, "5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Input file is empty"));

    assert_eq!(listing(&dir), vec!["empty.csv"]);
}

#[test]
fn exactly_max_lines() {
    let (dir, input, rows) = setup("exact.csv", 5);

    splitter(&dir, &input, "5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created: "))
        .stdout(predicate::str::contains("Split complete: Created 1 files"));

    assert_eq!(listing(&dir), vec!["exact.1-5.csv", "exact.csv"]);

    let (headers, out_rows) = read_csv(&dir.path().join("exact.1-5.csv"));
    assert_eq!(headers, HEADERS);
    assert_eq!(out_rows, rows);
}

#[test]
fn larger_than_max_lines() {
    let (dir, input, rows) = setup("large.csv", 15);

    splitter(&dir, &input, "5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Split complete: Created 3 files"));

    assert_eq!(
        listing(&dir),
        vec!["large.1-5.csv", "large.11-15.csv", "large.6-10.csv", "large.csv"]
    );

    for (name, expected) in [
        ("large.1-5.csv", &rows[0..5]),
        ("large.6-10.csv", &rows[5..10]),
        ("large.11-15.csv", &rows[10..15]),
    ] {
        let (headers, out_rows) = read_csv(&dir.path().join(name));
        assert_eq!(headers, HEADERS, "{name}");
        assert_eq!(out_rows, expected, "{name}");
    }
}

#[test]
fn not_evenly_divisible() {
    let (dir, input, rows) = setup("uneven.csv", 12);

    splitter(&dir, &input, "5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Split complete: Created 3 files"));

    assert_eq!(
        listing(&dir),
        vec!["uneven.1-5.csv", "uneven.11-12.csv", "uneven.6-10.csv", "uneven.csv"]
    );

    let (headers, out_rows) = read_csv(&dir.path().join("uneven.11-12.csv"));
    assert_eq!(headers, HEADERS);
    assert_eq!(out_rows, &rows[10..12]);
}

#[test]
fn created_files_are_announced_in_order() {
    let (dir, input, _) = setup("order.csv", 7);

    let output = splitter(&dir, &input, "3").output().unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let created: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.strip_prefix("Created: "))
        .collect();

    assert_eq!(created.len(), 3);
    assert!(created[0].ends_with("order.1-3.csv"));
    assert!(created[1].ends_with("order.4-6.csv"));
    assert!(created[2].ends_with("order.7-7.csv"));
}

#[test]
fn headers_are_byte_identical() {
    let (dir, input, _) = setup("bytes.csv", 4);

    splitter(&dir, &input, "3").assert().success();

    let input_text = fs::read_to_string(&input).unwrap();
    let header_line = input_text.lines().next().unwrap();
    for name in ["bytes.1-3.csv", "bytes.4-4.csv"] {
        let text = fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(text.lines().next().unwrap(), header_line, "{name}");
    }
}

#[test]
fn invalid_max_lines() {
    let (dir, input, _) = setup("test.csv", 1);

    for value in ["0", "-5"] {
        splitter(&dir, &input, value)
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::contains(
                "Error: --max-lines must be a positive integer",
            ));
    }

    assert_eq!(listing(&dir), vec!["test.csv"]);
}

#[test]
fn nonexistent_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nonexistent.csv");

    splitter(&dir, &input, "5")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Error: Input file"))
        .stdout(predicate::str::contains("does not exist"));
}

#[test]
fn directory_input() {
    let dir = tempfile::tempdir().unwrap();
    let sub = dir.path().join("folder.csv");
    fs::create_dir(&sub).unwrap();

    splitter(&dir, &sub, "5")
        .assert()
        .failure()
        .stdout(predicate::str::contains("is not a file"));
}

#[test]
fn dry_run_writes_nothing() {
    let (dir, input, _) = setup("plan.csv", 12);

    splitter(&dir, &input, "5")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan.11-12.csv (2 rows)"))
        .stdout(predicate::str::contains("Dry run: 3 files would be created"));

    assert_eq!(listing(&dir), vec!["plan.csv"]);
}

#[test]
fn delimiter_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("csv-splitter.toml"), "[csv]\ndelimiter = \";\"\n").unwrap();
    let input = dir.path().join("semi.csv");
    fs::write(&input, "a;b\n1;x,y\n2;z\n").unwrap();

    splitter(&dir, &input, "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Split complete: Created 2 files"));

    assert_eq!(
        fs::read_to_string(dir.path().join("semi.1-1.csv")).unwrap(),
        "a;b\n1;x,y\n"
    );
}

#[test]
fn delimiter_flag_sets_dialect() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("pipes.txt");
    fs::write(&input, "a|b\n1|2\n").unwrap();

    splitter(&dir, &input, "10")
        .arg("--delimiter")
        .arg("|")
        .assert()
        .success();

    let text = fs::read_to_string(dir.path().join("pipes.1-1.txt")).unwrap();
    assert_eq!(text, "a|b\n1|2\n");
}

#[test]
fn missing_required_argument_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("csv-splitter")
        .unwrap()
        .current_dir(dir.path())
        .arg("--max-lines")
        .arg("5")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input-csv"));
}

#[test]
fn blank_lines_count_as_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("gaps.csv");
    fs::write(&input, "a,b\n1,2\n\n3,4\n").unwrap();

    splitter(&dir, &input, "2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Split complete: Created 2 files"));

    assert_eq!(listing(&dir), vec!["gaps.1-2.csv", "gaps.3-3.csv", "gaps.csv"]);
    assert_eq!(fs::read_to_string(dir.path().join("gaps.1-2.csv")).unwrap(), "a,b\n1,2\n\n");
    assert_eq!(fs::read_to_string(dir.path().join("gaps.3-3.csv")).unwrap(), "a,b\n3,4\n");
}

#[test]
fn bom_header_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("excel.csv");
    fs::write(&input, b"\xEF\xBB\xBFID,Name\n1,Ada\n2,Grace\n").unwrap();

    splitter(&dir, &input, "1").assert().success();

    for (name, row) in [("excel.1-1.csv", "1,Ada\n"), ("excel.2-2.csv", "2,Grace\n")] {
        let bytes = fs::read(dir.path().join(name)).unwrap();
        let expected = [b"\xEF\xBB\xBFID,Name\n".as_slice(), row.as_bytes()].concat();
        assert_eq!(bytes, expected, "{name}");
    }
}

#[test]
fn crlf_input_splits_by_record() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("windows.csv");
    fs::write(&input, "ID,Name\r\n1,Ada\r\n2,Grace\r\n3,Linus\r\n").unwrap();

    splitter(&dir, &input, "2")
        .assert()
        .success()
        .stdout(predicate::str::contains("Split complete: Created 2 files"));

    assert_eq!(
        fs::read_to_string(dir.path().join("windows.1-2.csv")).unwrap(),
        "ID,Name\n1,Ada\n2,Grace\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("windows.3-3.csv")).unwrap(),
        "ID,Name\n3,Linus\n"
    );
}

#[test]
fn ragged_rows_are_split_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ragged.csv");
    fs::write(&input, "a,b,c\n1\n1,2,3,4\n").unwrap();

    splitter(&dir, &input, "1").assert().success();

    assert_eq!(fs::read_to_string(dir.path().join("ragged.1-1.csv")).unwrap(), "a,b,c\n1\n");
    assert_eq!(
        fs::read_to_string(dir.path().join("ragged.2-2.csv")).unwrap(),
        "a,b,c\n1,2,3,4\n"
    );
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    for config in ["[csv\n", "[logging]\nlevel = \"verbose\"\n"] {
        let (dir, input, rows) = setup("data.csv", 2);
        fs::write(dir.path().join("csv-splitter.toml"), config).unwrap();

        splitter(&dir, &input, "5")
            .assert()
            .success()
            .stdout(predicate::str::contains("Split complete: Created 1 files"))
            .stderr(predicate::str::contains("Using default configuration"));

        let (headers, out_rows) = read_csv(&dir.path().join("data.1-2.csv"));
        assert_eq!(headers, HEADERS);
        assert_eq!(out_rows, rows);
    }
}
