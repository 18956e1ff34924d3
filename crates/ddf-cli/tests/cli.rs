use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE: &str = "#VERSION 1.0\n\
#HEADER\n\
Bench supply\n\
#HEADER\n\
d Vin 12.05 ?Input Voltage (V)\n\
m<d> Vout [2, 9, 12, 20]\n\
m<b> mask [true, false; false, true]\n";

fn write_sample(dir: &TempDir, text: &str) -> PathBuf {
    let path = dir.path().join("sample.ddf");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn check_reports_ok() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir, SAMPLE);

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("check").arg(&path);
    cmd.assert().success().stdout("ok: 3 variables\n");
}

#[test]
fn check_reports_grammar_error() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir, "d x 1\nd 1x 5\n");

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("check").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("[G004] line 2: invalid variable name '1x'"));
}

#[test]
fn check_legacy_accepts_loose_names() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir, "d x-ray 1\n");

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("check").arg(&path);
    cmd.assert().failure();

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("check").arg(&path).arg("--legacy");
    cmd.assert().success().stdout("ok: 1 variables\n");
}

#[test]
fn check_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("check").arg(dir.path().join("absent.ddf"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn names_read_vertical_blocks() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(
        &dir,
        "d Vin 12.05;?volts\n#VERTICAL\nm<d>  m<d>\na     b\n1     3\n2     4\n#VERTICAL\n",
    );

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("names").arg(&path).arg("--merge");
    cmd.assert().success().stdout("Vin, a, b\n");
}

#[test]
fn check_reports_unterminated_vertical_block() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir, "#VERTICAL\nm<d>\nv\n1\n");

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("check").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("[G002] line 1: failed to find closing #VERTICAL statement"));
}

#[test]
fn names_with_types() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir, SAMPLE);

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("names").arg(&path).arg("--types");
    cmd.assert()
        .success()
        .stdout("Vin (d)\nVout (m<d>)\nmask (m<b>, 2D)\n");

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("names").arg(&path).arg("--merge");
    cmd.assert().success().stdout("Vin, Vout, mask\n");
}

#[test]
fn show_prints_table() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir, SAMPLE);

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("show").arg(&path);
    cmd.assert().success().stdout(
        predicate::str::contains("Scalars:")
            .and(predicate::str::contains("Input Voltage (V)"))
            .and(predicate::str::contains("[True, False; False, True]"))
            .and(predicate::str::contains("No. Variables: 3")),
    );
}

#[test]
fn fmt_to_stdout() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir, SAMPLE);

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("fmt").arg(&path).arg("--flags").arg("od");
    cmd.assert().success().stdout(
        "#VERSION 1.0\n\
         d Vin 12.05 ?Input Voltage (V)\n\
         m<d> Vout [2.0, 9.0, 12.0, 20.0]\n\
         m<b> mask [True, False; False, True]\n",
    );
}

#[test]
fn fmt_to_file_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = write_sample(&dir, SAMPLE);
    let out = dir.path().join("out.ddf");

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("fmt")
        .arg(&path)
        .arg("--flags=v;")
        .arg("--output")
        .arg(&out);
    cmd.assert().success().stdout("");

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("d Vin 12.05; ?Input Voltage (V)\n"));
    assert!(written.contains("#VERTICAL\n\nm<d>\nVout\n2.0\n9.0\n12.0\n20.0\n\n#VERTICAL\n"));
    assert!(written.contains("m<b>\nmask\nTrue\nFalse;\nFalse\nTrue;\n"));

    let mut cmd = cargo_bin_cmd!("ddf");
    cmd.arg("check").arg(&out);
    cmd.assert().success().stdout("ok: 3 variables\n");
}
