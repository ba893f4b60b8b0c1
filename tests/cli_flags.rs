//! Command-line tests for srna-enrich.
//!
//! Tests cover:
//! 1. ENRICH: thresholds, multiple inputs, reference and FASTA output
//! 2. WINDOWS: report layout and --enriched-only
//! 3. Exit status for unreadable and malformed input

use std::fs;
use std::io::Write;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

// =============================================================================
// Helper functions
// =============================================================================

fn create_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}

fn run_tool(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_srna-enrich"))
        .args(args)
        .output()
        .expect("Failed to run srna-enrich")
}

fn stdout_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_str(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const SCENARIO: &str = "chr1,21,ACGT,10,+,1,6.0\n\
                        chr1,21,ACGT,20,+,1,6.0\n\
                        chr1,21,ACGT,150,+,1,6.0\n\
                        chr1,21,ACGT,160,+,1,6.0\n\
                        chr1,21,ACGT,170,+,6,6.0\n";

const SCENARIO_FLAGS: [&str; 8] = [
    "--window",
    "100",
    "--min-unique",
    "2",
    "--min-rpmr",
    "5",
    "--merge-distance",
    "50",
];

// =============================================================================
// ENRICH
// =============================================================================

#[test]
fn test_enrich_to_stdout() {
    let input = create_file(SCENARIO);
    let mut args = vec!["enrich", "-i", input.path().to_str().unwrap(), "-o", "-"];
    args.extend(SCENARIO_FLAGS);

    let output = run_tool(&args);
    assert!(output.status.success(), "stderr: {}", stderr_str(&output));
    // Largest observed position (170) bounds the region end
    assert_eq!(stdout_str(&output), "Header,Start,End,Length\nchr1,0,170,170\n");
    // Reported without -v
    assert!(stderr_str(&output).contains("Total regions written: 1"));
}

#[test]
fn test_enrich_default_thresholds_find_nothing() {
    let input = create_file(SCENARIO);
    let output = run_tool(&["enrich", "-i", input.path().to_str().unwrap(), "-o", "-"]);

    assert!(output.status.success());
    assert_eq!(stdout_str(&output), "Header,Start,End,Length\n");
}

#[test]
fn test_enrich_comma_separated_inputs() {
    let a = create_file("chr1,21,A,10,+,1,6.0\n");
    let b = create_file("chr1,21,A,20,+,1,6.0\n");
    let inputs = format!(
        "{},{}",
        a.path().to_str().unwrap(),
        b.path().to_str().unwrap()
    );
    let mut args = vec!["enrich", "-i", inputs.as_str(), "-o", "-"];
    args.extend(SCENARIO_FLAGS);

    let output = run_tool(&args);
    assert!(output.status.success());
    assert_eq!(stdout_str(&output), "Header,Start,End,Length\nchr1,0,20,20\n");
}

#[test]
fn test_enrich_with_reference_and_fasta() {
    let dir = TempDir::new().unwrap();
    let input = create_file(SCENARIO);
    let reference = create_file(&format!(">chr1\n{}\n{}\n", "A".repeat(100), "C".repeat(80)));
    let csv_path = dir.path().join("regions.csv");
    let fasta_path = dir.path().join("regions.fa");

    let mut args = vec![
        "enrich",
        "-i",
        input.path().to_str().unwrap(),
        "-o",
        csv_path.to_str().unwrap(),
        "-r",
        reference.path().to_str().unwrap(),
        "--output-fasta",
        fasta_path.to_str().unwrap(),
        "--stats",
    ];
    args.extend(SCENARIO_FLAGS);

    let output = run_tool(&args);
    assert!(output.status.success(), "stderr: {}", stderr_str(&output));
    assert!(stderr_str(&output).contains("Regions: 1"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv, "Header,Start,End,Length\nchr1,0,180,180\n");

    let fasta = fs::read_to_string(&fasta_path).unwrap();
    let expected = format!(">chr1_region_1\n{}{}\n", "A".repeat(100), "C".repeat(80));
    assert_eq!(fasta, expected);
}

#[test]
fn test_enrich_fasta_requires_reference() {
    let input = create_file(SCENARIO);
    let output = run_tool(&[
        "enrich",
        "-i",
        input.path().to_str().unwrap(),
        "-o",
        "-",
        "--output-fasta",
        "out.fa",
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_enrich_rejects_zero_window() {
    let input = create_file(SCENARIO);
    let output = run_tool(&[
        "enrich",
        "-i",
        input.path().to_str().unwrap(),
        "-o",
        "-",
        "--window",
        "0",
    ]);
    assert!(!output.status.success());
}

// =============================================================================
// WINDOWS
// =============================================================================

#[test]
fn test_windows_report() {
    let input = create_file(SCENARIO);
    let mut args = vec!["windows", "-i", input.path().to_str().unwrap()];
    args.extend(SCENARIO_FLAGS);

    let output = run_tool(&args);
    assert!(output.status.success());
    assert_eq!(
        stdout_str(&output),
        "Header,Start,End,UniqueCount,Avg_1,Enriched\n\
         chr1,0,100,2,6.0,true\n\
         chr1,100,200,2,6.0,true\n"
    );
}

#[test]
fn test_windows_enriched_only() {
    let input = create_file("chr1,21,A,10,+,1,6.0\nchr1,21,A,20,+,1,6.0\nchr1,21,A,500,+,1,6.0\n");
    let mut args = vec![
        "windows",
        "-i",
        input.path().to_str().unwrap(),
        "--enriched-only",
    ];
    args.extend(SCENARIO_FLAGS);

    let output = run_tool(&args);
    assert!(output.status.success());
    let text = stdout_str(&output);
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("chr1,0,100,2,6.0,true"));
}

// =============================================================================
// Error handling
// =============================================================================

#[test]
fn test_missing_input_exits_nonzero_but_writes_rest() {
    let good = create_file(SCENARIO);
    let missing = good.path().with_extension("absent");
    let mut args = vec![
        "enrich",
        "-i",
        good.path().to_str().unwrap(),
        "-i",
        missing.to_str().unwrap(),
        "-o",
        "-",
    ];
    args.extend(SCENARIO_FLAGS);

    let output = run_tool(&args);
    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("1 of 2 input files"));
    assert_eq!(stdout_str(&output), "Header,Start,End,Length\nchr1,0,170,170\n");
}

#[test]
fn test_unreadable_reference_leaves_no_fasta() {
    let dir = TempDir::new().unwrap();
    let input = create_file(SCENARIO);
    let fasta_path = dir.path().join("regions.fa");
    let missing_ref = dir.path().join("absent.fa");

    let mut args = vec![
        "enrich",
        "-i",
        input.path().to_str().unwrap(),
        "-o",
        "-",
        "-r",
        missing_ref.to_str().unwrap(),
        "--output-fasta",
        fasta_path.to_str().unwrap(),
    ];
    args.extend(SCENARIO_FLAGS);

    let output = run_tool(&args);
    assert!(!output.status.success());
    assert!(!fasta_path.exists());
    assert_eq!(stdout_str(&output), "Header,Start,End,Length\nchr1,0,170,170\n");
    assert!(stderr_str(&output).contains("Total regions written: 1"));
}

#[test]
fn test_truncated_row_names_file_and_line() {
    let bad = create_file("chr1,21,A,10,+,1,6.0\nchr1,21,A\n");
    let output = run_tool(&["enrich", "-i", bad.path().to_str().unwrap(), "-o", "-"]);

    assert!(!output.status.success());
    let stderr = stderr_str(&output);
    assert!(stderr.contains("line 2"), "stderr: {}", stderr);
    assert!(stderr.contains(bad.path().to_str().unwrap()));
}
