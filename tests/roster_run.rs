use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn roster_run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_roster-run"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_ids_output() {
    let records = fixture("hr-managers.json");
    let output = roster_run(&[
        records.to_str().unwrap(),
        "--filter",
        "status=Active",
        "--filter",
        "department=HR",
        "--sort",
        "rating:desc",
        "--output",
        "ids",
    ]);
    assert_eq!(stdout_json(&output), serde_json::json!([1, 3, 10, 6]));
}

#[test]
fn test_out_of_range_page_falls_back_to_first() {
    let records = fixture("staff.json");
    let output = roster_run(&[
        records.to_str().unwrap(),
        "--preset",
        "staff",
        "--page",
        "9",
        "--page-size",
        "3",
    ]);
    let doc = stdout_json(&output);
    assert_eq!(doc["window"]["number"], 1);
    assert_eq!(doc["window"]["page_count"], 3);
    assert_eq!(doc["records"].as_array().unwrap().len(), 3);
    assert!(String::from_utf8_lossy(&output.stderr).contains("out of range"));
}

#[test]
fn test_trace_reports_stage_counts() {
    let records = fixture("hr-managers.json");
    let output = roster_run(&[
        records.to_str().unwrap(),
        "--search",
        "payroll",
        "--trace",
        "--output",
        "summary",
    ]);
    let doc = stdout_json(&output);
    assert_eq!(doc["total"], 2);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SEARCH"));
    assert!(stderr.contains("PAGINATE"));
}

#[test]
fn test_one_sided_date_range_is_reported() {
    let records = fixture("hr-managers.json");
    let output = roster_run(&[
        records.to_str().unwrap(),
        "--from",
        "2024-01-01",
        "--output",
        "ids",
    ]);
    let doc = stdout_json(&output);
    assert_eq!(doc.as_array().unwrap().len(), 12);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("needs both --from and --to"));
}

#[test]
fn test_unknown_preset_fails() {
    let records = fixture("hr-managers.json");
    let output = roster_run(&[records.to_str().unwrap(), "--preset", "contractors"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("contractors"));
}
