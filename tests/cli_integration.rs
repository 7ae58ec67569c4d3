//! Integration tests for the `dl` CLI.
//!
//! Each test creates a temp vault, runs `dl` as a subprocess,
//! and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `dl` binary.
fn dl_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("dl");
    path
}

/// Create a small vault with a few daily notes under `journal/`.
fn create_test_vault(root: &Path) {
    fs::write(
        root.join("dayline.toml"),
        r##"[notes]
folder = "journal"

[layout]
min_spacing_pixels = 25.0
max_group_span_pixels = 60.0

[tag_styles.work]
color = "#4488FF"
emoji = "💼"
"##,
    )
    .unwrap();

    let journal = root.join("journal");
    fs::create_dir_all(journal.join("2025")).unwrap();

    fs::write(
        journal.join("2025-03-03.md"),
        "\
# Monday

- [x] *07:30* Morning run #sport
- [x] *09:00* Standup #work
- [x] *09:02* Coffee
\t- oat milk
- [x] *09:05* Emails #work
- [x] *09:00-11:00* Focus block #work
- [ ] *10:00-10:30* Review [[Design Doc|design]]
- [x] *18:00* Dinner ![[dinner.jpg]]

Notes about the day.
",
    )
    .unwrap();

    fs::write(journal.join("2025/2025-03-04.md"), "- [x] *12:00* Lunch\n").unwrap();
    fs::write(journal.join("2025-02-10.md"), "- [x] *08:00* Dentist\n").unwrap();
    fs::write(journal.join("2025-03-05.md"), "No tasks today.\n").unwrap();
    fs::write(journal.join("ideas.md"), "- [x] *08:00* Undated\n").unwrap();
}

/// Run `dl` with the given args in the given directory, returning (stdout, stderr, success).
fn run_dl(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(dl_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `dl` expecting success, return stdout.
fn run_dl_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dl(dir, args);
    if !success {
        panic!(
            "dl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn run_dl_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut all = args.to_vec();
    all.push("--json");
    let out = run_dl_ok(dir, &all);
    serde_json::from_str(&out).unwrap()
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_writes_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_dl_ok(tmp.path(), &["init", "--folder", "journal"]);
    assert!(out.contains("Initialized dayline vault"));
    assert!(out.contains("notes folder: journal"));

    let text = fs::read_to_string(tmp.path().join("dayline.toml")).unwrap();
    assert!(text.contains("folder = \"journal\""));
    assert!(text.contains("[layout]"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_dl_ok(tmp.path(), &["init"]);

    let (_stdout, stderr, success) = run_dl(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));

    run_dl_ok(tmp.path(), &["init", "--force", "--folder", "daily"]);
    let text = fs::read_to_string(tmp.path().join("dayline.toml")).unwrap();
    assert!(text.contains("folder = \"daily\""));
}

#[test]
fn test_init_rejects_escaping_folder() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_dl(tmp.path(), &["init", "--folder", "../x"]);
    assert!(!success);
    assert!(stderr.starts_with("error: "));
    assert!(!tmp.path().join("dayline.toml").exists());
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_not_a_vault() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_stdout, stderr, success) = run_dl(tmp.path(), &["months"]);
    assert!(!success);
    assert!(stderr.contains("not a dayline vault"));
}

#[test]
fn test_vault_found_from_subdirectory() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    let out = run_dl_ok(&tmp.path().join("journal/2025"), &["tasks", "2025-03-04"]);
    assert!(out.contains("Lunch"));
}

#[test]
fn test_vault_dir_flag() {
    let tmp = tempfile::TempDir::new().unwrap();
    let vault = tmp.path().join("vault");
    fs::create_dir_all(&vault).unwrap();
    create_test_vault(&vault);
    let out = run_dl_ok(tmp.path(), &["-C", "vault", "tasks", "04.03.2025"]);
    assert!(out.contains("Lunch"));
}

#[test]
fn test_tasks_for_a_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let out = run_dl_ok(tmp.path(), &["tasks", "2025-03-03"]);
    assert!(out.contains("Mon 2025-03-03"));
    assert!(out.contains("[x] 07:30"));
    assert!(out.contains("09:00-11:00 Focus block #work"));
    assert!(out.contains("Coffee (+1 item)"));
    assert!(!out.contains("Notes about the day"));
}

#[test]
fn test_tasks_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let parsed = run_dl_json(tmp.path(), &["tasks", "2025-03-03"]);
    let notes = parsed.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["date"], "2025-03-03");
    let tasks = notes[0]["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 7);
    assert_eq!(tasks[0]["first_tag"], "sport");
    assert_eq!(tasks[2]["sub_items"], serde_json::json!(["oat milk"]));
    assert_eq!(tasks[4]["end"], "11:00");
    assert_eq!(tasks[6]["has_attachment"], true);
}

#[test]
fn test_tasks_for_empty_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    let out = run_dl_ok(tmp.path(), &["tasks", "2025-03-05"]);
    assert!(out.contains("no timed tasks"));
}

#[test]
fn test_day_clusters_at_default_zoom() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    // 200px per day: 25px is three hours, so the whole morning merges
    let out = run_dl_ok(tmp.path(), &["day", "2025-03-03"]);
    assert!(out.contains("08:39 ×4"));
    assert!(out.contains("Dinner"));
}

#[test]
fn test_day_json_at_high_zoom() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let day = run_dl_json(tmp.path(), &["day", "2025-03-03", "--zoom", "10"]);
    assert_eq!(day["segment_width"], 2000.0);

    let dots = day["dots"].as_array().unwrap();
    assert_eq!(dots.len(), 3);
    assert_eq!(dots[0]["item"]["kind"], "single");
    assert_eq!(dots[1]["item"]["kind"], "cluster");
    assert_eq!(dots[1]["label"], "09:02");
    assert_eq!(dots[1]["item"]["tasks"].as_array().unwrap().len(), 3);
    assert_eq!(dots[1]["emojis"], serde_json::json!(["💼"]));
    assert_eq!(dots[2]["emojis"], serde_json::json!(["📸"]));

    let levels: Vec<_> = day["ranges"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["overlap_level"].as_u64().unwrap())
        .collect();
    assert_eq!(levels, vec![1, 2]);
    assert_eq!(day["ranges"][0]["color"], "#4488FF");
}

#[test]
fn test_day_without_tasks_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    let (_stdout, stderr, success) = run_dl(tmp.path(), &["day", "2025-03-05"]);
    assert!(!success);
    assert!(stderr.contains("no timed tasks on 2025-03-05"));
}

#[test]
fn test_overlaps() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let out = run_dl_ok(tmp.path(), &["overlaps", "2025-03-03"]);
    assert!(out.contains("L1  [x] 09:00-11:00 Focus block"));
    assert!(out.contains("L2  [ ] 10:00-10:30 Review"));

    let out = run_dl_ok(tmp.path(), &["overlaps", "2025-03-04"]);
    assert!(out.contains("(no range tasks)"));
}

#[test]
fn test_months() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let out = run_dl_ok(tmp.path(), &["months"]);
    let lines: Vec<_> = out.lines().collect();
    assert_eq!(lines, vec!["2025-03  March 2025", "2025-02  February 2025"]);
}

#[test]
fn test_preview_cluster() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let out = run_dl_ok(tmp.path(), &["preview", "2025-03-03", "09:02", "--zoom", "10"]);
    assert!(out.contains("(3 tasks)"));
    assert!(out.contains("09:00 💼 Standup #work"));
    assert!(out.contains("- oat milk"));
}

#[test]
fn test_preview_range_task_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let parsed = run_dl_json(tmp.path(), &["preview", "2025-03-03", "10:00", "--zoom", "10"]);
    let tasks = parsed["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["time"], "10:00-10:30");
    assert_eq!(tasks[0]["content"][1]["kind"], "link");
    assert_eq!(tasks[0]["content"][1]["value"]["display"], "design");
}

#[test]
fn test_preview_nothing_there() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    let (_stdout, stderr, success) = run_dl(tmp.path(), &["preview", "2025-03-03", "03:00"]);
    assert!(!success);
    assert!(stderr.contains("no task at 03:00"));
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

#[test]
fn test_timeline_custom_range() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let out = run_dl_ok(
        tmp.path(),
        &["timeline", "--from", "2025-03-01", "--to", "2025-03-07", "--width", "24"],
    );
    assert!(out.contains("2025-03-01 .. 2025-03-07 (7 days, zoom 100%, 2 notes)"));
    assert!(out.contains("Mon Mar 03"));
    assert!(out.contains("Tue Mar 04"));
    assert!(out.contains("#work 💼 #4488FF"));
    assert!(tmp.path().join(".dayline-state.json").exists());
}

#[test]
fn test_timeline_json_month() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let parsed = run_dl_json(tmp.path(), &["timeline", "--month", "2025-02", "--zoom", "2"]);
    assert_eq!(parsed["range"]["start"], "2025-02-01");
    assert_eq!(parsed["range"]["end"], "2025-02-28");
    assert_eq!(parsed["zoom_label"], "200%");
    assert_eq!(parsed["segment_width"], 400.0);
    assert_eq!(parsed["days"].as_array().unwrap().len(), 1);
}

#[test]
fn test_timeline_next_steps_and_resets_zoom() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    run_dl_ok(
        tmp.path(),
        &["timeline", "--from", "2025-02-25", "--to", "2025-03-03", "--zoom", "3"],
    );

    let parsed = run_dl_json(tmp.path(), &["timeline", "--next"]);
    assert_eq!(parsed["range"]["start"], "2025-03-04");
    assert_eq!(parsed["range"]["end"], "2025-03-10");
    assert_eq!(parsed["zoom_label"], "100%");

    let parsed = run_dl_json(tmp.path(), &["timeline", "--prev"]);
    assert_eq!(parsed["range"]["start"], "2025-02-25");
    let dates: Vec<_> = parsed["days"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["date"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dates, vec!["2025-03-03"]);
}

#[test]
fn test_timeline_from_block_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    fs::write(
        tmp.path().join("march.timeline"),
        "# first week of March\nmode: custom\nstartDate: 01.03.2025\nendDate: 04.03.2025\n",
    )
    .unwrap();

    let parsed = run_dl_json(tmp.path(), &["timeline", "--block", "march.timeline"]);
    assert_eq!(parsed["range"]["end"], "2025-03-04");
    assert_eq!(parsed["days"].as_array().unwrap().len(), 2);
}

#[test]
fn test_timeline_bad_block() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    fs::write(tmp.path().join("bad.timeline"), "mode: custom\nshow: last-7\nstartDate: 2025-03-01\n").unwrap();

    let (_stdout, stderr, success) = run_dl(tmp.path(), &["timeline", "--block", "bad.timeline"]);
    assert!(!success);
    assert!(stderr.contains("cannot use \"show\""));
}

#[test]
fn test_timeline_rejects_reversed_range() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    let (_stdout, stderr, success) = run_dl(
        tmp.path(),
        &["timeline", "--from", "2025-03-07", "--to", "2025-03-01"],
    );
    assert!(!success);
    assert!(stderr.contains("must be on or after"));
}

#[test]
fn test_timeline_unknown_preset() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    let (_stdout, stderr, success) = run_dl(tmp.path(), &["timeline", "--show", "yesterday"]);
    assert!(!success);
    assert!(stderr.contains("unknown preset"));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_get_and_set() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());

    let out = run_dl_ok(tmp.path(), &["config", "get", "notes.folder"]);
    assert_eq!(out.trim(), "journal");

    run_dl_ok(tmp.path(), &["config", "set", "layout.min_spacing_pixels", "5"]);
    let out = run_dl_ok(tmp.path(), &["config", "get", "layout.min_spacing_pixels"]);
    assert_eq!(out.trim(), "5.0");

    // 5px at 200px per day is 36 minutes: the 07:30 run no longer joins
    let day = run_dl_json(tmp.path(), &["day", "2025-03-03"]);
    assert_eq!(day["dots"].as_array().unwrap().len(), 3);

    let text = fs::read_to_string(tmp.path().join("dayline.toml")).unwrap();
    assert!(text.contains("[tag_styles.work]"));
}

#[test]
fn test_config_set_rejects_bad_values() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    let before = fs::read_to_string(tmp.path().join("dayline.toml")).unwrap();

    let (_stdout, stderr, success) = run_dl(tmp.path(), &["config", "set", "view.mode", "weekly"]);
    assert!(!success);
    assert!(stderr.contains("invalid value for view.mode"));

    let after = fs::read_to_string(tmp.path().join("dayline.toml")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_timeline_with_huge_month_count_fails_cleanly() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    run_dl_ok(tmp.path(), &["config", "set", "notes.default_range_months", "4000000"]);

    let (_stdout, stderr, success) = run_dl(tmp.path(), &["timeline"]);
    assert!(!success);
    assert!(stderr.starts_with("error: "));
    assert!(stderr.contains("outside the supported calendar"));
    assert!(!stderr.contains("panicked"));
}

#[test]
fn test_config_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_vault(tmp.path());
    let parsed = run_dl_json(tmp.path(), &["config"]);
    assert_eq!(parsed["notes"]["folder"], "journal");
    assert_eq!(parsed["layout"]["enable_grouping"], true);
    assert_eq!(parsed["tag_styles"]["work"]["emoji"], "💼");
}
