mod common;

use common::{INDIE_CSV, setup_test_db, svt, temp_dir, write_csv};
use predicates::str::contains;
use std::fs;

/// init + import of the indie2024 batch; returns the working directory.
fn prepared(name: &str, db: &str) -> std::path::PathBuf {
    let work = temp_dir(&format!("{name}_work"));
    let csv = write_csv(&work, "indie2024.csv", INDIE_CSV);

    svt(name)
        .args(["--db", db, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    svt(name)
        .args(["--db", db, "--test", "import", csv.as_str()])
        .assert()
        .success()
        .stdout(contains("Batch 'indie2024': 3 game(s) imported, 0 duplicate(s)"));

    work
}

#[test]
fn reimport_reports_duplicates() {
    let db_path = setup_test_db("cli_reimport");
    let db = db_path.as_str();
    let work = prepared("cli_reimport", db);
    let csv_path = work.join("indie2024.csv");
    let csv = csv_path.to_str().unwrap();

    svt("cli_reimport")
        .args(["--db", db, "--test", "import", csv])
        .assert()
        .success()
        .stdout(contains("0 game(s) imported, 3 duplicate(s)"));

    svt("cli_reimport")
        .args(["--db", db, "--test", "--user", "alice", "status"])
        .assert()
        .success()
        .stdout(contains("indie2024"))
        .stdout(contains("not started"));
}

#[test]
fn vote_resumes_and_completes_with_snapshot() {
    let db_path = setup_test_db("cli_vote");
    let db = db_path.as_str();
    let work = prepared("cli_vote", db);
    let args = [
        "--db", db, "--test", "--user", "alice", "vote", "indie2024", "--browser", "console",
    ];

    svt("cli_vote")
        .current_dir(&work)
        .args(args)
        .write_stdin("y\nq\n")
        .assert()
        .success()
        .stdout(contains("Game: Hollow Knight"))
        .stdout(contains("Progress: 1/3"))
        .stdout(contains("Progress saved"));

    svt("cli_vote")
        .current_dir(&work)
        .args(args)
        .write_stdin("maybe\nn\ny\n")
        .assert()
        .success()
        .stdout(contains("Resuming 'indie2024' at game 2 of 3."))
        .stdout(contains("Unknown option 'maybe'"))
        .stdout(contains("Batch 'indie2024' complete: 2 yes, 1 no."));

    let yes = fs::read_to_string(work.join("data").join("indie2024_yes_votes.csv")).unwrap();
    assert!(yes.starts_with("name,developers,release_date,steam_page_url"));
    assert!(yes.contains("Hollow Knight") && yes.contains("Hades"));
    let no = fs::read_to_string(work.join("data").join("indie2024_no_votes.csv")).unwrap();
    assert!(no.contains("Celeste") && !no.contains("Hades"));

    svt("cli_vote")
        .current_dir(&work)
        .args(args)
        .assert()
        .success()
        .stdout(contains("already complete"));
}

#[test]
fn export_writes_new_yes_votes_only_once() {
    let db_path = setup_test_db("cli_export");
    let db = db_path.as_str();
    let work = prepared("cli_export", db);
    let out = work.join("out");
    let out_s = out.to_str().unwrap();

    svt("cli_export")
        .current_dir(&work)
        .args([
            "--db", db, "--test", "--user", "bob", "backlog", "--browser", "console",
        ])
        .write_stdin("y\ny\ny\n")
        .assert()
        .success()
        .stdout(contains("No unvoted games remain."));

    svt("cli_export")
        .args(["--db", db, "--test", "--user", "bob", "export", "--dir", out_s])
        .assert()
        .success()
        .stdout(contains("3 new yes vote(s) exported."));

    svt("cli_export")
        .args(["--db", db, "--test", "--user", "bob", "export", "--dir", out_s])
        .assert()
        .success()
        .stdout(contains("No new yes votes to export."));

    let files: Vec<_> = fs::read_dir(&out).unwrap().filter_map(|e| e.ok()).collect();
    assert_eq!(files.len(), 1);
    assert!(
        files[0]
            .file_name()
            .to_string_lossy()
            .starts_with("new_yes_votes_")
    );
}

#[test]
fn batch_snapshot_export_in_json() {
    let db_path = setup_test_db("cli_export_json");
    let db = db_path.as_str();
    let work = prepared("cli_export_json", db);
    let out = work.join("json");
    let out_s = out.to_str().unwrap();

    svt("cli_export_json")
        .args([
            "--db", db, "--test", "--user", "alice", "export", "--batch", "indie2024", "--dir",
            out_s, "--format", "json",
        ])
        .assert()
        .success()
        .stdout(contains("Batch 'indie2024': 0 yes, 0 no."));

    let yes = fs::read_to_string(out.join("indie2024_yes_votes.json")).unwrap();
    assert_eq!(yes.trim(), "[]");
}

#[test]
fn batch_export_of_a_mistyped_batch_fails_without_files() {
    let db_path = setup_test_db("cli_export_typo");
    let db = db_path.as_str();
    let work = prepared("cli_export_typo", db);
    let out = work.join("typo");
    let out_s = out.to_str().unwrap();

    svt("cli_export_typo")
        .args([
            "--db", db, "--test", "--user", "alice", "export", "--batch", "indie2042", "--dir",
            out_s,
        ])
        .assert()
        .failure()
        .stderr(contains("Batch 'indie2042' has no games"));

    assert!(!out.join("indie2042_yes_votes.csv").exists());
    assert!(!out.join("indie2042_no_votes.csv").exists());
}

#[test]
fn wipe_requires_all_and_confirmation() {
    let db_path = setup_test_db("cli_wipe");
    let db = db_path.as_str();
    prepared("cli_wipe", db);

    svt("cli_wipe")
        .args(["--db", db, "--test", "wipe"])
        .assert()
        .success()
        .stdout(contains("Nothing wiped"));

    svt("cli_wipe")
        .args(["--db", db, "--test", "wipe", "--all"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    svt("cli_wipe")
        .args(["--db", db, "--test", "wipe", "--all", "--yes"])
        .assert()
        .success()
        .stdout(contains("Store wiped: 3 game(s), 0 vote(s)"));

    svt("cli_wipe")
        .args(["--db", db, "--test", "status"])
        .assert()
        .success()
        .stdout(contains("No games imported yet"));
}

#[test]
fn voting_an_unknown_batch_fails() {
    let db_path = setup_test_db("cli_unknown_batch");
    let db = db_path.as_str();
    prepared("cli_unknown_batch", db);

    svt("cli_unknown_batch")
        .args(["--db", db, "--test", "vote", "nope", "--browser", "console"])
        .assert()
        .failure()
        .stderr(contains("Batch 'nope' has no games"));
}

#[test]
fn garbage_config_file_is_ignored() {
    let home = temp_dir("cli_garbage_config_home");
    fs::create_dir_all(home.join(".steamvoter")).unwrap();
    fs::write(home.join(".steamvoter").join("steamvoter.conf"), ":::\n- [").unwrap();

    let mut cmd = assert_cmd::cargo_bin_cmd!("steamvoter");
    cmd.env("HOME", &home)
        .args(["--test", "config", "--print"])
        .assert()
        .success()
        .stdout(contains("export_dir: data"));
}

#[test]
fn db_info_reports_counts() {
    let db_path = setup_test_db("cli_db_info");
    let db = db_path.as_str();
    prepared("cli_db_info", db);

    svt("cli_db_info")
        .args(["--db", db, "--test", "db", "--info", "--check"])
        .assert()
        .success()
        .stdout(contains("Games:"))
        .stdout(contains("Integrity check passed"));

    svt("cli_db_info")
        .args(["--db", db, "--test", "log", "--print"])
        .assert()
        .success()
        .stdout(contains("import"));
}
