mod common;

use common::{INDIE_CSV, RETRO_CSV, csv_target, exported_names, memory_store, temp_dir};
use std::fs;
use steamvoter::core::export::ExportLogic;
use steamvoter::core::import::ImportLogic;
use steamvoter::core::session::{Decided, NO_UNVOTED_MESSAGE, Session, SessionState};
use steamvoter::db::log::count_operations;
use steamvoter::db::pool::DbPool;
use steamvoter::db::queries::{get_cursor, list_decisions, record_decision};
use steamvoter::errors::AppError;
use steamvoter::export::{ExportFormat, ExportTarget};
use steamvoter::models::{Progress, WritePolicy};

fn indie_store() -> DbPool {
    let mut pool = memory_store();
    ImportLogic::import_reader(&mut pool, INDIE_CSV.as_bytes(), "indie2024").unwrap();
    pool
}

#[test]
fn alice_votes_through_indie2024() {
    let mut pool = indie_store();
    let target = csv_target("session_alice");
    let mut session = Session::new("alice", target.clone());

    assert!(matches!(
        session.load_batch(&mut pool, "indie2024").unwrap(),
        SessionState::Sequential(_)
    ));
    assert_eq!(
        session.progress(),
        Some(Progress {
            position: 1,
            total: 3
        })
    );

    assert_eq!(session.decide(&mut pool, true).unwrap(), Decided::Next);
    assert_eq!(get_cursor(&pool.conn, "alice", "indie2024").unwrap(), 1);
    assert_eq!(session.decide(&mut pool, false).unwrap(), Decided::Next);
    assert_eq!(session.current().unwrap().name, "Hades");

    let Decided::Completed(snapshot) = session.decide(&mut pool, true).unwrap() else {
        panic!("third vote should complete the batch");
    };
    assert_eq!(snapshot.yes_count, 2);
    assert_eq!(snapshot.no_count, 1);
    assert_eq!(exported_names(&snapshot.yes_path), vec!["Hollow Knight", "Hades"]);
    assert_eq!(exported_names(&snapshot.no_path), vec!["Celeste"]);

    assert!(session.is_complete());
    assert!(session.current().is_none());
    assert_eq!(get_cursor(&pool.conn, "alice", "indie2024").unwrap(), 3);
    assert_eq!(
        count_operations(&pool.conn, "export_snapshot", Some("indie2024")).unwrap(),
        1
    );

    // exactly the two positives, in vote order
    let fresh = ExportLogic::export_new_positive(&mut pool, "alice", &target).unwrap();
    assert_eq!(fresh.written, 2);
    assert_eq!(
        exported_names(&fresh.path.unwrap()),
        vec!["Hollow Knight", "Hades"]
    );
}

#[test]
fn reloading_a_complete_batch_does_not_export_again() {
    let mut pool = indie_store();
    let mut session = Session::new("alice", csv_target("session_reload_complete"));

    session.load_batch(&mut pool, "indie2024").unwrap();
    for _ in 0..3 {
        session.decide(&mut pool, false).unwrap();
    }

    let mut again = Session::new("alice", csv_target("session_reload_complete"));
    assert_eq!(
        again.load_batch(&mut pool, "indie2024").unwrap(),
        &SessionState::Complete {
            batch: "indie2024".into()
        }
    );
    assert!(matches!(
        again.decide(&mut pool, true),
        Err(AppError::NoActiveItem)
    ));
    assert_eq!(
        count_operations(&pool.conn, "export_snapshot", Some("indie2024")).unwrap(),
        1
    );
}

#[test]
fn failed_snapshot_is_written_when_the_batch_is_loaded_again() {
    let mut pool = indie_store();
    let blocker = temp_dir("session_snapshot_blocked").join("not_a_dir");
    fs::write(&blocker, "").unwrap();

    let mut session = Session::new("alice", ExportTarget::new(&blocker, ExportFormat::Csv));
    session.load_batch(&mut pool, "indie2024").unwrap();
    assert_eq!(session.decide(&mut pool, true).unwrap(), Decided::Next);
    assert_eq!(session.decide(&mut pool, false).unwrap(), Decided::Next);
    assert!(session.decide(&mut pool, true).is_err());

    assert!(matches!(session.state(), SessionState::Sequential(_)));
    assert!(session.current().is_none());
    assert_eq!(
        count_operations(&pool.conn, "export_snapshot", Some("indie2024")).unwrap(),
        0
    );

    let target = csv_target("session_snapshot_retry");
    let mut again = Session::new("alice", target.clone());
    assert_eq!(
        again.load_batch(&mut pool, "indie2024").unwrap(),
        &SessionState::Complete {
            batch: "indie2024".into()
        }
    );
    assert_eq!(
        exported_names(&target.dir.join("indie2024_yes_votes.csv")),
        vec!["Hollow Knight", "Hades"]
    );
    assert_eq!(
        exported_names(&target.dir.join("indie2024_no_votes.csv")),
        vec!["Celeste"]
    );
    assert_eq!(
        count_operations(&pool.conn, "export_snapshot", Some("indie2024")).unwrap(),
        1
    );

    let mut third = Session::new("alice", target);
    third.load_batch(&mut pool, "indie2024").unwrap();
    assert_eq!(
        count_operations(&pool.conn, "export_snapshot", Some("indie2024")).unwrap(),
        1
    );
}

#[test]
fn cancel_saves_the_cursor_and_a_new_session_resumes() {
    let mut pool = indie_store();
    let mut session = Session::new("alice", csv_target("session_resume"));

    session.load_batch(&mut pool, "indie2024").unwrap();
    session.decide(&mut pool, true).unwrap();
    session.cancel(&mut pool).unwrap();
    assert_eq!(session.state(), &SessionState::Idle { message: None });

    let mut resumed = Session::new("alice", csv_target("session_resume"));
    resumed.load_batch(&mut pool, "indie2024").unwrap();
    assert_eq!(resumed.current().unwrap().name, "Celeste");
    assert_eq!(resumed.progress().unwrap().position, 2);

    // bob starts from the top
    let mut bob = Session::new("bob", csv_target("session_resume"));
    bob.load_batch(&mut pool, "indie2024").unwrap();
    assert_eq!(bob.current().unwrap().name, "Hollow Knight");
}

#[test]
fn revoting_in_sequential_mode_overwrites() {
    let mut pool = indie_store();
    record_decision(&pool.conn, 1, "alice", true, WritePolicy::Overwrite).unwrap();

    let mut session = Session::new("alice", csv_target("session_revote"));
    session.load_batch(&mut pool, "indie2024").unwrap();
    session.decide(&mut pool, false).unwrap();

    let votes = list_decisions(&pool.conn, "alice").unwrap();
    assert_eq!(votes.len(), 1);
    assert!(!votes[0].value);
}

#[test]
fn unknown_batch_is_an_error_and_busy_session_refuses_a_second_load() {
    let mut pool = indie_store();
    let mut session = Session::new("alice", csv_target("session_errors"));

    assert!(matches!(
        session.load_batch(&mut pool, "nope"),
        Err(AppError::EmptyBatch(b)) if b == "nope"
    ));

    session.load_batch(&mut pool, "indie2024").unwrap();
    assert!(matches!(
        session.start_backlog(&mut pool),
        Err(AppError::Session(_))
    ));
}

#[test]
fn backlog_covers_every_batch_then_reports_exhaustion() {
    let mut pool = indie_store();
    ImportLogic::import_reader(&mut pool, RETRO_CSV.as_bytes(), "retro").unwrap();
    let target = csv_target("session_backlog");
    let mut session = Session::new("carol", target.clone());

    assert!(matches!(
        session.start_backlog(&mut pool).unwrap(),
        SessionState::Backlog(_)
    ));
    assert!(session.progress().is_none());

    let mut votes = 0;
    let mut value = true;
    loop {
        votes += 1;
        let outcome = session.decide(&mut pool, value).unwrap();
        value = !value;
        if outcome == Decided::Exhausted {
            break;
        }
        assert_eq!(outcome, Decided::Next);
    }
    assert_eq!(votes, 5);
    assert_eq!(
        session.state(),
        &SessionState::Idle {
            message: Some(NO_UNVOTED_MESSAGE.into())
        }
    );

    let decided = list_decisions(&pool.conn, "carol").unwrap();
    assert_eq!(decided.len(), 5);
    assert!(decided.iter().all(|d| !d.exported));
    // backlog never moves sequential cursors
    assert_eq!(get_cursor(&pool.conn, "carol", "indie2024").unwrap(), 0);

    let export = ExportLogic::export_new_positive(&mut pool, "carol", &target).unwrap();
    assert_eq!(export.written, 3);
    let after = list_decisions(&pool.conn, "carol").unwrap();
    for d in after {
        assert_eq!(d.exported, d.value);
    }
}

#[test]
fn backlog_with_nothing_left_goes_idle_with_a_message() {
    let mut pool = memory_store();
    let mut session = Session::new("dave", csv_target("session_backlog_empty"));

    assert_eq!(
        session.start_backlog(&mut pool).unwrap(),
        &SessionState::Idle {
            message: Some(NO_UNVOTED_MESSAGE.into())
        }
    );
}

#[test]
fn backlog_skips_items_another_session_decided() {
    let mut pool = memory_store();
    ImportLogic::import_reader(&mut pool, RETRO_CSV.as_bytes(), "retro").unwrap();
    let mut session = Session::new("erin", csv_target("session_backlog_race"));
    session.start_backlog(&mut pool).unwrap();

    let shown = session.current().unwrap().id;
    let queued = if shown == 1 { 2 } else { 1 };

    // a second process votes on both: first-wins keeps its vote on `shown`
    record_decision(&pool.conn, shown, "erin", false, WritePolicy::FirstWins).unwrap();
    record_decision(&pool.conn, queued, "erin", false, WritePolicy::FirstWins).unwrap();

    assert_eq!(session.decide(&mut pool, true).unwrap(), Decided::Exhausted);

    let decided = list_decisions(&pool.conn, "erin").unwrap();
    assert_eq!(decided.len(), 2);
    assert!(decided.iter().all(|d| !d.value));
}
