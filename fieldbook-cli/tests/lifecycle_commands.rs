//! Integration tests for the lifecycle commands: `set-status`,
//! `attach-proof`, `cancel-group` and `expire`.

mod common;

use common::TestEnv;
use predicates::prelude::*;
use rusqlite::Connection;

const MONDAY_18: &str = "2030-03-04 18:00";
const MONDAY_19: &str = "2030-03-04 19:00";

fn set_status(env: &TestEnv, id: i64, status: &str) -> assert_cmd::assert::Assert {
    env.command()
        .args(["set-status", &id.to_string(), status])
        .assert()
}

#[test]
fn test_pay_then_cancel_frees_the_slot() {
    let env = TestEnv::new();
    let field = env.add_field("Field A", "35000");
    let id = env.book(field, MONDAY_18, MONDAY_19, &[])[0];

    env.command()
        .args(["attach-proof", &id.to_string(), "BANK-2030-0042"])
        .assert()
        .success();
    set_status(&env, id, "paid").success();

    let rows = env.list_json(&[]);
    assert_eq!(rows[0]["status"], "paid");
    assert_eq!(rows[0]["payment_proof"], "BANK-2030-0042");

    set_status(&env, id, "canceled").success();
    env.book(field, MONDAY_18, MONDAY_19, &[]);
}

#[test]
fn test_disallowed_transition_is_semantic_failure() {
    let env = TestEnv::new();
    let field = env.add_field("Field A", "10");
    let id = env.book(field, MONDAY_18, MONDAY_19, &[])[0];

    set_status(&env, id, "canceled").success();
    set_status(&env, id, "paid")
        .code(1)
        .stderr(predicate::str::contains("from canceled to paid"));
}

#[test]
fn test_same_status_is_a_no_op() {
    let env = TestEnv::new();
    let field = env.add_field("Field A", "10");
    let id = env.book(field, MONDAY_18, MONDAY_19, &[])[0];

    set_status(&env, id, "pending").success();
}

#[test]
fn test_unknown_status_is_rejected_by_the_parser() {
    let env = TestEnv::new();
    let field = env.add_field("Field A", "10");
    let id = env.book(field, MONDAY_18, MONDAY_19, &[])[0];

    set_status(&env, id, "refunded")
        .failure()
        .stderr(predicate::str::contains("unknown status"));
}

#[test]
fn test_unknown_reservation() {
    let env = TestEnv::new();
    env.add_field("Field A", "10");

    set_status(&env, 42, "paid")
        .code(6)
        .stderr(predicate::str::contains("reservation 42 not found"));
}

#[test]
fn test_proof_goes_on_the_charged_session() {
    let env = TestEnv::new();
    let field = env.add_field("Field A", "10");
    let ids = env.book(field, MONDAY_18, MONDAY_19, &["--recurring"]);

    env.command()
        .args(["attach-proof", &ids[1].to_string(), "BANK-1"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("session 0"));

    env.command()
        .args(["attach-proof", &ids[0].to_string(), "BANK-1"])
        .assert()
        .success();
}

#[test]
fn test_cancel_group_releases_every_week() {
    let env = TestEnv::new();
    let field = env.add_field("Field A", "10");
    env.book(field, MONDAY_18, MONDAY_19, &["--recurring"]);
    let group = env.list_json(&[])[0]["group"]
        .as_str()
        .unwrap()
        .to_string();

    env.command()
        .args(["cancel-group", &group])
        .assert()
        .success()
        .stderr(predicate::str::contains("Canceled 4 session(s)"));

    assert_eq!(env.list_json(&["--status", "canceled"]).len(), 4);
    env.book(field, MONDAY_18, MONDAY_19, &["--recurring"]);
}

#[test]
fn test_cancel_unknown_group() {
    let env = TestEnv::new();
    env.add_field("Field A", "10");

    env.command()
        .args(["cancel-group", "6f1c2a7e-9d4b-4c1e-8a55-0b6d7d1f9e21"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no reservations in group"));
}

#[test]
fn test_expire_requires_a_threshold() {
    let env = TestEnv::new();
    env.add_field("Field A", "10");

    env.command()
        .arg("expire")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--hours"));
}

#[test]
fn test_expire_sweeps_old_pending_bookings() {
    let env = TestEnv::new();
    let field = env.add_field("Field A", "10");
    let stale = env.book(field, "2030-03-04 08:00", "2030-03-04 09:00", &[])[0];
    let paid = env.book(field, "2030-03-04 09:00", "2030-03-04 10:00", &[])[0];
    let fresh = env.book(field, "2030-03-04 10:00", "2030-03-04 11:00", &[])[0];
    set_status(&env, paid, "paid").success();

    // Age the first two bookings by three hours
    let conn = Connection::open(env.data_dir.join("fieldbook.db")).unwrap();
    conn.execute(
        "UPDATE reservations SET created_at = created_at - 10800 WHERE id IN (?1, ?2)",
        [stale, paid],
    )
    .unwrap();
    drop(conn);

    env.command()
        .args(["expire", "--hours", "2", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Would expire 1"));
    assert!(env.list_json(&["--status", "expired"]).is_empty());

    env.command()
        .args(["--quiet", "expire", "--hours", "2"])
        .assert()
        .success()
        .stdout("1\n");

    let expired = env.list_json(&["--status", "expired"]);
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0]["id"], stale);

    let pending = env.list_json(&["--status", "pending"]);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], fresh);
}

#[test]
fn test_expire_uses_configured_threshold() {
    let env = TestEnv::new();
    env.write_config("expiry:\n  pending_max_age_hours: 48\n");
    let field = env.add_field("Field A", "10");
    env.book(field, MONDAY_18, MONDAY_19, &[]);

    env.command()
        .arg("expire")
        .assert()
        .success()
        .stderr(predicate::str::contains("Expired 0 reservation(s)"));
}
