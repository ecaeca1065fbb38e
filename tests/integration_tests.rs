use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db_with_staff, plg, punch_full_day, setup_test_db};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("init_schema");

    plg()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    // idempotent: running init twice must not fail
    plg()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
}

#[test]
fn test_staff_add_and_list() {
    let db_path = setup_test_db("staff_list");
    init_db_with_staff(&db_path);

    plg()
        .args([
            "--db", &db_path, "staff", "E002", "--name", "Ana", "--schedule", "M4", "--admin",
        ])
        .assert()
        .success();

    plg()
        .args(["--db", &db_path, "staff", "--list"])
        .assert()
        .success()
        .stdout(contains("E001").and(contains("E002")).and(contains("admin")));
}

#[test]
fn test_staff_rejects_unknown_schedule_code() {
    let db_path = setup_test_db("staff_bad_code");
    init_db_with_staff(&db_path);

    plg()
        .args(["--db", &db_path, "staff", "E009", "--schedule", "ZZZ"])
        .assert()
        .failure()
        .stderr(contains("unknown schedule code"));
}

#[test]
fn test_punch_on_time_and_duplicate_rejection() {
    let db_path = setup_test_db("punch_dup");
    init_db_with_staff(&db_path);

    // 2026-08-03 is a Monday: schedule M expects entry at 07:20
    plg()
        .args([
            "--db",
            &db_path,
            "punch",
            "E001",
            "entry",
            "--at",
            "07:20",
            "--date",
            "2026-08-03",
        ])
        .assert()
        .success()
        .stdout(contains("recorded at 07:20").and(contains("right on time")));

    // second attempt for the same slot fails, the first record stands
    plg()
        .args([
            "--db",
            &db_path,
            "punch",
            "E001",
            "entry",
            "--at",
            "07:25",
            "--date",
            "2026-08-03",
        ])
        .assert()
        .failure()
        .stderr(contains("already recorded for 2026-08-03"));
}

#[test]
fn test_punch_outside_window_warns_but_records() {
    let db_path = setup_test_db("punch_advisory");
    init_db_with_staff(&db_path);

    plg()
        .args([
            "--db",
            &db_path,
            "punch",
            "E001",
            "entry",
            "--at",
            "09:00",
            "--date",
            "2026-08-03",
        ])
        .assert()
        .success()
        .stdout(contains("window closed"));
}

#[test]
fn test_punch_without_schedule_is_rejected() {
    let db_path = setup_test_db("punch_folga");
    init_db_with_staff(&db_path);

    plg()
        .args([
            "--db", &db_path, "staff", "E003", "--name", "Leo", "--schedule", "FOLGA",
        ])
        .assert()
        .success();

    plg()
        .args([
            "--db",
            &db_path,
            "punch",
            "E003",
            "entry",
            "--at",
            "07:20",
            "--date",
            "2026-08-03",
        ])
        .assert()
        .failure()
        .stderr(contains("No schedule for this day"));
}

#[test]
fn test_punch_unknown_employee() {
    let db_path = setup_test_db("punch_nobody");
    init_db_with_staff(&db_path);

    plg()
        .args([
            "--db", &db_path, "punch", "E999", "entry", "--at", "07:20",
        ])
        .assert()
        .failure()
        .stderr(contains("Unknown employee"));
}

#[test]
fn test_balance_full_on_time_day() {
    let db_path = setup_test_db("balance_clean");
    init_db_with_staff(&db_path);
    punch_full_day(&db_path, "E001", "2026-08-03");

    plg()
        .args(["--db", &db_path, "balance", "E001", "2026-08-03"])
        .assert()
        .success()
        .stdout(
            contains("Worked: 08:00")
                .and(contains("Expected: 08:00"))
                .and(contains("Balance: 0h 0m"))
                .and(contains("Violations: none")),
        );
}

#[test]
fn test_late_exit_violation_and_correction_path() {
    let db_path = setup_test_db("late_exit");
    init_db_with_staff(&db_path);

    for (slot, at) in [
        ("entry", "07:20"),
        ("lunch-out", "12:00"),
        ("lunch-return", "13:00"),
        ("exit", "16:35"),
    ] {
        plg()
            .args([
                "--db",
                &db_path,
                "punch",
                "E001",
                slot,
                "--at",
                at,
                "--date",
                "2026-08-04",
            ])
            .assert()
            .success();
    }

    plg()
        .args(["--db", &db_path, "balance", "E001", "2026-08-04"])
        .assert()
        .success()
        .stdout(
            contains("Balance: +0h 15m")
                .and(contains("Violations: 1"))
                .and(contains("exit 15 min late")),
        );

    // the correction flows through the same classification path
    plg()
        .args([
            "--db",
            &db_path,
            "correct",
            "E001",
            "2026-08-04",
            "exit",
            "--time",
            "16:20",
            "--reason",
            "left on time, forgot to punch",
        ])
        .assert()
        .success()
        .stdout(contains("Adjustments remaining this month: 3"));

    plg()
        .args(["--db", &db_path, "balance", "E001", "2026-08-04"])
        .assert()
        .success()
        .stdout(contains("Balance: 0h 0m").and(contains("Violations: none")));
}

#[test]
fn test_quota_exhaustion_and_admin_exemption() {
    let db_path = setup_test_db("quota_cli");
    init_db_with_staff(&db_path);

    // four corrections allowed per month
    for t in ["16:21", "16:22", "16:23", "16:24"] {
        plg()
            .args([
                "--db",
                &db_path,
                "correct",
                "E001",
                "2026-08-03",
                "exit",
                "--time",
                t,
                "--reason",
                "fix",
            ])
            .assert()
            .success();
    }

    // the fifth hits the cap
    plg()
        .args([
            "--db",
            &db_path,
            "correct",
            "E001",
            "2026-08-03",
            "exit",
            "--time",
            "16:25",
            "--reason",
            "fix",
        ])
        .assert()
        .failure()
        .stderr(contains("quota exhausted"));

    // the same request as administrator succeeds and is audited
    plg()
        .args([
            "--db",
            &db_path,
            "correct",
            "E001",
            "2026-08-03",
            "exit",
            "--time",
            "16:25",
            "--reason",
            "supervisor fix",
            "--admin",
        ])
        .assert()
        .success()
        .stdout(contains("Administrator correction"));

    plg()
        .args(["--db", &db_path, "quota", "E001"])
        .assert()
        .success()
        .stdout(
            contains("Used: 4 | Remaining: 0")
                .and(contains("(admin)"))
                .and(contains("supervisor fix")),
        );
}

#[test]
fn test_perfect_day_batch_insertion() {
    let db_path = setup_test_db("perfect_cli");
    init_db_with_staff(&db_path);

    plg()
        .args([
            "--db",
            &db_path,
            "correct",
            "E001",
            "2026-08-03",
            "--perfect",
            "--admin",
        ])
        .assert()
        .success()
        .stdout(contains("Inserted 4 schedule-exact punches"));

    plg()
        .args(["--db", &db_path, "balance", "E001", "2026-08-03"])
        .assert()
        .success()
        .stdout(contains("Balance: 0h 0m").and(contains("Violations: none")));

    // non-admin cannot batch-insert
    plg()
        .args([
            "--db",
            &db_path,
            "correct",
            "E001",
            "2026-08-04",
            "--perfect",
        ])
        .assert()
        .failure()
        .stderr(contains("Administrator required"));
}

#[test]
fn test_list_with_period_shows_provenance() {
    let db_path = setup_test_db("list_period");
    init_db_with_staff(&db_path);
    punch_full_day(&db_path, "E001", "2026-08-03");

    plg()
        .args(["--db", &db_path, "list", "E001", "--period", "2026-08"])
        .assert()
        .success()
        .stdout(
            contains("2026-08-03 07:20")
                .and(contains("entry"))
                .and(contains("normal")),
        );
}

#[test]
fn test_sentinel_punch_is_hidden_from_listings() {
    let db_path = setup_test_db("sentinel_list");
    init_db_with_staff(&db_path);

    // 10:10 is a configured sentinel: stored, but filtered from read views
    plg()
        .args([
            "--db",
            &db_path,
            "punch",
            "E001",
            "entry",
            "--at",
            "10:10",
            "--date",
            "2026-08-03",
        ])
        .assert()
        .success();

    plg()
        .args(["--db", &db_path, "list", "E001", "--period", "2026-08"])
        .assert()
        .success()
        .stdout(contains("No punches for E001"));
}

#[test]
fn test_summary_output_and_json() {
    let db_path = setup_test_db("summary_cli");
    init_db_with_staff(&db_path);
    punch_full_day(&db_path, "E001", "2026-08-03");

    plg()
        .args(["--db", &db_path, "summary", "E001", "2026-08"])
        .assert()
        .success()
        .stdout(
            contains("Days worked: 1")
                .and(contains("Violations: 0"))
                .and(contains("Attendance bonus:")),
        );

    plg()
        .args(["--db", &db_path, "summary", "E001", "2026-08", "--json"])
        .assert()
        .success()
        .stdout(contains("\"bonus_amount\"").and(contains("\"days_worked\": 1")));
}

#[test]
fn test_schedule_command_resolves_codes() {
    let db_path = setup_test_db("schedule_cmd");

    plg()
        .args([
            "--db", &db_path, "schedule", "M", "--date", "2026-08-03",
        ])
        .assert()
        .success()
        .stdout(contains("07:20 - 16:20"));

    plg()
        .args([
            "--db", &db_path, "schedule", "FOLGA", "--date", "2026-08-03",
        ])
        .assert()
        .success()
        .stdout(contains("no work expected"));

    plg()
        .args(["--db", &db_path, "schedule"])
        .assert()
        .success()
        .stdout(contains("M4").and(contains("FOLGA_EXTRA")));
}

#[test]
fn test_internal_log_records_operations() {
    let db_path = setup_test_db("log_cli");
    init_db_with_staff(&db_path);
    punch_full_day(&db_path, "E001", "2026-08-03");

    plg()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("punch").and(contains("E001 2026-08-03 entry")));
}

#[test]
fn test_db_maintenance_commands() {
    let db_path = setup_test_db("db_cmds");
    init_db_with_staff(&db_path);

    plg()
        .args(["--db", &db_path, "db", "--check", "--info", "--vacuum"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed").and(contains("Punches:")));
}
