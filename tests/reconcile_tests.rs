mod common;
use common::{RESPONSIBLE, d, duty_id, pool_with, seeded_pool, snapshot};
use rroster::core::catalog::DutyCatalog;
use rroster::core::reconcile::{ReconcileKind, ReconcileLogic, ReconcileSettings};
use rroster::db::log::load_audit;
use rroster::db::pool::DbPool;
use rroster::db::queries::{insert_assignments, load_group_control};
use rroster::errors::AppError;
use rroster::models::assignment::NewAssignment;
use rroster::models::duty_type::NewDutyType;
use rroster::models::roster::{RawRosterRow, ResponsibleMap};
use rroster::models::window::DateWindow;
use std::collections::BTreeSet;

fn window(s: (i32, u32, u32), e: (i32, u32, u32)) -> DateWindow {
    DateWindow::new(d(s.0, s.1, s.2), d(e.0, e.1, e.2)).expect("valid window")
}

fn responsible(entries: &[((i32, u32, u32), &str)]) -> ResponsibleMap {
    entries
        .iter()
        .map(|((y, m, day), p)| (d(*y, *m, *day), p.to_string()))
        .collect()
}

fn january_roster() -> Vec<RawRosterRow> {
    vec![
        RawRosterRow::new("ivanov", "ДЖ")
            .with_cell(d(2025, 1, 1), "Р")
            .with_cell(d(2025, 1, 2), "ЗН Р")
            .with_cell(d(2025, 1, 3), "-")
            .with_cell(d(2025, 1, 4), "РГДТП"),
        RawRosterRow::new("petrov", "ДН")
            .with_cell(d(2025, 1, 1), "ЗН Р")
            .with_cell(d(2025, 1, 2), "Р")
            .with_cell(d(2025, 1, 3), "")
            .with_cell(d(2025, 1, 4), "ДТП"),
    ]
}

fn audit_count(pool: &DbPool, operation: &str) -> usize {
    load_audit(&pool.conn)
        .expect("load audit")
        .iter()
        .filter(|e| e.operation == operation)
        .count()
}

#[test]
fn test_responsible_single_day_scenario() {
    let mut pool = pool_with(&[NewDutyType::new(RESPONSIBLE, RESPONSIBLE, None)]);
    let settings = ReconcileSettings::default();
    let resp_id = duty_id(&pool, RESPONSIBLE);

    // earlier schedule, outside the next window
    ReconcileLogic::replace_responsible(
        &mut pool,
        &settings,
        &responsible(&[((2024, 12, 31), "personB")]),
        window((2024, 12, 31), (2024, 12, 31)),
    )
    .expect("first import");

    let report = ReconcileLogic::replace_responsible(
        &mut pool,
        &settings,
        &responsible(&[((2025, 1, 1), "personA")]),
        window((2025, 1, 1), (2025, 1, 1)),
    )
    .expect("second import");

    assert_eq!(report.kind, ReconcileKind::Responsible);
    assert_eq!(report.deleted, 0);
    assert_eq!(report.inserted, 1);
    assert_eq!(
        snapshot(&pool),
        vec![
            (d(2024, 12, 31), resp_id, "personB".to_string()),
            (d(2025, 1, 1), resp_id, "personA".to_string()),
        ]
    );
}

#[test]
fn test_responsible_missing_leaves_storage_untouched() {
    let mut pool = pool_with(&[NewDutyType::new("Рабочая группа", "РГ", None)]);
    let rg = duty_id(&pool, "Рабочая группа");

    insert_assignments(
        &pool.conn,
        &[NewAssignment {
            date: d(2025, 1, 1),
            duty_type_id: rg,
            person_id: "ivanov".into(),
        }],
    )
    .expect("pre-existing row");
    let before = snapshot(&pool);

    let err = ReconcileLogic::replace_responsible(
        &mut pool,
        &ReconcileSettings::default(),
        &responsible(&[((2025, 1, 1), "personA")]),
        window((2025, 1, 1), (2025, 1, 31)),
    )
    .unwrap_err();

    assert!(matches!(err, AppError::RequiredDutyTypeMissing(ref n) if n == RESPONSIBLE));
    assert_eq!(snapshot(&pool), before);
    assert_eq!(audit_count(&pool, "import_responsible"), 0);
}

#[test]
fn test_general_requires_responsible_definition_too() {
    let mut pool = pool_with(&[NewDutyType::new("Рабочая группа", "РГ", None)]);

    let err = ReconcileLogic::replace_general(
        &mut pool,
        &ReconcileSettings::default(),
        &january_roster(),
        window((2025, 1, 1), (2025, 1, 31)),
    )
    .unwrap_err();

    assert!(matches!(err, AppError::RequiredDutyTypeMissing(_)));
    assert!(snapshot(&pool).is_empty());
}

#[test]
fn test_empty_catalog_is_fatal() {
    let mut pool = DbPool::in_memory().expect("db");

    let err = ReconcileLogic::replace_general(
        &mut pool,
        &ReconcileSettings::default(),
        &january_roster(),
        window((2025, 1, 1), (2025, 1, 31)),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::DutyCatalogEmpty));

    let err = ReconcileLogic::replace_responsible(
        &mut pool,
        &ReconcileSettings::default(),
        &responsible(&[((2025, 1, 1), "personA")]),
        window((2025, 1, 1), (2025, 1, 31)),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::DutyCatalogEmpty));
}

#[test]
fn test_general_import_tokenizes_every_cell() {
    let mut pool = seeded_pool();
    let report = ReconcileLogic::replace_general(
        &mut pool,
        &ReconcileSettings::default(),
        &january_roster(),
        window((2025, 1, 1), (2025, 1, 31)),
    )
    .expect("import");

    let duty = |name: &str| duty_id(&pool, name);
    let ivanov = "ivanov".to_string();
    let petrov = "petrov".to_string();

    let mut expected = vec![
        (d(2025, 1, 1), duty("Дежурный по роте"), ivanov.clone()),
        (d(2025, 1, 2), duty("Заступающий дежурный по роте"), ivanov.clone()),
        (d(2025, 1, 4), duty("Рабочая группа"), ivanov.clone()),
        (d(2025, 1, 4), duty("Дежурный по технопарку"), ivanov.clone()),
        (d(2025, 1, 1), duty("Заступающий дневальный по роте"), petrov.clone()),
        (d(2025, 1, 2), duty("Дневальный по роте"), petrov.clone()),
        (d(2025, 1, 4), duty("Дежурный по технопарку"), petrov.clone()),
    ];
    expected.sort();

    assert_eq!(report.inserted, 7);
    assert!(report.unmatched.is_empty());
    assert_eq!(snapshot(&pool), expected);
}

#[test]
fn test_empty_cells_write_nothing() {
    let mut pool = seeded_pool();
    let roster = vec![
        RawRosterRow::new("ivanov", "ДЖ")
            .with_cell(d(2025, 1, 1), "-")
            .with_cell(d(2025, 1, 2), ""),
    ];

    let report = ReconcileLogic::replace_general(
        &mut pool,
        &ReconcileSettings::default(),
        &roster,
        window((2025, 1, 1), (2025, 1, 31)),
    )
    .expect("import");

    assert_eq!(report.inserted, 0);
    assert!(report.unmatched.is_empty());
    assert!(snapshot(&pool).is_empty());
}

#[test]
fn test_reimporting_same_roster_is_idempotent() {
    let mut pool = seeded_pool();
    let settings = ReconcileSettings::default();
    let w = window((2025, 1, 1), (2025, 1, 31));

    ReconcileLogic::replace_general(&mut pool, &settings, &january_roster(), w).expect("first");
    let first = snapshot(&pool);

    let report =
        ReconcileLogic::replace_general(&mut pool, &settings, &january_roster(), w).expect("second");
    assert_eq!(report.deleted, first.len());
    assert_eq!(report.inserted, first.len());
    assert_eq!(snapshot(&pool), first);

    let input = responsible(&[((2025, 1, 1), "personA"), ((2025, 1, 2), "personB")]);
    ReconcileLogic::replace_responsible(&mut pool, &settings, &input, w).expect("resp 1");
    let with_resp = snapshot(&pool);
    ReconcileLogic::replace_responsible(&mut pool, &settings, &input, w).expect("resp 2");
    assert_eq!(snapshot(&pool), with_resp);
}

#[test]
fn test_rows_outside_the_window_are_preserved() {
    let mut pool = seeded_pool();
    let settings = ReconcileSettings::default();

    ReconcileLogic::replace_general(
        &mut pool,
        &settings,
        &january_roster(),
        window((2025, 1, 1), (2025, 1, 31)),
    )
    .expect("january");
    let before = snapshot(&pool);

    // new roster only covers the 2nd; window is the 2nd..3rd
    let update = vec![RawRosterRow::new("sidorov", "ДЖ").with_cell(d(2025, 1, 2), "РГ")];
    let w = window((2025, 1, 2), (2025, 1, 3));
    ReconcileLogic::replace_general(&mut pool, &settings, &update, w).expect("update");

    let after = snapshot(&pool);
    let outside = |rows: &[(chrono::NaiveDate, i64, String)]| -> Vec<_> {
        rows.iter().filter(|r| !w.contains(r.0)).cloned().collect()
    };
    assert_eq!(outside(&after), outside(&before));

    let inside: Vec<_> = after.iter().filter(|r| w.contains(r.0)).cloned().collect();
    assert_eq!(
        inside,
        vec![(d(2025, 1, 2), duty_id(&pool, "Рабочая группа"), "sidorov".to_string())]
    );
}

#[test]
fn test_general_and_responsible_never_touch_each_other() {
    let mut pool = seeded_pool();
    let settings = ReconcileSettings::default();
    let resp_id = duty_id(&pool, RESPONSIBLE);
    let w = window((2025, 1, 1), (2025, 1, 31));

    let resp_input = responsible(&[((2025, 1, 1), "personA"), ((2025, 1, 4), "personB")]);
    ReconcileLogic::replace_responsible(&mut pool, &settings, &resp_input, w).expect("resp");

    // a cell spelling the Responsible code must not create a Responsible row
    let roster = vec![RawRosterRow::new("ivanov", "ДЖ").with_cell(d(2025, 1, 2), "Ответственный")];
    let report = ReconcileLogic::replace_general(&mut pool, &settings, &roster, w).expect("general");
    assert_eq!(report.inserted, 0);
    assert_eq!(report.unmatched.len(), 1);

    let resp_rows: Vec<_> = snapshot(&pool)
        .into_iter()
        .filter(|r| r.1 == resp_id)
        .collect();
    assert_eq!(
        resp_rows,
        vec![
            (d(2025, 1, 1), resp_id, "personA".to_string()),
            (d(2025, 1, 4), resp_id, "personB".to_string()),
        ]
    );

    ReconcileLogic::replace_general(&mut pool, &settings, &january_roster(), w).expect("general");
    let general_before: Vec<_> = snapshot(&pool)
        .into_iter()
        .filter(|r| r.1 != resp_id)
        .collect();

    let new_resp = responsible(&[((2025, 1, 3), "personC")]);
    let report = ReconcileLogic::replace_responsible(&mut pool, &settings, &new_resp, w).expect("resp");
    assert_eq!(report.deleted, 2);

    let after = snapshot(&pool);
    let general_after: Vec<_> = after.iter().filter(|r| r.1 != resp_id).cloned().collect();
    assert_eq!(general_after, general_before);
    assert_eq!(
        after.iter().filter(|r| r.1 == resp_id).cloned().collect::<Vec<_>>(),
        vec![(d(2025, 1, 3), resp_id, "personC".to_string())]
    );
}

#[test]
fn test_responsible_dates_outside_window_are_still_inserted() {
    let mut pool = seeded_pool();
    let input = responsible(&[((2025, 1, 1), "personA"), ((2025, 2, 1), "personB")]);

    let report = ReconcileLogic::replace_responsible(
        &mut pool,
        &ReconcileSettings::default(),
        &input,
        window((2025, 1, 1), (2025, 1, 31)),
    )
    .expect("import");

    assert_eq!(report.inserted, 2);
    assert_eq!(snapshot(&pool).len(), 2);
}

#[test]
fn test_unrecognized_text_is_reported_not_raised() {
    let mut pool = seeded_pool();
    let roster = vec![
        RawRosterRow::new("ivanov", "ДЖ")
            .with_cell(d(2025, 1, 1), "РГ отп")
            .with_cell(d(2025, 1, 2), "больн"),
    ];

    let report = ReconcileLogic::replace_general(
        &mut pool,
        &ReconcileSettings::default(),
        &roster,
        window((2025, 1, 1), (2025, 1, 31)),
    )
    .expect("import");

    assert_eq!(report.inserted, 1);
    assert_eq!(report.unmatched.len(), 2);
    assert_eq!(report.unmatched[0].date, d(2025, 1, 1));
    assert_eq!(report.unmatched[0].leftover, "отп");
    assert_eq!(report.unmatched[1].text, "больн");
}

#[test]
fn test_storage_failure_rolls_back_the_whole_call() {
    let mut pool = seeded_pool();
    let settings = ReconcileSettings::default();
    let w = window((2025, 1, 1), (2025, 1, 31));

    ReconcileLogic::replace_general(&mut pool, &settings, &january_roster(), w).expect("first");
    let before = snapshot(&pool);
    let audits = audit_count(&pool, "import_general");

    pool.conn
        .execute_batch(
            "CREATE TRIGGER fail_on_boom BEFORE INSERT ON schedule_assignments
             WHEN NEW.person_id = 'boom'
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
        )
        .expect("create trigger");

    let mut roster = january_roster();
    roster.push(RawRosterRow::new("boom", "ДЖ").with_cell(d(2025, 1, 5), "РГ"));

    let err = ReconcileLogic::replace_general(&mut pool, &settings, &roster, w).unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));

    assert_eq!(snapshot(&pool), before);
    assert_eq!(audit_count(&pool, "import_general"), audits);
}

#[test]
fn test_group_control_replaces_only_the_window() {
    let mut pool = DbPool::in_memory().expect("db");

    let first: BTreeSet<_> = [d(2024, 12, 31), d(2025, 1, 15)].into_iter().collect();
    ReconcileLogic::replace_group_control(&mut pool, &first, window((2024, 12, 1), (2025, 1, 31)))
        .expect("first");

    let second: BTreeSet<_> = [d(2025, 1, 2), d(2025, 1, 5)].into_iter().collect();
    let report =
        ReconcileLogic::replace_group_control(&mut pool, &second, window((2025, 1, 1), (2025, 1, 31)))
            .expect("second");

    assert_eq!(report.deleted, 1);
    assert_eq!(report.inserted, 2);

    let dates: Vec<_> = load_group_control(&pool.conn, None)
        .expect("load")
        .into_iter()
        .map(|e| e.date)
        .collect();
    assert_eq!(dates, vec![d(2024, 12, 31), d(2025, 1, 2), d(2025, 1, 5)]);
}

#[test]
fn test_staged_window_commits_separately() {
    let mut pool = seeded_pool();
    let catalog = DutyCatalog::load_active(&pool.conn).expect("catalog");
    let w = window((2025, 1, 1), (2025, 1, 31));

    let staged =
        ReconcileLogic::stage_general(&catalog, &ReconcileSettings::default(), &january_roster(), w)
            .expect("stage");
    assert_eq!(staged.row_count(), 7);
    assert!(snapshot(&pool).is_empty(), "staging writes nothing");

    let report = ReconcileLogic::commit(&mut pool.conn, staged).expect("commit");
    assert_eq!(report.inserted, 7);
    assert_eq!(snapshot(&pool).len(), 7);
    assert_eq!(audit_count(&pool, "import_general"), 1);
}
