//! Whole-session tests over a temporary data directory

use kpi_desk::{DeskConfig, ErrorCategory, KpiDesk, Outcome, Session};
use kpi_form::NoticeLevel;
use kpi_store::RecordKey;
use kpi_test_utils::{
    fixture_dir, read_kpi_data, write_tables_with, ScriptedSurface, KPI_DATA, KPI_INFO, ROLES,
    USERS,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn open(dir: &TempDir) -> KpiDesk {
    KpiDesk::open(DeskConfig::new().with_data_dir(dir.path())).unwrap()
}

fn login(desk: &KpiDesk, user: &str, surface: &mut ScriptedSurface) -> Session {
    desk.login(user, surface).unwrap().unwrap()
}

#[test]
fn unknown_user_is_refused() {
    let dir = fixture_dir();
    let desk = open(&dir);
    let mut surface = ScriptedSurface::new();

    assert_eq!(desk.login("nobody@gmail.com", &mut surface).unwrap(), None);
    assert!(surface.has_notice(
        NoticeLevel::Error,
        "You don't have access to this application"
    ));
}

#[test]
fn update_rewrites_the_selected_row() {
    let dir = fixture_dir();
    let mut desk = open(&dir);
    let mut surface = ScriptedSurface::new()
        .then_choose("Update KPIs")
        .then_choose("K1")
        .then_choose("2024-01-01")
        .then_input("150")
        .then_confirm(true);

    let session = login(&desk, "u1@gmail.com", &mut surface);
    assert_eq!(session.role_id, 1);

    let outcome = desk.run(&session, &mut surface).unwrap();
    assert!(matches!(
        outcome,
        Outcome::Written { ref key, .. } if *key == RecordKey::new("K1", "2024-01-01")
    ));

    assert_eq!(
        read_kpi_data(dir.path()),
        KPI_DATA.replace("{'target':100}", "{'target':150}")
    );
    assert_eq!(
        surface.messages(NoticeLevel::Success),
        vec!["Welcome u1@gmail.com!", "KPI data updated successfully!"]
    );
    assert_eq!(
        surface.messages(NoticeLevel::Info),
        vec!["Your current role is: Analyst", "the new value is: 150"]
    );
}

#[test]
fn role_only_sees_allowed_kpis() {
    let dir = fixture_dir();
    let mut desk = open(&dir);
    let mut surface = ScriptedSurface::new().then_choose("Update KPIs");

    let session = login(&desk, "u1@gmail.com", &mut surface);
    assert_eq!(desk.run(&session, &mut surface).unwrap(), Outcome::Discarded);

    let (label, options) = surface.menus.last().unwrap();
    assert_eq!(label, "Select KPI");
    assert_eq!(options, &vec!["K1".to_string()]);

    let dates: Vec<String> = desk
        .accessible_records(&session)
        .unwrap()
        .into_iter()
        .map(|r| r.value_date)
        .collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-02-01"]);
}

#[test]
fn declined_form_writes_nothing() {
    let dir = fixture_dir();
    let mut desk = open(&dir);
    let mut surface = ScriptedSurface::new()
        .then_choose("K1")
        .then_choose("2024-02-01")
        .then_input("999")
        .then_confirm(false);

    let session = login(&desk, "u1@gmail.com", &mut surface);
    assert_eq!(
        desk.update_kpi(&session, &mut surface).unwrap(),
        Outcome::Discarded
    );
    assert_eq!(read_kpi_data(dir.path()), KPI_DATA);
}

#[test]
fn concurrent_edit_is_a_conflict() {
    let dir = fixture_dir();
    let mut desk = open(&dir);
    let mut surface = ScriptedSurface::new()
        .then_choose("K1")
        .then_choose("2024-01-01")
        .then_input("150")
        .then_confirm(true);
    let session = login(&desk, "u1@gmail.com", &mut surface);

    // Someone else saves the same row after the desk loaded it
    let theirs = KPI_DATA.replace("{'target':100}", "{'target':175}");
    fs::write(dir.path().join("KPI_Data.csv"), &theirs).unwrap();

    let err = desk.update_kpi(&session, &mut surface).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(read_kpi_data(dir.path()), theirs);
    assert_eq!(surface.messages(NoticeLevel::Success).len(), 1);
}

#[test]
fn enter_new_appends_a_dated_row() {
    let dir = fixture_dir();
    let mut desk = open(&dir);
    let mut surface = ScriptedSurface::new()
        .then_choose("Enter new value to KPIs")
        .then_choose("Churn")
        .then_input("2024-01-01")
        .then_input("March")
        .then_input("2024-03-01")
        .then_input("2")
        .then_input("0.7")
        .then_input("")
        .then_confirm(true);

    let session = login(&desk, "u2@gmail.com", &mut surface);
    let outcome = desk.run(&session, &mut surface).unwrap();
    assert!(matches!(outcome, Outcome::Written { .. }));

    assert_eq!(
        read_kpi_data(dir.path()),
        format!("{KPI_DATA}K2|Churn|2024-03-01|{{'rate':0.7,'note':None}}\n")
    );
    assert_eq!(
        surface.messages(NoticeLevel::Error),
        vec![
            "Churn already has a value dated 2024-01-01",
            "The input value 'March' is not valid.",
            "The input value '2' is not valid.",
        ]
    );
    assert!(surface.has_notice(NoticeLevel::Warning, "Please fill the cell"));
}

#[test]
fn admitted_user_without_role_row_is_an_error() {
    let dir = fixture_dir();
    let desk = open(&dir);
    let mut surface = ScriptedSurface::new();

    let session = login(&desk, "ghost@gmail.com", &mut surface);
    let err = desk.accessible_records(&session).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
}

#[test]
fn empty_allow_list_has_no_access() {
    let dir = TempDir::new().unwrap();
    let roles = ROLES.replace("['K1']", "[]");
    write_tables_with(dir.path(), USERS, &roles, KPI_DATA, KPI_INFO);
    let mut desk = open(&dir);
    let mut surface = ScriptedSurface::new();

    let session = login(&desk, "u1@gmail.com", &mut surface);
    assert_eq!(
        desk.update_kpi(&session, &mut surface).unwrap(),
        Outcome::NoAccess
    );
}

#[test]
fn stored_values_must_match_schema() {
    let dir = TempDir::new().unwrap();
    let data = KPI_DATA.replace("{'target':100}", "{'target':'high'}");
    write_tables_with(dir.path(), USERS, ROLES, &data, KPI_INFO);
    let mut desk = open(&dir);
    let mut surface = ScriptedSurface::new()
        .then_choose("K1")
        .then_choose("2024-01-01");

    let session = login(&desk, "u1@gmail.com", &mut surface);
    let err = desk.update_kpi(&session, &mut surface).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::SchemaViolation);
    assert!(surface.prompts.is_empty());
}

#[test]
fn unsupported_type_stops_before_prompting() {
    let dir = TempDir::new().unwrap();
    let info = KPI_INFO.replace("{'target':'int'}", "{'target':'money'}");
    write_tables_with(dir.path(), USERS, ROLES, KPI_DATA, &info);
    let mut desk = open(&dir);
    let mut surface = ScriptedSurface::new()
        .then_choose("K1")
        .then_choose("2024-01-01");

    let session = login(&desk, "u1@gmail.com", &mut surface);
    let err = desk.update_kpi(&session, &mut surface).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnsupportedType);
    assert!(surface.prompts.is_empty());
}

#[test]
fn malformed_allow_list_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let roles = ROLES.replace("['K1']", "['K1'");
    write_tables_with(dir.path(), USERS, &roles, KPI_DATA, KPI_INFO);
    let desk = open(&dir);
    let mut surface = ScriptedSurface::new();

    let session = login(&desk, "u1@gmail.com", &mut surface);
    let err = desk.accessible_records(&session).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Parse);
}
