//! Form session tests against a scripted surface

use kpi_form::{reconcile, CellRegistry, FormGenerator, FormSession, NoticeLevel};
use kpi_literal::{parse_map, Literal, LiteralMap};
use kpi_store::KpiSchema;
use kpi_test_utils::ScriptedSurface;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn scripted(inputs: &[&str], confirm: bool) -> ScriptedSurface {
    inputs
        .iter()
        .fold(ScriptedSurface::new(), |surface, raw| surface.then_input(raw))
        .then_confirm(confirm)
}

fn run(meta: &str, original: &str, surface: &mut ScriptedSurface) -> Option<LiteralMap> {
    let registry = CellRegistry::with_defaults();
    let schema = KpiSchema::decode("K1", meta).unwrap();
    let form = FormGenerator::new(&registry).generate(&schema).unwrap();
    let original = parse_map(original).unwrap();
    FormSession::new(form, &original).run(surface)
}

#[test]
fn confirmed_entry_is_returned() {
    let mut surface = scripted(&["150"], true);
    let result = run("{'target': 'int'}", "{'target': 100}", &mut surface);

    assert_eq!(result, Some(parse_map("{'target': 150}").unwrap()));
    assert_eq!(
        surface.prompts[0].placeholder.as_deref(),
        Some("Example: 100")
    );
    assert_eq!(surface.messages(NoticeLevel::Info), vec!["the new value is: 150"]);
    let (before, after) = &surface.comparisons[0];
    assert_eq!(before["target"], Literal::Int(100));
    assert_eq!(after["target"], Literal::Int(150));
}

#[test]
fn declined_confirmation_returns_nothing() {
    let mut surface = scripted(&["150"], false);
    assert_eq!(run("{'target': 'int'}", "{'target': 100}", &mut surface), None);
}

#[test]
fn invalid_input_is_asked_again() {
    let mut surface = scripted(&["abc", "12"], true);
    let result = run("{'target': 'int'}", "{'target': 100}", &mut surface).unwrap();

    assert_eq!(result["target"], Literal::Int(12));
    assert_eq!(surface.prompts.len(), 2);
    assert_eq!(
        surface.messages(NoticeLevel::Error),
        vec!["The input value 'abc' is not valid."]
    );
}

#[test]
fn empty_input_keeps_original() {
    let mut surface = scripted(&["", "ops"], true);
    let result = run(
        "{'target': 'int', 'owner': 'str'}",
        "{'target': 100, 'owner': 'fin'}",
        &mut surface,
    )
    .unwrap();

    assert_eq!(result, parse_map("{'target': 100, 'owner': 'ops'}").unwrap());
    assert_eq!(surface.messages(NoticeLevel::Warning), vec!["Please fill the cell"]);
}

#[test]
fn end_of_input_cancels() {
    let mut surface = scripted(&[], true);
    assert_eq!(run("{'target': 'int'}", "{'target': 100}", &mut surface), None);
    assert!(surface.comparisons.is_empty());
}

#[test]
fn new_record_has_no_placeholder() {
    let mut surface = scripted(&["7"], true);
    let result = run("{'target': 'int'}", "{}", &mut surface).unwrap();
    assert!(surface.prompts[0].placeholder.is_none());
    assert_eq!(result, parse_map("{'target': 7}").unwrap());
}

fn field_map() -> impl Strategy<Value = LiteralMap> {
    prop::collection::vec(("[a-e]", any::<i64>()), 0..6).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(k, v)| (k, Literal::Int(v)))
            .collect()
    })
}

proptest! {
    #[test]
    fn reconcile_keeps_untouched_fields(original in field_map(), entries in field_map()) {
        let snapshot = original.clone();
        let updated = reconcile(&original, entries.clone());

        prop_assert_eq!(&original, &snapshot);
        for (field, value) in &original {
            let expected = entries.get(field).unwrap_or(value);
            prop_assert_eq!(&updated[field], expected);
        }
        for (field, value) in &entries {
            prop_assert_eq!(&updated[field], value);
        }
    }
}
