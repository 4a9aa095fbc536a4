//! Property tests for role filtering

use kpi_access::{allowed_ids, filter_records};
use kpi_store::{KpiRecord, RoleRecord};
use proptest::prelude::*;

fn records() -> impl Strategy<Value = Vec<KpiRecord>> {
    prop::collection::vec(("K[0-5]", 0u32..4), 0..20).prop_map(|rows| {
        rows.into_iter()
            .map(|(id, day)| KpiRecord {
                kpi_name: format!("{id} name"),
                value_date: format!("2024-01-0{}", day + 1),
                values_text: "{}".to_string(),
                kpi_id: id,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn kept_rows_are_exactly_the_allowed_ones(
        all in records(),
        allowed in prop::collection::vec("K[0-5]", 0..4),
    ) {
        let kept = filter_records(&allowed, &all);
        let expected: Vec<KpiRecord> = all
            .iter()
            .filter(|r| allowed.contains(&r.kpi_id))
            .cloned()
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn kept_rows_keep_table_order(all in records(), allowed in prop::collection::vec("K[0-5]", 0..4)) {
        let kept = filter_records(&allowed, &all);
        let mut cursor = all.iter();
        for row in &kept {
            prop_assert!(cursor.any(|r| r == row));
        }
    }

    #[test]
    fn encoded_allow_list_decodes_to_same_ids(ids in prop::collection::vec("K[0-9]{1,3}", 0..6)) {
        let text = format!(
            "[{}]",
            ids.iter().map(|id| format!("'{id}'")).collect::<Vec<_>>().join(", ")
        );
        let role = RoleRecord {
            role_id: 1,
            role_name: "Analyst".to_string(),
            allowed_kpis_text: text,
        };
        prop_assert_eq!(allowed_ids(&role).unwrap(), ids);
    }
}
