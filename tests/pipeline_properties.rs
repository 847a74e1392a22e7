use proptest::prelude::*;
use proptest::test_runner::Config;
use roster_pipeline::{
    FilterCriteria, PageSpec, QueryState, Record, RecordId, SelectionTracker, SortSpec,
    TableRecord, TableSchema, TableView, execute_stages, filter, paginate, result_stages, search,
    sort, summarize,
};

const STATUSES: [&str; 3] = ["Active", "Inactive", "On Leave"];
const DEPARTMENTS: [&str; 3] = ["HR", "Talent", "People Ops"];
const NAMES: [&str; 5] = ["Ana", "Ben", "Chloe", "Dev", "Hanna"];

fn schema() -> TableSchema {
    TableSchema {
        numeric_fields: vec!["rating".to_string()],
        text_fields: vec!["name".to_string(), "status".to_string()],
        search_fields: vec!["name".to_string(), "department".to_string()],
        status_field: Some("status".to_string()),
        summary_fields: vec!["rating".to_string()],
        ..TableSchema::default()
    }
}

fn roster() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(
        (0..STATUSES.len(), 0..DEPARTMENTS.len(), 0..NAMES.len(), prop::option::of(0_u32..50)),
        0..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (status, dept, name, rating))| {
                let record = Record::new(i as i64)
                    .with("status", STATUSES[status])
                    .with("department", DEPARTMENTS[dept])
                    .with("name", NAMES[name]);
                match rating {
                    Some(r) => record.with("rating", f64::from(r) / 10.0),
                    None => record,
                }
            })
            .collect()
    })
}

fn ids<T: TableRecord>(records: &[T]) -> Vec<RecordId> {
    records.iter().map(TableRecord::id).collect()
}

fn is_subsequence(part: &[RecordId], whole: &[RecordId]) -> bool {
    let mut rest = whole.iter();
    part.iter().all(|id| rest.any(|other| other == id))
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn filter_is_idempotent(records in roster(), status in 0..STATUSES.len()) {
        let criteria = FilterCriteria::new().with("status", STATUSES[status]);
        let once = filter(records.iter(), &criteria, &schema());
        let twice = filter(once.iter().copied(), &criteria, &schema());
        prop_assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn filter_narrows_as_criteria_grow(
        records in roster(),
        status in 0..STATUSES.len(),
        dept in 0..DEPARTMENTS.len()
    ) {
        let loose = FilterCriteria::new().with("status", STATUSES[status]);
        let tight = loose.clone().with("department", DEPARTMENTS[dept]);
        let wide = ids(&filter(records.iter(), &loose, &schema()));
        let narrow = ids(&filter(records.iter(), &tight, &schema()));
        prop_assert!(is_subsequence(&narrow, &wide));
        prop_assert!(is_subsequence(&wide, &ids(&records)));
    }

    #[test]
    fn search_results_contain_the_query(records in roster(), query in "[a-zA-Z ]{0,3}") {
        let fields = schema().search_fields;
        let found = search(records.iter(), &query, &fields);
        prop_assert!(is_subsequence(&ids(&found), &ids(&records)));
        if query.trim().is_empty() {
            prop_assert_eq!(found.len(), records.len());
        } else {
            let needle = query.to_lowercase();
            for record in &found {
                prop_assert!(fields.iter().any(|f| record.field_text(f).to_lowercase().contains(&needle)));
            }
        }
    }

    #[test]
    fn sort_is_a_stable_permutation(records in roster(), descending in any::<bool>()) {
        let spec = if descending { SortSpec::desc("rating") } else { SortSpec::asc("rating") };
        let sorted = sort(records.iter(), &spec, &schema());
        prop_assert_eq!(sorted.len(), records.len());

        for pair in sorted.windows(2) {
            let a = pair[0].field_number("rating").unwrap_or(0.0);
            let b = pair[1].field_number("rating").unwrap_or(0.0);
            if descending {
                prop_assert!(a >= b);
            } else {
                prop_assert!(a <= b);
            }
            // Ids follow input order, so ties must keep ascending ids.
            if a == b {
                prop_assert!(pair[0].id() < pair[1].id());
            }
        }
    }

    #[test]
    fn reversed_ascending_equals_descending_for_distinct_keys(
        ratings in prop::collection::btree_set(0_u32..1000, 0..25),
        names in prop::collection::btree_set("[a-zA-Z]{1,6}", 25),
        shuffle in any::<u64>()
    ) {
        // Distinct ratings and distinct case-folded names give a total order.
        let mut seen = std::collections::BTreeSet::new();
        let names: Vec<String> = names.into_iter().filter(|n| seen.insert(n.to_lowercase())).collect();
        let mut rows: Vec<(u32, &String)> = ratings.into_iter().zip(names.iter()).collect();
        if !rows.is_empty() {
            let len = rows.len();
            rows.rotate_left((shuffle % len as u64) as usize);
        }
        let records: Vec<Record> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (rating, name))| {
                Record::new(i as i64)
                    .with("rating", f64::from(rating) / 10.0)
                    .with("name", name.as_str())
            })
            .collect();

        for field in ["rating", "name"] {
            let mut asc = ids(&sort(records.iter(), &SortSpec::asc(field), &schema()));
            asc.reverse();
            let desc = ids(&sort(records.iter(), &SortSpec::desc(field), &schema()));
            prop_assert_eq!(asc, desc);
        }
    }

    #[test]
    fn pages_cover_the_input(records in roster(), size in 1_usize..8) {
        let pages = records.len().div_ceil(size);
        let mut joined = Vec::new();
        for number in 1..=pages {
            let page = paginate(records.iter(), PageSpec::new(number, size).unwrap());
            prop_assert!(!page.is_empty() && page.len() <= size);
            joined.extend(page);
        }
        prop_assert_eq!(ids(&joined), ids(&records));

        let past = paginate(records.iter(), PageSpec::new(pages + 1, size).unwrap());
        prop_assert!(past.is_empty());
    }

    #[test]
    fn view_matches_direct_stages(
        records in roster(),
        status in prop::option::of(0..STATUSES.len()),
        query in "[a-z]{0,2}",
        descending in prop::option::of(any::<bool>())
    ) {
        let mut state = QueryState::new(5).unwrap().with_search(query);
        if let Some(status) = status {
            state = state.with_filter("status", STATUSES[status]);
        }
        if let Some(desc) = descending {
            let spec = if desc { SortSpec::desc("rating") } else { SortSpec::asc("name") };
            state = state.with_sort(Some(spec));
        }

        let input: Vec<&Record> = records.iter().collect();
        let expected = ids(&execute_stages(input, &result_stages(&state, &schema()), &schema()));
        let mut view = TableView::new(records, schema());
        prop_assert_eq!(view.result_ids(&state), expected);
        // A second read is served from the cache.
        let before = view.recomputations();
        let _ = view.result_ids(&state.with_page(2).unwrap());
        prop_assert_eq!(view.recomputations(), before);
    }

    #[test]
    fn all_selected_only_for_exact_id_set(
        picked in prop::collection::btree_set(0_i64..10, 0..10),
        current in prop::collection::btree_set(0_i64..10, 0..10)
    ) {
        let current: Vec<RecordId> = current.into_iter().map(RecordId::Int).collect();
        let mut selection = SelectionTracker::new();
        selection.select_all(picked.iter().copied().map(RecordId::Int));
        let exact = !current.is_empty() && selection.ids() == current;
        prop_assert_eq!(selection.is_all_selected(&current), exact);

        selection.toggle_all(&current);
        if exact {
            prop_assert!(selection.is_empty());
        } else if !current.is_empty() {
            prop_assert!(selection.is_all_selected(&current));
        }
    }
}

#[test]
fn summary_of_nothing_is_zero() {
    let stats = summarize(Vec::<Record>::new(), &schema());
    assert_eq!(stats.total, 0);
    assert!(stats.by_status.is_empty());
    let rating = stats.field("rating");
    assert_eq!((rating.sum, rating.average, rating.count), (0.0, 0.0, 0));
}
