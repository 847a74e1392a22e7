use roster_pipeline::{
    DateRange, FilterCriteria, PageSpec, Record, RecordId, SortSpec, TableRecord, TableSchema,
    filter, paginate, search, sort, summarize,
};

fn records() -> Vec<Record> {
    vec![
        Record::new(1)
            .with("status", "Active")
            .with("department", "HR")
            .with("rating", 4.8),
        Record::new(2)
            .with("status", "Inactive")
            .with("department", "IT")
            .with("rating", 4.2),
        Record::new(3)
            .with("status", "Active")
            .with("department", "HR")
            .with("rating", 4.5),
    ]
}

fn schema() -> TableSchema {
    TableSchema {
        numeric_fields: vec!["rating".to_string()],
        text_fields: vec!["status".to_string(), "department".to_string()],
        search_fields: vec!["department".to_string()],
        date_field: Some("hireDate".to_string()),
        status_field: Some("status".to_string()),
        summary_fields: vec!["rating".to_string()],
        ..TableSchema::default()
    }
}

fn ids<T: TableRecord>(records: &[T]) -> Vec<RecordId> {
    records.iter().map(TableRecord::id).collect()
}

#[test]
fn test_filter_sort_paginate_summarize() {
    let records = records();
    let schema = schema();

    let active = filter(
        records.iter(),
        &FilterCriteria::new().with("status", "Active"),
        &schema,
    );
    assert_eq!(ids(&active), vec![RecordId::Int(1), RecordId::Int(3)]);

    let sorted = sort(active.iter().copied(), &SortSpec::desc("rating"), &schema);
    assert_eq!(ids(&sorted), vec![RecordId::Int(1), RecordId::Int(3)]);

    let page = paginate(sorted.iter().copied(), PageSpec::new(2, 1).unwrap());
    assert_eq!(ids(&page), vec![RecordId::Int(3)]);

    let stats = summarize(sorted.iter().copied(), &schema);
    let rating = stats.field("rating");
    assert_eq!(stats.total, 2);
    assert_eq!(rating.count, 2);
    assert!((rating.average - 4.65).abs() < 1e-9);
}

#[test]
fn test_search_department() {
    let records = records();
    let found = search(records.iter(), "hr", &["department"]);
    assert_eq!(ids(&found), vec![RecordId::Int(1), RecordId::Int(3)]);
}

#[test]
fn test_date_range_excludes_earlier_hire() {
    let records = vec![
        Record::new(1).with("hireDate", "2020-03-15"),
        Record::new(2).with("hireDate", "2024-03-31"),
    ];
    let criteria =
        FilterCriteria::new().with_date_range(DateRange::new("2024-01-01", "2024-03-31"));
    let kept = filter(records.iter(), &criteria, &schema());
    assert_eq!(ids(&kept), vec![RecordId::Int(2)]);
}
