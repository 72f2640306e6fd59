//! Collection view - filter, search and sort over in-memory record slices
//!
//! `apply` never touches the base collection: it returns references into it in
//! display order. The pipeline order is fixed: field filters, then free-text
//! search, then a stable sort.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A single field value as seen by the view
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
    Bool(bool),
    /// Enum with a severity/priority ordering; compared by rank, not label
    Ranked { rank: u8, label: &'static str },
}

impl FieldValue {
    /// Canonical lowercase form used for filter equality and search
    pub fn match_key(&self) -> String {
        self.to_string().to_lowercase()
    }

    /// Compare two values of the same kind.
    ///
    /// Mixed kinds order by kind so the comparator stays total.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => a
                .to_lowercase()
                .cmp(&b.to_lowercase()),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.total_cmp(b),
            (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a.cmp(b),
            (FieldValue::Ranked { rank: a, .. }, FieldValue::Ranked { rank: b, .. }) => a.cmp(b),
            (a, b) => a.kind_order().cmp(&b.kind_order()),
        }
    }

    fn kind_order(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Number(_) => 1,
            FieldValue::Ranked { .. } => 2,
            FieldValue::Timestamp(_) => 3,
            FieldValue::Text(_) => 4,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            FieldValue::Number(n) => write!(f, "{:.2}", n),
            FieldValue::Timestamp(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M")),
            FieldValue::Bool(b) => write!(f, "{}", if *b { "yes" } else { "no" }),
            FieldValue::Ranked { label, .. } => write!(f, "{}", label),
        }
    }
}

/// Compare optional values; an absent value sorts lowest
fn compare_optional(a: Option<&FieldValue>, b: Option<&FieldValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Column descriptor for a record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field key passed to [`Record::field`]
    pub key: &'static str,
    pub title: &'static str,
    /// Preferred display width in cells
    pub width: u16,
}

/// A displayable record with a stable id
pub trait Record {
    /// Human label for the collection ("Sessions", "Tokens", ...)
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Look up a field by key. `None` means the record has no value for it.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Columns in display order; every column is sortable
    fn columns() -> &'static [Column];

    /// Fields consulted by free-text search
    fn searchable_fields() -> &'static [&'static str];

    /// Fields offered as discrete filters
    fn filter_dimensions() -> &'static [&'static str];
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Sort key and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

/// Value meaning "no constraint" for a filter dimension
pub const FILTER_ALL: &str = "all";

/// How to derive a displayed list from a base collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    /// Field key -> required value. Never holds `"all"`.
    pub filters: BTreeMap<String, String>,
    pub sort: Option<SortSpec>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }

    pub fn with_filter(mut self, field: &str, value: &str) -> Self {
        self.set_filter(field, value);
        self
    }

    pub fn sorted_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec {
            field: field.to_string(),
            direction,
        });
        self
    }

    /// Set a field filter; `"all"` or an empty value clears it
    pub fn set_filter(&mut self, field: &str, value: &str) {
        if value.is_empty() || value.eq_ignore_ascii_case(FILTER_ALL) {
            self.filters.remove(field);
        } else {
            self.filters.insert(field.to_string(), value.to_string());
        }
    }

    /// Active filter value for a field, `"all"` when unset
    pub fn filter_value(&self, field: &str) -> &str {
        self.filters.get(field).map(String::as_str).unwrap_or(FILTER_ALL)
    }

    /// Move the sort key to the next field in `fields`, wrapping to unsorted
    pub fn cycle_sort(&mut self, fields: &[&str]) {
        let next = match &self.sort {
            None => fields.first(),
            Some(spec) => fields
                .iter()
                .position(|f| *f == spec.field)
                .and_then(|idx| fields.get(idx + 1)),
        };
        let direction = self.sort.as_ref().map(|s| s.direction).unwrap_or_default();
        self.sort = next.map(|field| SortSpec {
            field: field.to_string(),
            direction,
        });
    }

    /// Flip the sort direction (no-op when unsorted)
    pub fn toggle_direction(&mut self) {
        if let Some(spec) = &mut self.sort {
            spec.direction = spec.direction.flipped();
        }
    }

    fn matches_filters<R: Record>(&self, record: &R) -> bool {
        self.filters.iter().all(|(field, wanted)| {
            record
                .field(field)
                .is_some_and(|value| value.match_key() == wanted.to_lowercase())
        })
    }
}

fn matches_search<R: Record>(record: &R, needle: &str) -> bool {
    R::searchable_fields().iter().any(|field| {
        record
            .field(field)
            .is_some_and(|value| value.match_key().contains(needle))
    })
}

/// Apply a view state to a record slice.
///
/// Filters AND together, search is a case-insensitive substring match over the
/// searchable fields, and the sort is stable in both directions.
pub fn apply<'a, R: Record>(records: &'a [R], view: &ViewState) -> Vec<&'a R> {
    let needle = view.search.to_lowercase();

    let mut rows: Vec<&R> = records
        .iter()
        .filter(|record| view.matches_filters(*record))
        .filter(|record| needle.is_empty() || matches_search(*record, &needle))
        .collect();

    if let Some(spec) = &view.sort {
        // sort_by is stable, so equal keys keep input order in either direction
        rows.sort_by(|a, b| {
            let ordering = compare_optional(a.field(&spec.field).as_ref(), b.field(&spec.field).as_ref());
            match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    rows
}

/// Distinct display values present for a field, in ascending field order
pub fn distinct_values<R: Record>(records: &[R], field: &str) -> Vec<String> {
    let mut values: Vec<FieldValue> = Vec::new();
    for value in records.iter().filter_map(|r| r.field(field)) {
        if !values.iter().any(|v| v.match_key() == value.match_key()) {
            values.push(value);
        }
    }
    values.sort_by(|a, b| a.compare(b));
    values.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: &'static str,
        name: Option<&'static str>,
        risk: u8,
        kind: &'static str,
        score: Option<f64>,
    }

    fn risk_label(rank: u8) -> &'static str {
        match rank {
            0 => "Low",
            1 => "Medium",
            _ => "High",
        }
    }

    impl Record for Row {
        const KIND: &'static str = "Rows";

        fn id(&self) -> &str {
            self.id
        }

        fn field(&self, key: &str) -> Option<FieldValue> {
            match key {
                "id" => Some(FieldValue::Text(self.id.to_string())),
                "name" => self.name.map(|n| FieldValue::Text(n.to_string())),
                "risk" => Some(FieldValue::Ranked {
                    rank: self.risk,
                    label: risk_label(self.risk),
                }),
                "kind" => Some(FieldValue::Text(self.kind.to_string())),
                "score" => self.score.map(FieldValue::Number),
                _ => None,
            }
        }

        fn columns() -> &'static [Column] {
            &[]
        }

        fn searchable_fields() -> &'static [&'static str] {
            &["name", "kind"]
        }

        fn filter_dimensions() -> &'static [&'static str] {
            &["risk", "kind"]
        }
    }

    fn row(id: &'static str, name: &'static str, risk: u8, kind: &'static str, score: f64) -> Row {
        Row {
            id,
            name: Some(name),
            risk,
            kind,
            score: Some(score),
        }
    }

    fn sample() -> Vec<Row> {
        vec![
            row("1", "delta", 0, "ghost", 4.0),
            row("2", "alpha", 2, "active", 10.0),
            row("3", "Charlie", 1, "ghost", 4.0),
            row("4", "bravo", 2, "idle", 1.5),
            row("5", "echo", 0, "active", 4.0),
        ]
    }

    fn ids(rows: &[&Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_search_and_name_sort_scenario() {
        let records = vec![
            Row { id: "1", name: Some("beta"), risk: 0, kind: "x", score: None },
            Row { id: "2", name: Some("Alpha"), risk: 2, kind: "x", score: None },
        ];
        let view = ViewState::new()
            .with_filter("risk", "all")
            .with_search("a")
            .sorted_by("name", SortDirection::Ascending);

        assert_eq!(ids(&apply(&records, &view)), vec!["2", "1"]);
    }

    #[test]
    fn test_apply_is_deterministic() {
        let records = sample();
        let view = ViewState::new()
            .with_search("a")
            .sorted_by("score", SortDirection::Descending);

        assert_eq!(apply(&records, &view), apply(&records, &view));
    }

    #[test]
    fn test_added_filter_narrows_result() {
        let records = sample();
        let base = ViewState::new().sorted_by("name", SortDirection::Ascending);
        let narrowed = base.clone().with_filter("kind", "ghost");

        let wide = ids(&apply(&records, &base));
        let narrow = ids(&apply(&records, &narrowed));

        assert_eq!(narrow, vec!["3", "1"]);
        assert!(narrow.iter().all(|id| wide.contains(id)));
    }

    #[test]
    fn test_filters_and_together_case_insensitively() {
        let records = sample();
        let view = ViewState::new()
            .with_filter("kind", "ACTIVE")
            .with_filter("risk", "high");

        assert_eq!(ids(&apply(&records, &view)), vec!["2"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let records = sample();

        let asc = ViewState::new().sorted_by("score", SortDirection::Ascending);
        assert_eq!(ids(&apply(&records, &asc)), vec!["4", "1", "3", "5", "2"]);

        let desc = ViewState::new().sorted_by("score", SortDirection::Descending);
        assert_eq!(ids(&apply(&records, &desc)), vec!["2", "1", "3", "5", "4"]);
    }

    #[test]
    fn test_ranked_fields_sort_by_rank_not_label() {
        let records = sample();
        let view = ViewState::new().sorted_by("risk", SortDirection::Descending);

        // High(2,4) > Medium(3) > Low(1,5); alphabetical order would put Medium first
        assert_eq!(ids(&apply(&records, &view)), vec!["2", "4", "3", "1", "5"]);
    }

    #[test]
    fn test_missing_sort_field_sorts_lowest() {
        let mut records = sample();
        records[1].score = None;
        records[0].name = None;

        let by_score = ViewState::new().sorted_by("score", SortDirection::Ascending);
        assert_eq!(ids(&apply(&records, &by_score))[0], "2");

        let by_name = ViewState::new().sorted_by("name", SortDirection::Descending);
        assert_eq!(ids(&apply(&records, &by_name)).last(), Some(&"1"));
    }

    #[test]
    fn test_missing_filter_field_fails_filter() {
        let mut records = sample();
        records[1].name = None;
        let view = ViewState::new().with_filter("name", "alpha");

        assert!(apply(&records, &view).is_empty());
    }

    #[test]
    fn test_empty_collection_yields_empty_view() {
        let records: Vec<Row> = Vec::new();
        let view = ViewState::new().with_search("x").sorted_by("name", SortDirection::Ascending);
        assert!(apply(&records, &view).is_empty());
    }

    #[test]
    fn test_apply_leaves_base_collection_untouched() {
        let records = sample();
        let before = records.clone();
        let _ = apply(&records, &ViewState::new().sorted_by("name", SortDirection::Descending));
        assert_eq!(records, before);
    }

    #[test]
    fn test_timestamps_compare_numerically() {
        let early = FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap());
        let late = FieldValue::Timestamp(Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap());
        assert_eq!(early.compare(&late), Ordering::Less);

        // 9.5 < 10 numerically even though "10" < "9.5" as text
        assert_eq!(FieldValue::Number(9.5).compare(&FieldValue::Number(10.0)), Ordering::Less);
    }

    #[test]
    fn test_set_filter_all_clears_dimension() {
        let mut view = ViewState::new().with_filter("kind", "ghost");
        assert_eq!(view.filter_value("kind"), "ghost");

        view.set_filter("kind", "All");
        assert!(view.filters.is_empty());
        assert_eq!(view.filter_value("kind"), FILTER_ALL);
    }

    #[test]
    fn test_cycle_sort_walks_fields_then_unsorted() {
        let fields = ["name", "risk"];
        let mut view = ViewState::new();

        view.cycle_sort(&fields);
        assert_eq!(view.sort.as_ref().map(|s| s.field.as_str()), Some("name"));

        view.toggle_direction();
        view.cycle_sort(&fields);
        let spec = view.sort.clone().unwrap();
        assert_eq!(spec.field, "risk");
        assert_eq!(spec.direction, SortDirection::Descending);

        view.cycle_sort(&fields);
        assert!(view.sort.is_none());
    }

    #[test]
    fn test_distinct_values_ordered_by_field() {
        let records = sample();
        assert_eq!(distinct_values(&records, "risk"), vec!["Low", "Medium", "High"]);
        assert_eq!(distinct_values(&records, "kind"), vec!["active", "ghost", "idle"]);
    }
}
