//! Shared pieces for translating [`crate::listing::ListParams`] into SQL.
//!
//! Each repository maps the public field names of its entity onto typed
//! Diesel columns. The macros here expand one `field <op> value` condition
//! against a boxed query; the parse helpers convert raw query-string
//! operands into the column's Rust type, reporting a validation error for
//! operands that do not fit.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Apply a comparison against a text column. Works for nullable text
/// columns too; `gt`/`lt` compare lexicographically like SQL does.
macro_rules! text_filter {
    ($query:expr, $column:expr, $filter:expr) => {{
        let result: crate::repository::errors::RepositoryResult<_> = match &$filter.comparison {
            crate::listing::Comparison::Eq(v) => Ok($query.filter($column.eq(v.clone()))),
            crate::listing::Comparison::Gt(v) => Ok($query.filter($column.gt(v.clone()))),
            crate::listing::Comparison::Gte(v) => Ok($query.filter($column.ge(v.clone()))),
            crate::listing::Comparison::Lt(v) => Ok($query.filter($column.lt(v.clone()))),
            crate::listing::Comparison::Lte(v) => Ok($query.filter($column.le(v.clone()))),
            crate::listing::Comparison::In(vs) => Ok($query.filter($column.eq_any(vs.clone()))),
        };
        result
    }};
}

/// Apply a comparison against a column whose operands need parsing first,
/// e.g. numeric, boolean or timestamp columns. `$parse` is one of the
/// `parse_*` helpers below.
macro_rules! parsed_filter {
    ($query:expr, $column:expr, $filter:expr, $parse:expr) => {{
        let filter = $filter;
        match &filter.comparison {
            crate::listing::Comparison::Eq(v) => {
                $parse(&filter.field, v).map(|v| $query.filter($column.eq(v)))
            }
            crate::listing::Comparison::Gt(v) => {
                $parse(&filter.field, v).map(|v| $query.filter($column.gt(v)))
            }
            crate::listing::Comparison::Gte(v) => {
                $parse(&filter.field, v).map(|v| $query.filter($column.ge(v)))
            }
            crate::listing::Comparison::Lt(v) => {
                $parse(&filter.field, v).map(|v| $query.filter($column.lt(v)))
            }
            crate::listing::Comparison::Lte(v) => {
                $parse(&filter.field, v).map(|v| $query.filter($column.le(v)))
            }
            crate::listing::Comparison::In(vs) => vs
                .iter()
                .map(|v| $parse(&filter.field, v))
                .collect::<crate::repository::errors::RepositoryResult<Vec<_>>>()
                .map(|vs| $query.filter($column.eq_any(vs))),
        }
    }};
}

/// Apply one sort key to a boxed query. The first key replaces the default
/// order, later keys refine it.
macro_rules! sort_by {
    ($query:expr, $column:expr, $sort:expr, $first:expr) => {
        match ($sort.direction, $first) {
            (crate::listing::SortDirection::Asc, true) => $query.order_by($column.asc()),
            (crate::listing::SortDirection::Asc, false) => $query.then_order_by($column.asc()),
            (crate::listing::SortDirection::Desc, true) => $query.order_by($column.desc()),
            (crate::listing::SortDirection::Desc, false) => $query.then_order_by($column.desc()),
        }
    };
}

pub(crate) use {parsed_filter, sort_by, text_filter};

pub(crate) fn parse_f64(field: &str, raw: &str) -> RepositoryResult<f64> {
    raw.trim()
        .parse()
        .map_err(|_| invalid_operand(field, raw, "a number"))
}

pub(crate) fn parse_i32(field: &str, raw: &str) -> RepositoryResult<i32> {
    raw.trim()
        .parse()
        .map_err(|_| invalid_operand(field, raw, "an integer"))
}

pub(crate) fn parse_bool(field: &str, raw: &str) -> RepositoryResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid_operand(field, raw, "a boolean")),
    }
}

/// Accepts `YYYY-MM-DDTHH:MM:SS` or a bare `YYYY-MM-DD` (midnight).
pub(crate) fn parse_datetime(field: &str, raw: &str) -> RepositoryResult<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(invalid_operand(field, raw, "a date or timestamp"))
}

pub(crate) fn unknown_filter_field(entity: &str, field: &str) -> RepositoryError {
    RepositoryError::ValidationError(format!("cannot filter {entity} by `{field}`"))
}

pub(crate) fn unknown_sort_field(entity: &str, field: &str) -> RepositoryError {
    RepositoryError::ValidationError(format!("cannot sort {entity} by `{field}`"))
}

fn invalid_operand(field: &str, raw: &str, expected: &str) -> RepositoryError {
    RepositoryError::ValidationError(format!("`{raw}` is not {expected} for field `{field}`"))
}
