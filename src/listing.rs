//! Query-string driven listing shared by every collection endpoint.
//!
//! A request such as `?averageCost[gte]=5000&select=name&sort=-createdAt&page=2`
//! is parsed into a [`ListParams`] value: comparison filters, an optional field
//! projection, sort keys and a page window. Repositories translate the filters
//! and sort keys into SQL for their own table; unknown fields are rejected
//! there, not here. The matching page of rows comes back wrapped in a
//! [`Page`], which derives the `next`/`previous` pagination links.

use serde::Serialize;

/// Page requested when the query string does not carry a usable `page`.
pub const DEFAULT_PAGE: usize = 1;
/// Page size applied when the query string does not carry a usable `limit`.
pub const DEFAULT_PER_PAGE: usize = 25;

/// A single comparison against a field, with the raw query-string operand.
///
/// Operands stay as strings here. Each repository parses them against the
/// column type it maps the field to and reports a validation error for
/// operands it cannot parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Eq(String),
    Gt(String),
    Gte(String),
    Lt(String),
    Lte(String),
    /// Membership in a comma-separated list of values.
    In(Vec<String>),
}

/// One `field <op> value` condition from the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub comparison: Comparison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A sort key; `-field` in the query string flips it to descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

/// Everything a list endpoint accepts, parsed from its query string.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub filters: Vec<Filter>,
    /// Fields to retain in the response, `None` meaning all of them.
    pub select: Option<Vec<String>>,
    pub sort: Vec<SortField>,
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            select: None,
            sort: Vec::new(),
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListParams {
    /// Parse decoded query-string pairs.
    ///
    /// * `select`, `sort`, `page` and `limit` are consumed as directives.
    /// * Any other key is a filter. A `field[op]` key with `op` one of
    ///   `gt`/`gte`/`lt`/`lte`/`in` uses that comparison; any other key,
    ///   bracketed or not, is an equality match on the key as written.
    /// * `page` and `limit` must parse as positive integers, otherwise the
    ///   defaults of 1 and 25 apply.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                "select" => {
                    let fields = split_csv(&value);
                    params.select = (!fields.is_empty()).then_some(fields);
                }
                "sort" => params.sort = parse_sort(&value),
                "page" => params.page = parse_positive(&value, DEFAULT_PAGE),
                "limit" => params.per_page = parse_positive(&value, DEFAULT_PER_PAGE),
                _ => params.filters.push(parse_filter(&key, value)),
            }
        }

        params
    }

    /// Look up the first filter on a field, mainly for tests.
    pub fn filter(&self, field: &str) -> Option<&Comparison> {
        self.filters
            .iter()
            .find(|f| f.field == field)
            .map(|f| &f.comparison)
    }

    /// Rows to skip for the requested page.
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) * self.per_page) as i64
    }

    /// Rows per page.
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

fn parse_filter(key: &str, value: String) -> Filter {
    let (field, op) = match key.strip_suffix(']').and_then(|k| k.split_once('[')) {
        Some((field, op)) if matches!(op, "gt" | "gte" | "lt" | "lte" | "in") => (field, op),
        // Unrecognized bracket forms fall through as literal field names.
        _ => (key, ""),
    };

    let comparison = match op {
        "gt" => Comparison::Gt(value),
        "gte" => Comparison::Gte(value),
        "lt" => Comparison::Lt(value),
        "lte" => Comparison::Lte(value),
        "in" => Comparison::In(split_csv(&value)),
        _ => Comparison::Eq(value),
    };

    Filter {
        field: field.to_string(),
        comparison,
    }
}

fn parse_sort(raw: &str) -> Vec<SortField> {
    raw.split(',')
        .filter_map(|part| {
            let part = part.trim();
            let (field, direction) = match part.strip_prefix('-') {
                Some(rest) => (rest, SortDirection::Desc),
                None => (part, SortDirection::Asc),
            };
            (!field.is_empty()).then(|| SortField {
                field: field.to_string(),
                direction,
            })
        })
        .collect()
}

fn parse_positive(raw: &str, default: usize) -> usize {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => default,
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect()
}

/// Reference to an adjacent page, serialized into pagination links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRef {
    pub page: usize,
    pub limit: usize,
}

/// `next`/`previous` links for a page; absent neighbors are omitted from JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<PageRef>,
}

/// One page of results plus the filtered total and the params that built it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of rows matching the filters across all pages.
    pub total: usize,
    pub params: ListParams,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize, params: ListParams) -> Self {
        Self {
            items,
            total,
            params,
        }
    }

    /// Number of items on this page, not the filtered total.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// `next` exists while rows remain past this page, `previous` from page 2 on.
    pub fn links(&self) -> PageLinks {
        let mut links = PageLinks::default();
        if self.params.page * self.params.per_page < self.total {
            links.next = Some(PageRef {
                page: self.params.page + 1,
                limit: self.params.per_page,
            });
        }
        if self.params.page > 1 {
            links.previous = Some(PageRef {
                page: self.params.page - 1,
                limit: self.params.per_page,
            });
        }
        links
    }
}
