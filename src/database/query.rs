//! PostgREST select query builder

use crate::database::{CARS_TABLE, OWNERS_TABLE};
use crate::models::CarSearch;

/// Column list for a car joined with its owner through `owner_id`
pub const CAR_WITH_OWNER_COLUMNS: &str = "*,owners:owner_id(*)";

/// One predicate on a column
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Case-insensitive pattern match; the pattern is sent as given
    ILike { column: String, pattern: String },
    /// Exact equality
    Eq { column: String, value: String },
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::ILike { column, .. } | Filter::Eq { column, .. } => column,
        }
    }

    /// PostgREST operator expression, e.g. `ilike.%honda%`
    pub fn expression(&self) -> String {
        match self {
            Filter::ILike { pattern, .. } => format!("ilike.{}", pattern),
            Filter::Eq { value, .. } => format!("eq.{}", value),
        }
    }
}

/// A read against one table
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
}

impl SelectQuery {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
        }
    }

    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    /// Case-insensitive substring match: the needle is wrapped in `%`
    pub fn ilike_contains(mut self, column: &str, needle: &str) -> Self {
        self.filters.push(Filter::ILike {
            column: column.to_string(),
            pattern: format!("%{}%", needle),
        });
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Query string pairs, `select` first then one pair per filter
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(
            self.filters
                .iter()
                .map(|f| (f.column().to_string(), f.expression())),
        );
        pairs
    }

    /// All owners
    pub fn owners() -> Self {
        Self::new(OWNERS_TABLE)
    }

    /// Cars joined to owners, narrowed by whichever filters are set
    pub fn cars_matching(search: &CarSearch) -> Self {
        let mut query = Self::new(CARS_TABLE).columns(CAR_WITH_OWNER_COLUMNS);

        if let Some(make) = &search.make {
            query = query.ilike_contains("make", make);
        }
        if let Some(model) = &search.model {
            query = query.ilike_contains("model", model);
        }
        if let Some(year) = search.year {
            query = query.eq("year", year);
        }

        query
    }
}
