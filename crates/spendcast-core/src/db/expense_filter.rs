//! Expense filter builder for constructing dynamic SQL queries
//!
//! Builds the WHERE and ORDER BY clauses shared by filtered expense fetches.

use chrono::NaiveDate;

/// Builder for constructing expense query filters
///
/// The lifetime `'query` is how long the borrowed filter strings must live.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpenseFilter<'query> {
    pub category: Option<&'query str>,
    pub search: Option<&'query str>,
    /// Inclusive lower bound on the calendar date of `incurred_on`
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the calendar date of `incurred_on`
    pub to: Option<NaiveDate>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: &'static str,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl<'query> ExpenseFilter<'query> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact category match (case-insensitive)
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    /// Substring search over title and notes
    pub fn search(mut self, query: Option<&'query str>) -> Self {
        self.search = query;
        self
    }

    pub fn from(mut self, date: Option<NaiveDate>) -> Self {
        self.from = date;
        self
    }

    pub fn to(mut self, date: Option<NaiveDate>) -> Self {
        self.to = date;
        self
    }

    /// True when no condition would be applied
    pub fn is_empty(&self) -> bool {
        let blank = |s: Option<&str>| s.map(|v| v.trim().is_empty()).unwrap_or(true);
        blank(self.category) && blank(self.search) && self.from.is_none() && self.to.is_none()
    }

    /// Build the filter components
    pub fn build(self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(category) = self.category {
            if !category.trim().is_empty() {
                conditions.push("e.category = ? COLLATE NOCASE");
                params.push(Box::new(category.trim().to_string()));
            }
        }

        if let Some(q) = self.search {
            if !q.trim().is_empty() {
                conditions.push("(e.title LIKE ? COLLATE NOCASE OR e.notes LIKE ? COLLATE NOCASE)");
                let pattern = format!("%{}%", q.trim());
                params.push(Box::new(pattern.clone()));
                params.push(Box::new(pattern));
            }
        }

        if let Some(from) = self.from {
            conditions.push("date(e.incurred_on) >= ?");
            params.push(Box::new(from.to_string()));
        }

        if let Some(to) = self.to {
            conditions.push("date(e.incurred_on) <= ?");
            params.push(Box::new(to.to_string()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        FilterResult {
            where_clause,
            order_clause: "ORDER BY e.incurred_on DESC, e.id DESC",
            params,
        }
    }
}

impl FilterResult {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        let filter = ExpenseFilter::new();
        assert!(filter.is_empty());
        let built = filter.build();
        assert!(built.where_clause.is_empty());
        assert!(built.params.is_empty());
    }

    #[test]
    fn test_blank_strings_are_ignored() {
        let filter = ExpenseFilter::new().category(Some("  ")).search(Some(""));
        assert!(filter.is_empty());
        assert!(filter.build().where_clause.is_empty());
    }

    #[test]
    fn test_all_conditions_combined() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let built = ExpenseFilter::new()
            .category(Some("Food"))
            .search(Some("coffee"))
            .from(Some(from))
            .to(Some(to))
            .build();

        assert!(built.where_clause.starts_with("WHERE "));
        assert_eq!(built.where_clause.matches(" AND ").count(), 3);
        // category + 2 search patterns + 2 dates
        assert_eq!(built.params.len(), 5);
    }
}
