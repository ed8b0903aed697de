//! Builder for PostgREST row queries.
//!
//! Predicates become query parameters of the form `column=op.value`, e.g.
//! `status=in.(available,under_contract)` or `price=gte.1000000`.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(String, String),
    In(String, Vec<String>),
    /// Case-insensitive substring match
    Contains(String, String),
    /// Case-insensitive substring match against any of the columns
    AnyContains(Vec<String>, String),
    Gte(String, String),
    Lte(String, String),
}

impl Predicate {
    fn to_param(&self) -> (String, String) {
        match self {
            Predicate::Eq(col, value) => (col.clone(), format!("eq.{value}")),
            Predicate::In(col, values) => {
                let list: Vec<String> = values.iter().map(|v| quote(v)).collect();
                (col.clone(), format!("in.({})", list.join(",")))
            }
            Predicate::Contains(col, value) => (col.clone(), format!("ilike.{}", pattern(value))),
            Predicate::AnyContains(cols, value) => {
                let pattern = quote(&pattern(value));
                let clauses: Vec<String> = cols.iter().map(|c| format!("{c}.ilike.{pattern}")).collect();
                ("or".to_string(), format!("({})", clauses.join(",")))
            }
            Predicate::Gte(col, value) => (col.clone(), format!("gte.{value}")),
            Predicate::Lte(col, value) => (col.clone(), format!("lte.{value}")),
        }
    }
}

/// `*term*` with the PostgREST wildcard stripped from user input
fn pattern(value: &str) -> String {
    format!("*{}*", value.replace('*', ""))
}

/// Values containing reserved characters are double-quoted
fn quote(value: &str) -> String {
    if value.contains([',', '(', ')', '"', ':', ' ']) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("asc"),
            Direction::Desc => f.write_str("desc"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowQuery {
    table: String,
    predicates: Vec<Predicate>,
    order: Vec<(String, Direction)>,
    limit: Option<usize>,
}

impl RowQuery {
    pub fn from_table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.predicates.push(Predicate::Eq(column.to_string(), value.to_string()));
        self
    }

    pub fn is_in<I, V>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.predicates.push(Predicate::In(column.to_string(), values));
        self
    }

    pub fn contains(mut self, column: &str, value: &str) -> Self {
        self.predicates
            .push(Predicate::Contains(column.to_string(), value.to_string()));
        self
    }

    pub fn any_contains(mut self, columns: &[&str], value: &str) -> Self {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        self.predicates.push(Predicate::AnyContains(columns, value.to_string()));
        self
    }

    pub fn gte(mut self, column: &str, value: impl ToString) -> Self {
        self.predicates.push(Predicate::Gte(column.to_string(), value.to_string()));
        self
    }

    pub fn lte(mut self, column: &str, value: impl ToString) -> Self {
        self.predicates.push(Predicate::Lte(column.to_string(), value.to_string()));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query parameters in a stable order: select, predicates, order, limit
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(self.predicates.iter().map(Predicate::to_param));

        if !self.order.is_empty() {
            let order: Vec<String> = self.order.iter().map(|(col, dir)| format!("{col}.{dir}")).collect();
            params.push(("order".to_string(), order.join(",")));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}
