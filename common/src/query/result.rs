use rusqlite::types::ValueRef;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// a single scalar cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", r),
            Value::Text(s) => f.write_str(s),
            Value::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

/// column-major result; the row count is the shared column length
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<Column>,
}

impl ResultSet {
    /// builds empty columns from raw names, deduplicating them first
    pub fn with_column_names(names: &[String]) -> Self {
        let columns = dedupe_column_names(names)
            .into_iter()
            .map(|name| Column {
                name,
                values: Vec::new(),
            })
            .collect();

        Self { columns }
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.values.push(value);
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.row_count()).map(move |idx| self.columns.iter().map(|c| &c.values[idx]).collect())
    }
}

/// Rename repeated column names so every name in a result is distinct.
///
/// The first occurrence of a name is kept; the n-th repeat gets `_<n>`
/// appended (second occurrence `_1`, third `_2`, and so on).
pub fn dedupe_column_names(names: &[String]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    names
        .iter()
        .map(|name| {
            let count = seen
                .entry(name.as_str())
                .and_modify(|c| *c += 1)
                .or_insert(0);
            if *count == 0 {
                name.clone()
            } else {
                format!("{}_{}", name, count)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dedupe_column_names() {
        let out = dedupe_column_names(&names(&["a", "b", "a", "a", "c"]));
        assert_eq!(out, vec!["a", "b", "a_1", "a_2", "c"]);
    }

    #[test]
    fn test_dedupe_is_deterministic() {
        let input = names(&["title", "title", "name", "title"]);
        assert_eq!(dedupe_column_names(&input), dedupe_column_names(&input));
        assert_eq!(
            dedupe_column_names(&input),
            vec!["title", "title_1", "name", "title_2"]
        );
    }

    #[test]
    fn test_dedupe_unique_untouched() {
        let input = names(&["artist_name", "album_title"]);
        assert_eq!(dedupe_column_names(&input), input);
    }

    #[test]
    fn test_result_set_rows() {
        let mut rs = ResultSet::with_column_names(&names(&["id", "id"]));
        rs.push_row(vec![Value::Integer(1), Value::Text("x".to_string())]);
        rs.push_row(vec![Value::Integer(2), Value::Null]);

        assert_eq!(rs.column_names(), vec!["id", "id_1"]);
        assert_eq!(rs.row_count(), 2);
        let rows: Vec<Vec<&Value>> = rs.rows().collect();
        assert_eq!(rows[1], vec![&Value::Integer(2), &Value::Null]);
        assert_eq!(rs.column("id_1").unwrap().values[0], Value::Text("x".to_string()));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Real(2.5).to_string(), "2.5");
        assert_eq!(Value::Blob(vec![0, 1, 2]).to_string(), "<blob 3 bytes>");
    }
}
