//! Buffered result sets and row-fetch shapes.
//!
//! Result sets are fully buffered at execution time (store-result
//! semantics), so record counts, cursor rewinds and column metadata are
//! cheap and total. Cells are string-typed, `None` meaning SQL NULL, which
//! is the shape legacy callers expect back.

use std::str::FromStr;

use crate::error::DbError;

/// One buffered row: cells in column order.
pub type Cells = Vec<Option<String>>;

/// An opaque cursor over buffered rows plus column metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Cells>,
    pos: usize,
}

impl ResultSet {
    /// Build a result set from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Cells>) -> Self {
        Self {
            columns,
            rows,
            pos: 0,
        }
    }

    /// Number of rows.
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn num_fields(&self) -> usize {
        self.columns.len()
    }

    /// Name of the column at `col`, or `None` past the end.
    pub fn field_name(&self, col: usize) -> Option<&str> {
        self.columns.get(col).map(String::as_str)
    }

    /// All column names, in result order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Move the cursor to an absolute row position. Returns `false` (cursor
    /// untouched) when the position is out of range.
    pub fn data_seek(&mut self, position: usize) -> bool {
        if position >= self.rows.len() {
            return false;
        }
        self.pos = position;
        true
    }

    /// Fetch the next row in the given shape, advancing the cursor. Returns
    /// `None` at end-of-rows.
    pub fn fetch(&mut self, mode: FetchMode) -> Option<RowData> {
        let cells = self.rows.get(self.pos)?.clone();
        self.pos += 1;
        Some(self.shape(cells, mode))
    }

    /// Collect the remaining cells of one column by name, advancing the
    /// cursor to the end. Rows without that column yield `None`.
    pub fn take_column(&mut self, name: &str) -> Vec<Option<String>> {
        let index = self.columns.iter().position(|c| c == name);
        let mut out = Vec::with_capacity(self.rows.len().saturating_sub(self.pos));
        while let Some(cells) = self.rows.get(self.pos) {
            self.pos += 1;
            out.push(index.and_then(|i| cells.get(i).cloned().flatten()));
        }
        out
    }

    fn shape(&self, cells: Cells, mode: FetchMode) -> RowData {
        match mode {
            FetchMode::Assoc => RowData::Assoc(self.pairs(cells)),
            FetchMode::Num => RowData::Num(cells),
            FetchMode::Object => {
                let mut object = serde_json::Map::new();
                for (name, cell) in self.pairs(cells) {
                    let value = match cell {
                        Some(text) => serde_json::Value::String(text),
                        None => serde_json::Value::Null,
                    };
                    object.insert(name, value);
                }
                RowData::Object(serde_json::Value::Object(object))
            }
            FetchMode::Both => RowData::Both {
                columns: self.columns.clone(),
                cells,
            },
        }
    }

    fn pairs(&self, cells: Cells) -> Vec<(String, Option<String>)> {
        self.columns
            .iter()
            .cloned()
            .zip(cells)
            .collect()
    }
}

/// Shape in which a row is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Column name → value, in result order.
    #[default]
    Assoc,
    /// Positional cells only.
    Num,
    /// A JSON object (the language-native-object shape).
    Object,
    /// Both positional and named access.
    Both,
}

impl FromStr for FetchMode {
    type Err = DbError;

    /// Parse a legacy mode name. Anything but `assoc`, `num`, `object` or
    /// `both` is a [`DbError::UnknownFetchType`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assoc" => Ok(FetchMode::Assoc),
            "num" => Ok(FetchMode::Num),
            "object" => Ok(FetchMode::Object),
            "both" => Ok(FetchMode::Both),
            other => Err(DbError::UnknownFetchType(other.to_string())),
        }
    }
}

/// One fetched row, shaped per [`FetchMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowData {
    Assoc(Vec<(String, Option<String>)>),
    Num(Vec<Option<String>>),
    Object(serde_json::Value),
    Both {
        columns: Vec<String>,
        cells: Vec<Option<String>>,
    },
}

impl RowData {
    /// Look a cell up by column name. Returns `None` when the shape has no
    /// names or the column is absent; `Some(None)` is a present NULL.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        match self {
            RowData::Assoc(pairs) => pairs
                .iter()
                .find(|(col, _)| col == name)
                .map(|(_, cell)| cell.as_deref()),
            RowData::Num(_) => None,
            RowData::Object(value) => value.get(name).map(|v| v.as_str()),
            RowData::Both { columns, cells } => columns
                .iter()
                .position(|col| col == name)
                .and_then(|i| cells.get(i))
                .map(Option::as_deref),
        }
    }

    /// The cell at a positional index, for the shapes that carry positions.
    pub fn index(&self, i: usize) -> Option<Option<&str>> {
        match self {
            RowData::Num(cells) | RowData::Both { cells, .. } => {
                cells.get(i).map(Option::as_deref)
            }
            _ => None,
        }
    }
}

/// What a successfully executed statement produced at the driver level.
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// A row-returning statement: the buffered result set.
    Rows(ResultSet),
    /// A mutation: affected-row count and insert id live on the driver.
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResultSet {
        ResultSet::new(
            vec!["id".to_string(), "title".to_string()],
            vec![
                vec![Some("1".to_string()), Some("home".to_string())],
                vec![Some("2".to_string()), None],
            ],
        )
    }

    #[test]
    fn metadata_queries() {
        let set = sample();
        assert_eq!(set.record_count(), 2);
        assert_eq!(set.num_fields(), 2);
        assert_eq!(set.field_name(1), Some("title"));
        assert_eq!(set.field_name(9), None);
    }

    #[test]
    fn fetch_assoc_preserves_column_order() {
        let mut set = sample();
        match set.fetch(FetchMode::Assoc).unwrap() {
            RowData::Assoc(pairs) => {
                assert_eq!(pairs[0], ("id".to_string(), Some("1".to_string())));
                assert_eq!(pairs[1], ("title".to_string(), Some("home".to_string())));
            }
            other => panic!("expected assoc row, got {other:?}"),
        }
    }

    #[test]
    fn fetch_num_and_end_of_rows() {
        let mut set = sample();
        assert!(matches!(set.fetch(FetchMode::Num), Some(RowData::Num(_))));
        assert!(set.fetch(FetchMode::Num).is_some());
        assert!(set.fetch(FetchMode::Num).is_none());
    }

    #[test]
    fn fetch_object_renders_null() {
        let mut set = sample();
        set.data_seek(1);
        match set.fetch(FetchMode::Object).unwrap() {
            RowData::Object(value) => {
                assert_eq!(value["id"], serde_json::Value::String("2".to_string()));
                assert_eq!(value["title"], serde_json::Value::Null);
            }
            other => panic!("expected object row, got {other:?}"),
        }
    }

    #[test]
    fn fetch_both_supports_both_lookups() {
        let mut set = sample();
        let row = set.fetch(FetchMode::Both).unwrap();
        assert_eq!(row.get("id"), Some(Some("1")));
        assert_eq!(row.index(1), Some(Some("home")));
    }

    #[test]
    fn data_seek_bounds() {
        let mut set = sample();
        assert!(set.data_seek(1));
        assert!(!set.data_seek(2));
        assert!(set.fetch(FetchMode::Num).is_some());
    }

    #[test]
    fn take_column_tolerates_missing_column() {
        let mut set = sample();
        assert_eq!(
            set.take_column("id"),
            vec![Some("1".to_string()), Some("2".to_string())]
        );
        let mut set = sample();
        assert_eq!(set.take_column("nope"), vec![None, None]);
    }

    #[test]
    fn fetch_mode_parses_legacy_names() {
        assert_eq!("assoc".parse::<FetchMode>().unwrap(), FetchMode::Assoc);
        assert_eq!("both".parse::<FetchMode>().unwrap(), FetchMode::Both);
        let err = "rows".parse::<FetchMode>().unwrap_err();
        assert!(matches!(err, DbError::UnknownFetchType(_)));
    }
}
