//! SQL fragment rendering.
//!
//! Pure functions that turn [`Value`] inputs into clause strings: FROM,
//! WHERE, ORDER BY, LIMIT, field lists, VALUES tuples and SET bodies. The
//! universal intermediate representation is the plain string; full statements
//! are assembled by [`Database`](crate::Database) from these fragments.
//!
//! No escaping happens here. Quoting a scalar into a literal is verbatim;
//! callers escape values first via [`Database::escape`](crate::Database::escape).

use crate::error::{DbError, DbResult};
use crate::value::Value;

/// Render a SELECT field list.
///
/// Sequence entries render verbatim, comma-joined. Mapping entries render as
/// ``expr as `alias` `` when the alias differs from the expression. Empty
/// input renders to the wildcard.
pub fn fields(spec: &Value) -> String {
    let data = match spec {
        Value::Sequence(items) => join_scalars(items.iter(), ","),
        Value::Mapping(pairs) => {
            let mut parts = Vec::with_capacity(pairs.len());
            for (alias, field) in pairs {
                let Some(field) = field.as_scalar() else {
                    continue;
                };
                if alias != field {
                    parts.push(format!("{field} as `{alias}`"));
                } else {
                    parts.push(field.to_string());
                }
            }
            parts.join(",")
        }
        Value::Scalar(s) => s.clone(),
        Value::Null => String::new(),
    };
    if data.is_empty() { "*".to_string() } else { data }
}

/// Render a FROM clause body.
///
/// A non-empty scalar passes through. With `allow_multiple`, a sequence (or
/// the values of a mapping) of table references is space-joined, supporting
/// the `table alias` multi-table form. Anything else is a
/// [`DbError::TableNotDefined`].
pub fn from(spec: &Value, allow_multiple: bool) -> DbResult<String> {
    let data = match spec {
        Value::Scalar(s) => s.clone(),
        Value::Sequence(items) if allow_multiple => {
            collect_scalars(items.iter())
                .ok_or_else(|| DbError::TableNotDefined(format!("{spec:?}")))?
                .join(" ")
        }
        Value::Mapping(pairs) if allow_multiple => {
            collect_scalars(pairs.iter().map(|(_, v)| v))
                .ok_or_else(|| DbError::TableNotDefined(format!("{spec:?}")))?
                .join(" ")
        }
        other => return Err(DbError::TableNotDefined(format!("{other:?}"))),
    };
    if data.trim().is_empty() {
        return Err(DbError::TableNotDefined(data));
    }
    Ok(data)
}

/// Render a WHERE clause.
///
/// A sequence of fragments is space-joined first; the result is trimmed and
/// prefixed with `WHERE` unless it already starts with it. Empty input
/// renders empty (clause omitted).
pub fn where_clause(spec: &Value) -> String {
    let data = match spec {
        Value::Sequence(items) => join_scalars(items.iter(), " "),
        Value::Mapping(pairs) => join_scalars(pairs.iter().map(|(_, v)| v), " "),
        Value::Scalar(s) => s.clone(),
        Value::Null => String::new(),
    };
    prefix_keyword(&data, "WHERE", "WHERE")
}

/// Render an ORDER BY clause: trim, then prefix with `ORDER BY` unless the
/// input already starts with `ORDER`.
pub fn order(spec: &Value) -> String {
    prefix_keyword(spec.as_scalar().unwrap_or_default(), "ORDER", "ORDER BY")
}

/// Render a LIMIT clause: trim, then prefix with `LIMIT` unless the input
/// already starts with it.
pub fn limit(spec: &Value) -> String {
    prefix_keyword(spec.as_scalar().unwrap_or_default(), "LIMIT", "LIMIT")
}

/// Render one value literal.
///
/// `Null` and the case-insensitive literal string `"null"` render as unquoted
/// `NULL`; any other scalar renders single-quoted, verbatim. Composite input
/// is an [`DbError::InvalidField`].
pub fn value_literal(value: &Value) -> DbResult<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Scalar(s) if s.eq_ignore_ascii_case("null") => Ok("NULL".to_string()),
        Value::Scalar(s) => Ok(format!("'{s}'")),
        other => Err(DbError::invalid_field(
            "expected a scalar value",
            format!("{other:?}"),
        )),
    }
}

/// A rendered insert-values fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertFragment {
    /// Field-name clause and VALUES tuple(s) joined, ready to splice after
    /// the table name.
    Inline(String),
    /// Field and value clauses kept apart, for callers splicing a
    /// `SELECT ... FROM ...` instead of `VALUES (...)`.
    Pair { fields: String, values: String },
}

impl InsertFragment {
    /// Collapse to the spliceable single-fragment form.
    pub fn into_inline(self) -> String {
        match self {
            InsertFragment::Inline(s) => s,
            InsertFragment::Pair { fields, values } => format!("{fields} VALUES {values}"),
        }
    }
}

/// Render the values part of an INSERT.
///
/// Input shapes:
/// - flat sequence of scalars: a bare `(v1, v2)` tuple, no field-name clause
///   (the table's natural column order);
/// - flat mapping: `` (`c1`, `c2`) VALUES (v1, v2) ``, insertion order
///   preserved;
/// - sequence of mappings: one shared field-name clause followed by
///   comma-joined tuples; every row must share the same field-name list
///   unless `skip_field_name_check` is set.
///
/// `depth` starts at 1; the recursion for multi-row input runs at 2, and
/// composites nested any deeper fail with [`DbError::TooManyLoops`]. When
/// called with `depth == 2` directly, the result is the split
/// [`InsertFragment::Pair`] form.
pub fn values_for_insert(
    data: &Value,
    depth: usize,
    skip_field_name_check: bool,
) -> DbResult<InsertFragment> {
    match data {
        Value::Mapping(pairs) => {
            let mut names = Vec::with_capacity(pairs.len());
            let mut literals = Vec::with_capacity(pairs.len());
            for (name, value) in pairs {
                literals.push(value_literal(value)?);
                names.push(name.as_str());
            }
            let fields = if names.is_empty() {
                String::new()
            } else {
                format!("(`{}`)", names.join("`, `"))
            };
            let values = format!("({})", literals.join(", "));
            if depth == 2 {
                Ok(InsertFragment::Pair { fields, values })
            } else if fields.is_empty() {
                Ok(InsertFragment::Inline(values))
            } else {
                Ok(InsertFragment::Inline(format!("{fields} VALUES {values}")))
            }
        }
        Value::Sequence(items) => {
            if !items.iter().any(Value::is_composite) {
                if depth == 2 {
                    // A positional row has no names to share with its
                    // siblings' field clause.
                    return Err(DbError::invalid_field(
                        "positional rows cannot carry a field-name clause",
                        format!("{data:?}"),
                    ));
                }
                let literals = items
                    .iter()
                    .map(value_literal)
                    .collect::<DbResult<Vec<_>>>()?;
                return Ok(InsertFragment::Inline(format!("({})", literals.join(", "))));
            }

            if depth >= 2 {
                return Err(DbError::TooManyLoops(depth + 1));
            }

            let mut shared_fields: Option<String> = None;
            let mut tuples = Vec::with_capacity(items.len());
            for item in items {
                match values_for_insert(item, depth + 1, skip_field_name_check)? {
                    InsertFragment::Pair { fields, values } => {
                        match &shared_fields {
                            None => shared_fields = Some(fields),
                            Some(first) if *first != fields && !skip_field_name_check => {
                                return Err(DbError::invalid_field(
                                    "field names do not match across rows",
                                    format!("{data:?}"),
                                ));
                            }
                            Some(_) => {}
                        }
                        tuples.push(values);
                    }
                    InsertFragment::Inline(_) => {
                        return Err(DbError::invalid_field(
                            "rows must all be mappings",
                            format!("{data:?}"),
                        ));
                    }
                }
            }
            let values = tuples.join(", ");
            Ok(InsertFragment::Inline(match shared_fields {
                Some(fields) if !fields.is_empty() => format!("{fields} VALUES {values}"),
                _ => values,
            }))
        }
        other => Err(DbError::invalid_field(
            "expected a sequence or mapping of insert values",
            format!("{other:?}"),
        )),
    }
}

/// Render an UPDATE SET body.
///
/// A mapping renders comma-joined `` `col` = literal`` pairs; a scalar passes
/// through as an already-formed body.
pub fn set_clause(data: &Value) -> DbResult<String> {
    match data {
        Value::Mapping(pairs) => {
            let mut parts = Vec::with_capacity(pairs.len());
            for (name, value) in pairs {
                parts.push(format!("`{name}` = {}", value_literal(value)?));
            }
            Ok(parts.join(", "))
        }
        Value::Scalar(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        other => Err(DbError::invalid_field(
            "expected a mapping of column assignments",
            format!("{other:?}"),
        )),
    }
}

/// Format a unix timestamp as the body of a SQL date literal.
///
/// `field_type` is one of `DATE`, `TIME`, `YEAR`; anything else formats as
/// `DATETIME`. Non-positive timestamps yield `None`.
pub fn prepare_date(timestamp: i64, field_type: &str) -> Option<String> {
    if timestamp <= 0 {
        return None;
    }
    let date = chrono::DateTime::from_timestamp(timestamp, 0)?;
    let format = match field_type {
        "DATE" => "%Y-%m-%d",
        "TIME" => "%H:%M:%S",
        "YEAR" => "%Y",
        _ => "%Y-%m-%d %H:%M:%S",
    };
    Some(date.format(format).to_string())
}

fn prefix_keyword(data: &str, keyword: &str, prefix: &str) -> String {
    let data = data.trim();
    if data.is_empty() {
        return String::new();
    }
    if data.len() >= keyword.len()
        && data
            .get(0..keyword.len())
            .map(|head| head.eq_ignore_ascii_case(keyword))
            .unwrap_or(false)
    {
        return data.to_string();
    }
    format!("{prefix} {data}")
}

fn join_scalars<'a>(items: impl Iterator<Item = &'a Value>, sep: &str) -> String {
    items
        .filter_map(Value::as_scalar)
        .collect::<Vec<_>>()
        .join(sep)
}

fn collect_scalars<'a>(items: impl Iterator<Item = &'a Value>) -> Option<Vec<&'a str>> {
    items.map(Value::as_scalar).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== fields ====================

    #[test]
    fn fields_empty_is_wildcard() {
        assert_eq!(fields(&Value::from("")), "*");
        assert_eq!(fields(&Value::Null), "*");
        assert_eq!(fields(&Value::Sequence(Vec::new())), "*");
    }

    #[test]
    fn fields_scalar_passthrough() {
        assert_eq!(fields(&Value::from("id, pagetitle")), "id, pagetitle");
    }

    #[test]
    fn fields_sequence_comma_joined() {
        assert_eq!(fields(&Value::from(vec!["id", "title"])), "id,title");
    }

    #[test]
    fn fields_mapping_aliases() {
        let spec = Value::mapping([("total", "COUNT(*)"), ("id", "id")]);
        assert_eq!(fields(&spec), "COUNT(*) as `total`,id");
    }

    // ==================== from ====================

    #[test]
    fn from_scalar_passthrough() {
        assert_eq!(from(&Value::from("site_content"), false).unwrap(), "site_content");
    }

    #[test]
    fn from_multiple_space_joined() {
        let spec = Value::from(vec!["site_content c", "site_tmplvars v"]);
        assert_eq!(
            from(&spec, true).unwrap(),
            "site_content c site_tmplvars v"
        );
    }

    #[test]
    fn from_empty_fails() {
        assert!(from(&Value::from(""), false).unwrap_err().is_table_not_defined());
        assert!(from(&Value::from("  "), true).unwrap_err().is_table_not_defined());
    }

    #[test]
    fn from_sequence_without_multiple_fails() {
        let spec = Value::from(vec!["a", "b"]);
        assert!(from(&spec, false).unwrap_err().is_table_not_defined());
    }

    // ==================== where / order / limit ====================

    #[test]
    fn where_prefixes_keyword() {
        assert_eq!(where_clause(&Value::from("id = 1")), "WHERE id = 1");
    }

    #[test]
    fn where_does_not_double_prefix() {
        assert_eq!(where_clause(&Value::from("WHERE id = 1")), "WHERE id = 1");
        assert_eq!(where_clause(&Value::from("where id = 1")), "where id = 1");
    }

    #[test]
    fn where_empty_renders_empty() {
        assert_eq!(where_clause(&Value::from("")), "");
        assert_eq!(where_clause(&Value::from("   ")), "");
    }

    #[test]
    fn where_sequence_space_joined() {
        let spec = Value::from(vec!["parent = 0", "AND deleted = 0"]);
        assert_eq!(where_clause(&spec), "WHERE parent = 0 AND deleted = 0");
    }

    #[test]
    fn order_prefix_and_passthrough() {
        assert_eq!(order(&Value::from("id DESC")), "ORDER BY id DESC");
        assert_eq!(order(&Value::from("ORDER BY id")), "ORDER BY id");
        assert_eq!(order(&Value::from("")), "");
    }

    #[test]
    fn limit_prefix_and_numeric_coercion() {
        assert_eq!(limit(&Value::from("10")), "LIMIT 10");
        assert_eq!(limit(&Value::from(10)), "LIMIT 10");
        assert_eq!(limit(&Value::from("LIMIT 5, 10")), "LIMIT 5, 10");
        assert_eq!(limit(&Value::from("")), "");
    }

    // ==================== value_literal ====================

    #[test]
    fn literal_null_variants() {
        assert_eq!(value_literal(&Value::Null).unwrap(), "NULL");
        assert_eq!(value_literal(&Value::from("null")).unwrap(), "NULL");
        assert_eq!(value_literal(&Value::from("NULL")).unwrap(), "NULL");
    }

    #[test]
    fn literal_scalar_is_quoted_verbatim() {
        assert_eq!(value_literal(&Value::from("x")).unwrap(), "'x'");
        assert_eq!(value_literal(&Value::from(10)).unwrap(), "'10'");
    }

    #[test]
    fn literal_rejects_composites() {
        let err = value_literal(&Value::from(vec![1, 2])).unwrap_err();
        assert!(err.is_invalid_field());
    }

    // ==================== values_for_insert ====================

    #[test]
    fn insert_values_mapping_preserves_order_and_null() {
        let spec = Value::mapping([
            ("a", Value::from(1)),
            ("b", Value::Null),
            ("c", Value::from("x")),
        ]);
        let fragment = values_for_insert(&spec, 1, false).unwrap().into_inline();
        assert_eq!(fragment, "(`a`, `b`, `c`) VALUES ('1', NULL, 'x')");
    }

    #[test]
    fn insert_values_flat_sequence_is_bare_tuple() {
        let spec = Value::from(vec!["1", "hello"]);
        let fragment = values_for_insert(&spec, 1, false).unwrap().into_inline();
        assert_eq!(fragment, "('1', 'hello')");
    }

    #[test]
    fn insert_values_multi_row_shares_field_clause() {
        let spec = Value::sequence([
            Value::mapping([("a", 1), ("b", 2)]),
            Value::mapping([("a", 3), ("b", 4)]),
        ]);
        let fragment = values_for_insert(&spec, 1, false).unwrap().into_inline();
        assert_eq!(fragment, "(`a`, `b`) VALUES ('1', '2'), ('3', '4')");
    }

    #[test]
    fn insert_values_multi_row_field_mismatch_fails() {
        let spec = Value::sequence([
            Value::mapping([("a", 1)]),
            Value::mapping([("b", 2)]),
        ]);
        let err = values_for_insert(&spec, 1, false).unwrap_err();
        assert!(err.is_invalid_field());
    }

    #[test]
    fn insert_values_multi_row_mismatch_allowed_when_skipped() {
        let spec = Value::sequence([
            Value::mapping([("a", 1)]),
            Value::mapping([("b", 2)]),
        ]);
        let fragment = values_for_insert(&spec, 1, true).unwrap().into_inline();
        assert_eq!(fragment, "(`a`) VALUES ('1'), ('2')");
    }

    #[test]
    fn insert_values_nesting_beyond_two_levels_fails() {
        let spec = Value::sequence([Value::sequence([Value::from(vec![1])])]);
        let err = values_for_insert(&spec, 1, false).unwrap_err();
        assert!(err.is_too_many_loops());
    }

    #[test]
    fn insert_values_split_form_for_insert_select() {
        let spec = Value::mapping([("a", 1), ("b", 2)]);
        match values_for_insert(&spec, 2, false).unwrap() {
            InsertFragment::Pair { fields, values } => {
                assert_eq!(fields, "(`a`, `b`)");
                assert_eq!(values, "('1', '2')");
            }
            other => panic!("expected split form, got {other:?}"),
        }
    }

    #[test]
    fn insert_values_positional_rows_cannot_be_split() {
        let err = values_for_insert(&Value::from(vec![1, 2]), 2, false).unwrap_err();
        assert!(err.is_invalid_field());
    }

    // ==================== set_clause ====================

    #[test]
    fn set_clause_mapping() {
        let spec = Value::mapping([("title", Value::from("x")), ("alias", Value::Null)]);
        assert_eq!(set_clause(&spec).unwrap(), "`title` = 'x', `alias` = NULL");
    }

    #[test]
    fn set_clause_scalar_passthrough() {
        assert_eq!(
            set_clause(&Value::from("`title` = 'x'")).unwrap(),
            "`title` = 'x'"
        );
    }

    // ==================== prepare_date ====================

    #[test]
    fn prepare_date_formats() {
        let ts = 1136214245; // 2006-01-02 15:04:05 UTC
        assert_eq!(prepare_date(ts, "DATE").as_deref(), Some("2006-01-02"));
        assert_eq!(prepare_date(ts, "TIME").as_deref(), Some("15:04:05"));
        assert_eq!(prepare_date(ts, "YEAR").as_deref(), Some("2006"));
        assert_eq!(
            prepare_date(ts, "DATETIME").as_deref(),
            Some("2006-01-02 15:04:05")
        );
    }

    #[test]
    fn prepare_date_rejects_non_positive() {
        assert_eq!(prepare_date(0, "DATE"), None);
        assert_eq!(prepare_date(-5, "DATETIME"), None);
    }
}
