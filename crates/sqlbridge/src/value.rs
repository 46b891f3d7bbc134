//! Loosely-typed input values.
//!
//! Legacy call sites pass SQL building blocks as strings, lists, or ordered
//! maps interchangeably. [`Value`] models that ambiguity as an explicit
//! tagged union so every fragment builder can pattern-match on the shape
//! instead of probing types at runtime.

/// A loosely-typed input: a scalar, a list, or an ordered map.
///
/// Mapping entries preserve insertion order, which in turn fixes the column
/// order of generated field lists and VALUES tuples.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL / absent value.
    Null,
    /// A scalar, already in its string form.
    Scalar(String),
    /// A list (the legacy numeric-keyed array).
    Sequence(Vec<Value>),
    /// An ordered map (the legacy string-keyed array).
    Mapping(Vec<(String, Value)>),
}

impl Value {
    /// Build a mapping from key/value pairs, preserving order.
    pub fn mapping<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a sequence from values.
    pub fn sequence<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// The scalar text of this value, if it is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value counts as "nothing was supplied": null, an empty
    /// string, or an empty composite.
    pub fn is_empty_input(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Scalar(s) => s.is_empty(),
            Value::Sequence(items) => items.is_empty(),
            Value::Mapping(pairs) => pairs.is_empty(),
        }
    }

    /// Whether this value is a composite (sequence or mapping).
    pub fn is_composite(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Scalar(s.clone())
    }
}

macro_rules! value_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Scalar(v.to_string())
                }
            }
        )*
    };
}

value_from_display!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Scalar(if v { "1" } else { "0" }.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::Sequence(items.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

// ==================== Legacy value coercion ====================

/// A scalar read back out of a result, coerced the way legacy callers
/// expect: numeric-looking strings become numbers, everything else stays
/// text.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Coerced {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Coerced::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Coerced::Int(n) => Some(*n as f64),
            Coerced::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Coerced::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Coerce a raw result cell. Integral strings become `Int`, decimal strings
/// become `Float`, `None` stays `Null`, anything else is passed through as
/// `Text`.
pub fn convert_value(raw: Option<&str>) -> Coerced {
    let Some(raw) = raw else {
        return Coerced::Null;
    };
    if let Ok(n) = raw.parse::<i64>() {
        return Coerced::Int(n);
    }
    // Only plain decimal spellings count as numbers; "1e10" stays text.
    if raw.contains('.') {
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() {
                return Coerced::Float(f);
            }
        }
    }
    Coerced::Text(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_conversions() {
        assert_eq!(Value::from("x"), Value::Scalar("x".to_string()));
        assert_eq!(Value::from(10_i64), Value::Scalar("10".to_string()));
        assert_eq!(Value::from(1.5_f64), Value::Scalar("1.5".to_string()));
        assert_eq!(Value::from(true), Value::Scalar("1".to_string()));
        assert_eq!(Value::from(false), Value::Scalar("0".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn composite_conversions() {
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::Sequence(vec![
                Value::Scalar("1".to_string()),
                Value::Scalar("2".to_string())
            ])
        );
        let map = Value::mapping([("a", 1), ("b", 2)]);
        match map {
            Value::Mapping(pairs) => {
                assert_eq!(pairs[0].0, "a");
                assert_eq!(pairs[1].0, "b");
            }
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_detection() {
        assert!(Value::Null.is_empty_input());
        assert!(Value::from("").is_empty_input());
        assert!(Value::Sequence(Vec::new()).is_empty_input());
        assert!(!Value::from("0").is_empty_input());
        assert!(!Value::from("x").is_empty_input());
    }

    #[test]
    fn convert_value_coerces_numerics() {
        assert_eq!(convert_value(Some("42")), Coerced::Int(42));
        assert_eq!(convert_value(Some("-7")), Coerced::Int(-7));
        assert_eq!(convert_value(Some("1.25")), Coerced::Float(1.25));
        assert_eq!(
            convert_value(Some("hello")),
            Coerced::Text("hello".to_string())
        );
        assert_eq!(
            convert_value(Some("1e10")),
            Coerced::Text("1e10".to_string())
        );
        assert_eq!(convert_value(None), Coerced::Null);
    }
}
