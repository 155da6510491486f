use std::fmt;
use std::sync::Arc;

/// A typed argument value.
///
/// Values are produced by a [`Converter`] from raw command-line tokens, or
/// supplied directly as defaults. `Null` is the value carried by optional
/// arguments whose absence is itself meaningful.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// The primitive kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::List(_) => ValueKind::List,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

/// Discriminator for [`Value`] variants, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
    List,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Str => "str",
            ValueKind::List => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses one raw token into a typed [`Value`].
///
/// Converters are cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct Converter {
    func: Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>,
}

impl Converter {
    /// Wrap a typed parse function.
    ///
    /// The function's success type is folded into [`Value`] and its error is
    /// rendered via `Display`.
    pub fn new<T, E>(func: impl Fn(&str) -> Result<T, E> + Send + Sync + 'static) -> Self
    where
        T: Into<Value>,
        E: fmt::Display,
    {
        Self {
            func: Arc::new(move |raw| func(raw).map(Into::into).map_err(|e| e.to_string())),
        }
    }

    /// The stock converter for a primitive kind.
    ///
    /// `Null` and `List` have no single-token form, so they yield `None`.
    pub fn for_kind(kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::Bool => Some(Self::new(|raw: &str| raw.parse::<bool>())),
            ValueKind::Int => Some(Self::new(|raw: &str| raw.parse::<i64>())),
            ValueKind::Float => Some(Self::new(|raw: &str| raw.parse::<f64>())),
            ValueKind::Str => Some(Self::new(|raw: &str| {
                Ok::<_, std::convert::Infallible>(raw.to_string())
            })),
            ValueKind::Null | ValueKind::List => None,
        }
    }

    /// Convert one raw token.
    pub fn convert(&self, raw: &str) -> Result<Value, String> {
        (self.func)(raw)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_converters_parse_primitives() {
        let int = Converter::for_kind(ValueKind::Int).unwrap();
        assert_eq!(int.convert("42").unwrap(), Value::Int(42));
        assert!(int.convert("4.2").is_err());

        let float = Converter::for_kind(ValueKind::Float).unwrap();
        assert_eq!(float.convert("2.5").unwrap(), Value::Float(2.5));

        let boolean = Converter::for_kind(ValueKind::Bool).unwrap();
        assert_eq!(boolean.convert("true").unwrap(), Value::Bool(true));
        assert!(boolean.convert("yes").is_err());

        let string = Converter::for_kind(ValueKind::Str).unwrap();
        assert_eq!(
            string.convert("hello").unwrap(),
            Value::Str("hello".to_string())
        );
    }

    #[test]
    fn null_and_list_have_no_token_form() {
        assert!(Converter::for_kind(ValueKind::Null).is_none());
        assert!(Converter::for_kind(ValueKind::List).is_none());
    }

    #[test]
    fn custom_converter_folds_into_value() {
        let upper = Converter::new(|raw: &str| {
            Ok::<_, std::convert::Infallible>(raw.to_ascii_uppercase())
        });
        assert_eq!(
            upper.convert("abc").unwrap(),
            Value::Str("ABC".to_string())
        );

        let strict = Converter::new(|raw: &str| {
            if raw.is_empty() {
                Err("empty token".to_string())
            } else {
                Ok(raw.len() as i64)
            }
        });
        assert_eq!(strict.convert("abc").unwrap(), Value::Int(3));
        assert_eq!(strict.convert("").unwrap_err(), "empty token");
    }

    #[test]
    fn display_renders_lists_and_scalars() {
        let v = Value::List(vec![Value::Int(1), Value::Str("two".into())]);
        assert_eq!(v.to_string(), "[1, two]");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Bool(false).to_string(), "false");
    }

    #[test]
    fn from_impls_cover_common_shapes() {
        assert_eq!(Value::from(7), Value::Int(7));
        assert_eq!(Value::from(vec![1, 2]), Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(Value::from(Some("x")), Value::Str("x".to_string()));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }
}
