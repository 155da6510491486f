use std::collections::HashMap;
use std::path::PathBuf;

use recarg_argparse::{Matches, Value};

use crate::error::ConstructionError;
use crate::schema::Record;

/// Parsed values keyed by field name.
///
/// Built from engine matches with the no-value sentinels dropped, so a
/// field that stayed unset simply has no entry here. Record construction
/// takes entries out one by one.
#[derive(Debug, Clone, Default)]
pub struct ParsedValues {
    values: HashMap<String, Value>,
}

impl ParsedValues {
    pub(crate) fn from_matches(matches: Matches) -> Self {
        let values = matches
            .into_entries()
            .into_iter()
            .filter_map(|(dest, slot)| slot.map(|value| (dest, value)))
            .collect();
        ParsedValues { values }
    }

    /// Remove and convert the entry for `name`.
    ///
    /// A missing entry is an error unless `T` tolerates absence the way
    /// `Option<T>` does.
    pub fn take<T: FromValue>(&mut self, name: &str) -> Result<T, ConstructionError> {
        match self.values.remove(name) {
            Some(value) => T::from_value(name, value),
            None => T::absent(name),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Seed an entry directly. Handy for hand-built tests of
    /// [`Record::from_values`].
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }
}

/// Conversion from a parsed [`Value`] into a concrete field type.
pub trait FromValue: Sized {
    fn from_value(field: &str, value: Value) -> Result<Self, ConstructionError>;

    /// Invoked when the field has no entry at all. Defaults to a
    /// missing-field error; `Option<T>` maps absence to `None`.
    fn absent(field: &str) -> Result<Self, ConstructionError> {
        Err(ConstructionError::MissingField(field.to_string()))
    }
}

fn mismatch(field: &str, expected: &str, actual: &Value) -> ConstructionError {
    ConstructionError::TypeMismatch {
        field: field.to_string(),
        expected: expected.to_string(),
        actual: actual.kind().name().to_string(),
    }
}

impl FromValue for bool {
    fn from_value(field: &str, value: Value) -> Result<Self, ConstructionError> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch(field, "bool", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(field: &str, value: Value) -> Result<Self, ConstructionError> {
        match value {
            Value::Str(v) => Ok(v),
            other => Err(mismatch(field, "str", &other)),
        }
    }
}

impl FromValue for PathBuf {
    fn from_value(field: &str, value: Value) -> Result<Self, ConstructionError> {
        match value {
            Value::Str(v) => Ok(PathBuf::from(v)),
            other => Err(mismatch(field, "str", &other)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(field: &str, value: Value) -> Result<Self, ConstructionError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            other => Err(mismatch(field, "float", &other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(field: &str, value: Value) -> Result<Self, ConstructionError> {
        let wide = f64::from_value(field, value)?;
        let narrow = wide as f32;
        // Narrowing turns finite doubles beyond f32 range into infinities;
        // deliberate infinities and NaN pass through untouched.
        if wide.is_finite() && !narrow.is_finite() {
            return Err(ConstructionError::Invalid {
                field: field.to_string(),
                message: format!("{wide} is out of range for f32"),
            });
        }
        Ok(narrow)
    }
}

macro_rules! impl_from_value_for_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(field: &str, value: Value) -> Result<Self, ConstructionError> {
                    match value {
                        Value::Int(v) => <$ty>::try_from(v).map_err(|_| {
                            ConstructionError::Invalid {
                                field: field.to_string(),
                                message: format!(
                                    "{v} is out of range for {}",
                                    stringify!($ty)
                                ),
                            }
                        }),
                        other => Err(mismatch(field, "int", &other)),
                    }
                }
            }
        )*
    };
}

impl_from_value_for_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(field: &str, value: Value) -> Result<Self, ConstructionError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(field, other).map(Some),
        }
    }

    fn absent(_field: &str) -> Result<Self, ConstructionError> {
        Ok(None)
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(field: &str, value: Value) -> Result<Self, ConstructionError> {
        match value {
            Value::List(items) => items
                .into_iter()
                .map(|item| T::from_value(field, item))
                .collect(),
            other => Err(mismatch(field, "list", &other)),
        }
    }
}

impl FromValue for Value {
    fn from_value(_field: &str, value: Value) -> Result<Self, ConstructionError> {
        Ok(value)
    }
}

/// Rebuild a record from engine matches.
///
/// Sentinel slots disappear before construction, so `Option` fields read
/// absence as `None` and anything else missing is a construction error.
pub fn materialize<R: Record>(matches: Matches) -> Result<R, ConstructionError> {
    let mut values = ParsedValues::from_matches(matches);
    R::from_values(&mut values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_converts_and_removes() {
        let mut values = ParsedValues::default();
        values.insert("port", 8080);
        let port: u16 = values.take("port").unwrap();
        assert_eq!(port, 8080);
        assert!(!values.contains("port"));
    }

    #[test]
    fn take_missing_field_errors() {
        let mut values = ParsedValues::default();
        match values.take::<String>("name") {
            Err(ConstructionError::MissingField(field)) => assert_eq!(field, "name"),
            other => panic!("expected missing field, got: {other:?}"),
        }
    }

    #[test]
    fn optional_tolerates_absence_and_null() {
        let mut values = ParsedValues::default();
        let absent: Option<i64> = values.take("absent").unwrap();
        assert_eq!(absent, None);

        values.insert("explicit", Value::Null);
        let null: Option<i64> = values.take("explicit").unwrap();
        assert_eq!(null, None);

        values.insert("set", 3);
        let set: Option<i64> = values.take("set").unwrap();
        assert_eq!(set, Some(3));
    }

    #[test]
    fn int_range_is_checked() {
        let mut values = ParsedValues::default();
        values.insert("tiny", 300);
        match values.take::<u8>("tiny") {
            Err(ConstructionError::Invalid { field, message }) => {
                assert_eq!(field, "tiny");
                assert!(message.contains("out of range"), "message: {message}");
            }
            other => panic!("expected range error, got: {other:?}"),
        }

        values.insert("signed", -1);
        assert!(values.take::<u32>("signed").is_err());
    }

    #[test]
    fn narrowing_to_f32_is_range_checked() {
        let mut values = ParsedValues::default();
        values.insert("ratio", 2.5);
        let ratio: f32 = values.take("ratio").unwrap();
        assert_eq!(ratio, 2.5);

        values.insert("huge", 1e300);
        match values.take::<f32>("huge") {
            Err(ConstructionError::Invalid { field, message }) => {
                assert_eq!(field, "huge");
                assert!(message.contains("out of range"), "message: {message}");
            }
            other => panic!("expected range error, got: {other:?}"),
        }

        values.insert("inf", f64::INFINITY);
        let inf: f32 = values.take("inf").unwrap();
        assert!(inf.is_infinite());
    }

    #[test]
    fn list_elements_convert_individually() {
        let mut values = ParsedValues::default();
        values.insert("nums", vec![1, 2, 3]);
        let nums: Vec<u8> = values.take("nums").unwrap();
        assert_eq!(nums, vec![1, 2, 3]);

        values.insert("mixed", Value::List(vec![Value::from(1), Value::from("x")]));
        match values.take::<Vec<i64>>("mixed") {
            Err(ConstructionError::TypeMismatch { expected, actual, .. }) => {
                assert_eq!(expected, "int");
                assert_eq!(actual, "str");
            }
            other => panic!("expected mismatch, got: {other:?}"),
        }
    }

    #[test]
    fn type_mismatch_names_both_sides() {
        let mut values = ParsedValues::default();
        values.insert("flag", "yes");
        match values.take::<bool>("flag") {
            Err(ConstructionError::TypeMismatch { field, expected, actual }) => {
                assert_eq!(field, "flag");
                assert_eq!(expected, "bool");
                assert_eq!(actual, "str");
            }
            other => panic!("expected mismatch, got: {other:?}"),
        }
    }

    #[test]
    fn pathbuf_comes_from_strings() {
        let mut values = ParsedValues::default();
        values.insert("out", "/tmp/report.txt");
        let out: PathBuf = values.take("out").unwrap();
        assert_eq!(out, PathBuf::from("/tmp/report.txt"));
    }
}
