use std::fmt;
use std::sync::Arc;

use recarg_argparse::{Arity, Converter, Value};

use crate::error::ConstructionError;
use crate::values::ParsedValues;

/// The declared type of a record field.
///
/// The kind drives converter inference, choice derivation, and the switch
/// handling for plain booleans. `#[derive(Record)]` maps Rust field types
/// onto these; hand-written schemas pick them directly.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    Str,
    /// A list with the given element kind. Needs an explicit arity.
    List(Box<FieldKind>),
    /// A value that may be absent. Absence materializes as [`Value::Null`].
    Optional(Box<FieldKind>),
    /// Several possible kinds. Only the two-member form with [`FieldKind::Null`]
    /// is resolvable without a custom converter.
    Union(Vec<FieldKind>),
    /// A closed set of allowed values sharing one primitive kind.
    Literal(Vec<Value>),
    /// The absence kind. Only meaningful as a union member.
    Null,
    /// No conversion derivable from the type alone.
    Any,
}

impl FieldKind {
    pub fn list(element: FieldKind) -> Self {
        FieldKind::List(Box::new(element))
    }

    pub fn optional(inner: FieldKind) -> Self {
        FieldKind::Optional(Box::new(inner))
    }

    pub fn union(members: impl IntoIterator<Item = FieldKind>) -> Self {
        FieldKind::Union(members.into_iter().collect())
    }

    pub fn literal<I, V>(members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        FieldKind::Literal(members.into_iter().map(Into::into).collect())
    }
}

/// How a field obtains a value when its argument never appears.
#[derive(Clone)]
pub enum DefaultSlot {
    /// No fallback. Non-positional fields become required.
    None,
    /// A fixed value, adopted as-is without conversion.
    Value(Value),
    /// A factory invoked once per parser construction.
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultSlot {
    pub fn is_none(&self) -> bool {
        matches!(self, DefaultSlot::None)
    }
}

impl fmt::Debug for DefaultSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultSlot::None => f.write_str("None"),
            DefaultSlot::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultSlot::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Help-section placement for a field.
///
/// Fields naming the same title land in one shared section, in first-seen
/// order. Untitled groups (an empty title counts) are anonymous and never
/// merge, even when their descriptions match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Group {
    pub fn titled(title: impl Into<String>) -> Self {
        Group {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn described(title: impl Into<String>, description: impl Into<String>) -> Self {
        Group {
            title: Some(title.into()),
            description: Some(description.into()),
        }
    }

    pub fn anonymous() -> Self {
        Group::default()
    }

    pub fn anonymous_described(description: impl Into<String>) -> Self {
        Group {
            title: None,
            description: Some(description.into()),
        }
    }
}

impl From<&str> for Group {
    fn from(title: &str) -> Self {
        Group::titled(title)
    }
}

impl From<String> for Group {
    fn from(title: String) -> Self {
        Group::titled(title)
    }
}

impl From<(&str, &str)> for Group {
    fn from((title, description): (&str, &str)) -> Self {
        Group::described(title, description)
    }
}

/// One field of a record: its name, declared kind, default, and the
/// per-argument configuration that tunes how the kind maps to the command
/// line.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) kind: FieldKind,
    pub(crate) default: DefaultSlot,
    pub(crate) flags: Option<Vec<String>>,
    pub(crate) help: Option<String>,
    pub(crate) value_name: Option<String>,
    pub(crate) converter: Option<Converter>,
    pub(crate) choices: Option<Vec<Value>>,
    pub(crate) arity: Option<Arity>,
    pub(crate) required: bool,
    pub(crate) keep_underscores: bool,
    pub(crate) group: Option<Group>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            kind,
            default: DefaultSlot::None,
            flags: None,
            help: None,
            value_name: None,
            converter: None,
            choices: None,
            arity: None,
            required: false,
            keep_underscores: false,
            group: None,
        }
    }

    /// Custom argument names, replacing the synthesized `--field-name` flag.
    ///
    /// A single name without a dash prefix makes the field positional.
    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = Some(flags.into_iter().map(Into::into).collect());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }

    /// A fixed default, adopted without running any converter.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = DefaultSlot::Value(value.into());
        self
    }

    /// A default computed when the parser is built, once per construction.
    pub fn default_factory<T, F>(mut self, factory: F) -> Self
    where
        T: Into<Value>,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default = DefaultSlot::Factory(Arc::new(move || factory().into()));
        self
    }

    /// A custom token converter, overriding what the kind would infer.
    /// A literal kind is the exception: its members' common kind decides
    /// the converter.
    pub fn parse_with<T, E>(
        mut self,
        func: impl Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    ) -> Self
    where
        T: Into<Value>,
        E: fmt::Display,
    {
        self.converter = Some(Converter::new(func));
        self
    }

    /// A prebuilt converter, for sharing one across fields.
    pub fn converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Allowed values. Cannot be combined with a literal kind, which carries
    /// its own.
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// How many value tokens the argument consumes.
    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    /// Only meaningful for plain `bool` fields: forces the paired
    /// `--flag` / `--no-flag` form and makes one of the two mandatory.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Keep underscores in the synthesized flag instead of turning them
    /// into hyphens.
    pub fn keep_underscores(mut self) -> Self {
        self.keep_underscores = true;
        self
    }

    pub fn group(mut self, group: impl Into<Group>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}

/// The ordered field table of a record, plus the identity shown in help.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    pub(crate) name: String,
    pub(crate) about: Option<String>,
    pub(crate) fields: Vec<FieldDescriptor>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        RecordSchema {
            name: name.into(),
            about: None,
            fields: Vec::new(),
        }
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// A type that can describe itself as a schema and rebuild itself from
/// parsed values.
///
/// Usually implemented with `#[derive(Record)]`; hand implementations are
/// ordinary and useful when the field table is dynamic.
pub trait Record: Sized {
    /// The field table. Read once per parser construction.
    fn schema() -> RecordSchema;

    /// Rebuild the record from values keyed by field name. Each field takes
    /// its own entry out of `values`.
    fn from_values(values: &mut ParsedValues) -> Result<Self, ConstructionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_conversions() {
        let titled: Group = "Network".into();
        assert_eq!(titled, Group::titled("Network"));

        let described: Group = ("Network", "Socket knobs").into();
        assert_eq!(described.title.as_deref(), Some("Network"));
        assert_eq!(described.description.as_deref(), Some("Socket knobs"));

        assert_eq!(Group::anonymous().title, None);
        assert_ne!(Group::anonymous(), titled);
    }

    #[test]
    fn literal_kind_collects_values() {
        let kind = FieldKind::literal(["a", "b"]);
        match kind {
            FieldKind::Literal(members) => {
                assert_eq!(members, vec![Value::from("a"), Value::from("b")]);
            }
            other => panic!("expected literal, got: {other:?}"),
        }
    }

    #[test]
    fn default_slot_debug_is_stable() {
        let factory = DefaultSlot::Factory(Arc::new(|| Value::from(1)));
        assert_eq!(format!("{factory:?}"), "Factory(..)");
        assert_eq!(format!("{:?}", DefaultSlot::None), "None");
    }

    #[test]
    fn descriptor_builder_accumulates() {
        let field = FieldDescriptor::new("log_level", FieldKind::Str)
            .help("Log verbosity")
            .default("info")
            .choices(["debug", "info", "warn"])
            .group("Logging");
        assert_eq!(field.name(), "log_level");
        assert!(matches!(field.default, DefaultSlot::Value(Value::Str(_))));
        assert_eq!(field.choices.as_ref().map(Vec::len), Some(3));
        assert_eq!(field.group, Some(Group::titled("Logging")));
    }
}
