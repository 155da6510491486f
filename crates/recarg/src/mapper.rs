//! Field-to-argument derivation.
//!
//! One field descriptor goes in, one engine argument comes out. The steps
//! run in a fixed order so later ones can rely on what earlier ones
//! resolved: flags first, then conversion (literals, list elements, union
//! unwrapping), then presence, then the boolean switch rewrite.

use recarg_argparse::{Arg, Converter, SwitchStyle, Value, ValueKind};
use tracing::trace;

use crate::error::ConfigurationError;
use crate::schema::{DefaultSlot, FieldDescriptor, FieldKind, Group};

/// A derived argument plus its help-section placement.
#[derive(Debug, Clone)]
pub(crate) struct ArgSpec {
    pub(crate) arg: Arg,
    pub(crate) group: Option<Group>,
}

pub(crate) fn derive_arg_spec(field: &FieldDescriptor) -> Result<ArgSpec, ConfigurationError> {
    // Flag synthesis. Custom names win; otherwise the field name becomes a
    // long flag, with underscores turned into hyphens unless told not to.
    let mut flags: Vec<String> = match &field.flags {
        Some(custom) if !custom.is_empty() => custom.clone(),
        _ => vec![format!("--{}", flag_name(&field.name, field.keep_underscores))],
    };
    let positional = flags.first().is_some_and(|flag| !flag.starts_with('-'));

    let effective = strip_optional(&field.kind);
    let mut converter = field.converter.clone();
    let mut choices = field.choices.clone();

    // Literal members double as the choice list, and their common kind
    // decides the converter, replacing any explicit one. Configured
    // choices on top would be ambiguous, so that combination is rejected.
    if let FieldKind::Literal(members) = effective {
        if choices.is_some() {
            return Err(ConfigurationError::ChoicesWithLiteral(field.name.clone()));
        }
        let kind = common_literal_kind(&field.name, members)?;
        choices = Some(members.clone());
        converter = Converter::for_kind(kind);
    }

    // Multi-value fields read their element conversion out of the list
    // kind. A list without an arity has no workable shape on the command
    // line and is rejected outright.
    if field.arity.is_some() {
        if converter.is_none() {
            let element = element_kind(&field.kind)
                .ok_or_else(|| ConfigurationError::UnknownElementType(field.name.clone()))?;
            let (element_converter, element_choices) = resolve_scalar(&field.name, element)?
                .ok_or_else(|| ConfigurationError::UnknownElementType(field.name.clone()))?;
            converter = Some(element_converter);
            if choices.is_none() {
                choices = element_choices;
            }
        }
    } else if matches!(effective, FieldKind::List(_)) {
        return Err(ConfigurationError::ListWithoutArity(field.name.clone()));
    }

    // Scalar conversion from the effective kind. A two-member union with
    // the absence kind unwraps to its partner; anything else is opaque and
    // needs an explicit converter.
    if converter.is_none() && field.kind != FieldKind::Bool {
        match effective {
            FieldKind::Union(members) => {
                let partner = absence_partner(members)
                    .ok_or_else(|| ConfigurationError::UnionWithoutConverter(field.name.clone()))?;
                let (partner_converter, partner_choices) =
                    resolve_scalar(&field.name, partner)?.ok_or_else(|| {
                        ConfigurationError::UnionWithoutConverter(field.name.clone())
                    })?;
                converter = Some(partner_converter);
                if choices.is_none() {
                    choices = partner_choices;
                }
            }
            other => {
                if let Some((derived, derived_choices)) = resolve_scalar(&field.name, other)? {
                    converter = Some(derived);
                    if choices.is_none() {
                        choices = derived_choices;
                    }
                }
            }
        }
    }

    // Presence. No default on a flagged field means required; defaults are
    // adopted as-is, and factories fire here, once per derivation.
    let mut required = false;
    let mut default: Option<Value> = None;
    match &field.default {
        DefaultSlot::None => {
            if !positional {
                required = true;
            }
        }
        DefaultSlot::Value(value) => default = Some(value.clone()),
        DefaultSlot::Factory(factory) => default = Some(factory()),
    }

    // Plain booleans become switches. The style follows the default: a
    // `true` default inverts the flag, a required marking asks for the
    // paired form, and everything else is an ordinary store-true.
    let mut switch: Option<SwitchStyle> = None;
    if field.kind == FieldKind::Bool {
        if positional {
            return Err(ConfigurationError::PositionalBool(field.name.clone()));
        }
        converter = None;
        required = false;
        if matches!(default, Some(Value::Bool(true))) {
            switch = Some(SwitchStyle::SetFalse);
            if field.flags.is_none() {
                flags = vec![format!(
                    "--no-{}",
                    flag_name(&field.name, field.keep_underscores)
                )];
            }
        } else if field.required {
            switch = Some(SwitchStyle::Paired);
            required = true;
            default = None;
        } else {
            switch = Some(SwitchStyle::SetTrue);
            default = Some(Value::Bool(false));
        }
    }

    if converter.is_none() && switch.is_none() {
        return Err(ConfigurationError::NoConverter(field.name.clone()));
    }

    let mut arg = Arg::new(&field.name).flags(flags);
    if let Some(help) = &field.help {
        arg = arg.help(help.clone());
    }
    if let Some(value_name) = &field.value_name {
        arg = arg.value_name(value_name.clone());
    }
    if let Some(converter) = converter {
        arg = arg.converter(converter);
    }
    if let Some(style) = switch {
        arg = arg.switch(style);
    }
    if required {
        arg = arg.required(true);
    }
    if let Some(value) = default {
        arg = arg.default(value);
    }
    if let Some(choices) = choices {
        arg = arg.choices(choices);
    }
    if let Some(arity) = field.arity {
        arg = arg.arity(arity);
    }

    trace!(field = %field.name, positional, "derived argument");
    Ok(ArgSpec {
        arg,
        group: field.group.clone(),
    })
}

fn flag_name(name: &str, keep_underscores: bool) -> String {
    if keep_underscores {
        name.to_string()
    } else {
        name.replace('_', "-")
    }
}

fn strip_optional(kind: &FieldKind) -> &FieldKind {
    let mut current = kind;
    while let FieldKind::Optional(inner) = current {
        current = inner;
    }
    current
}

fn element_kind(kind: &FieldKind) -> Option<&FieldKind> {
    match strip_optional(kind) {
        FieldKind::List(element) => Some(element),
        _ => None,
    }
}

fn absence_partner(members: &[FieldKind]) -> Option<&FieldKind> {
    if members.len() != 2 {
        return None;
    }
    let null_at = members.iter().position(|member| *member == FieldKind::Null)?;
    members.get(1 - null_at)
}

/// Converter and implied choices for a scalar position: a primitive kind,
/// or a literal whose members share one. `None` means the kind is opaque.
fn resolve_scalar(
    field: &str,
    kind: &FieldKind,
) -> Result<Option<(Converter, Option<Vec<Value>>)>, ConfigurationError> {
    let resolved = match kind {
        FieldKind::Bool => Converter::for_kind(ValueKind::Bool).map(|c| (c, None)),
        FieldKind::Int => Converter::for_kind(ValueKind::Int).map(|c| (c, None)),
        FieldKind::Float => Converter::for_kind(ValueKind::Float).map(|c| (c, None)),
        FieldKind::Str => Converter::for_kind(ValueKind::Str).map(|c| (c, None)),
        FieldKind::Literal(members) => {
            let element = common_literal_kind(field, members)?;
            Converter::for_kind(element).map(|c| (c, Some(members.clone())))
        }
        _ => None,
    };
    Ok(resolved)
}

fn common_literal_kind(field: &str, members: &[Value]) -> Result<ValueKind, ConfigurationError> {
    let mut kinds: Vec<ValueKind> = Vec::new();
    for member in members {
        let kind = member.kind();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    match kinds.as_slice() {
        [] => Err(ConfigurationError::EmptyLiteral(field.to_string())),
        [one] => Ok(*one),
        many => Err(ConfigurationError::MixedLiteralKinds {
            field: field.to_string(),
            kinds: many
                .iter()
                .map(|kind| kind.name())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}
