use std::collections::{HashMap, HashSet};
use std::process;

use crate::error::{ParseError, ParseResult};
use crate::help;
use crate::value::{Converter, Value};

/// How many tokens a value-taking argument consumes.
///
/// An argument without an arity is scalar and consumes exactly one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly `n` tokens.
    Count(usize),
    /// One or more tokens, up to the next flag-like token.
    OneOrMore,
    /// Zero or more tokens, up to the next flag-like token.
    ZeroOrMore,
}

/// Behavior of a boolean flag that takes no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchStyle {
    /// Presence stores `true`.
    SetTrue,
    /// Presence stores `false`.
    SetFalse,
    /// Every long flag also answers to a synthesized `--no-` twin. The
    /// affirmative spelling stores `true`, the negated one `false`.
    Paired,
}

/// One argument definition.
///
/// The fields are plain data; build them directly or through the chaining
/// methods. [`Parser::check`] validates the combination before any parse.
#[derive(Debug, Clone)]
pub struct Arg {
    pub dest: String,
    pub flags: Vec<String>,
    pub help: Option<String>,
    pub value_name: Option<String>,
    pub converter: Option<Converter>,
    pub switch: Option<SwitchStyle>,
    pub required: bool,
    pub default: Option<Value>,
    pub choices: Option<Vec<Value>>,
    pub arity: Option<Arity>,
}

impl Arg {
    pub fn new(dest: impl Into<String>) -> Self {
        Self {
            dest: dest.into(),
            flags: Vec::new(),
            help: None,
            value_name: None,
            converter: None,
            switch: None,
            required: false,
            default: None,
            choices: None,
            arity: None,
        }
    }

    /// Add one flag spelling (`--long`, `-s`) or, for a positional argument,
    /// its bare name. The first flag decides positional-vs-option.
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
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

    pub fn converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn switch(mut self, style: SwitchStyle) -> Self {
        self.switch = Some(style);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = Some(arity);
        self
    }

    pub(crate) fn is_positional(&self) -> bool {
        self.flags.first().is_some_and(|f| !f.starts_with('-'))
    }

    pub(crate) fn takes_value(&self) -> bool {
        self.switch.is_none()
    }

    pub(crate) fn display_name(&self) -> &str {
        self.flags
            .iter()
            .find(|f| f.starts_with("--"))
            .or_else(|| self.flags.first())
            .map(String::as_str)
            .unwrap_or(self.dest.as_str())
    }
}

/// Handle to a help section created by [`Parser::group`].
///
/// Only valid for the parser that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) struct GroupDef {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) members: Vec<usize>,
}

/// Parsed values keyed by destination name.
///
/// Every registered destination has a slot. A slot holding `None` means the
/// argument was absent and had no default; callers that rebuild structured
/// records drop those slots before construction.
#[derive(Debug, Clone, Default)]
pub struct Matches {
    entries: Vec<(String, Option<Value>)>,
    explicit: HashSet<String>,
}

impl Matches {
    /// Get the value for a destination, if one was parsed or defaulted.
    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == dest)
            .and_then(|(_, v)| v.as_ref())
    }

    /// Whether the destination is registered at all.
    pub fn contains(&self, dest: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == dest)
    }

    /// Whether the destination holds a value (parsed or defaulted).
    pub fn is_set(&self, dest: &str) -> bool {
        self.get(dest).is_some()
    }

    /// Whether the destination was explicitly provided in argv.
    pub fn is_explicit(&self, dest: &str) -> bool {
        self.explicit.contains(dest)
    }

    /// Slots in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Consume the matches, yielding slots in registration order.
    pub fn into_entries(self) -> Vec<(String, Option<Value>)> {
        self.entries
    }

    fn insert_slot(&mut self, dest: String) {
        if !self.contains(&dest) {
            self.entries.push((dest, None));
        }
    }

    fn set(&mut self, dest: &str, value: Value) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| k == dest) {
            slot.1 = Some(value);
        }
    }

    fn set_explicit(&mut self, dest: &str, value: Value) {
        self.set(dest, value);
        self.explicit.insert(dest.to_string());
    }
}

#[derive(Debug, Clone, Copy)]
struct FlagTarget {
    idx: usize,
    negated: bool,
}

struct FlagTables {
    long: HashMap<String, FlagTarget>,
    short: HashMap<String, FlagTarget>,
    positionals: Vec<usize>,
    builtin_help: bool,
}

/// Declarative argument parser over typed [`Arg`] definitions.
///
/// Unless an argument claims `-h` or `--help`, both spellings are answered
/// with rendered help. Multiple occurrences of the same argument overwrite
/// each other; the last one wins.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    pub(crate) prog: String,
    pub(crate) about: Option<String>,
    pub(crate) args: Vec<Arg>,
    pub(crate) groups: Vec<GroupDef>,
}

impl Parser {
    pub fn new(prog: impl Into<String>) -> Self {
        Self {
            prog: prog.into(),
            about: None,
            args: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// One-line description shown at the top of help output.
    pub fn about(&mut self, about: impl Into<String>) -> &mut Self {
        self.about = Some(about.into());
        self
    }

    pub fn prog(&self) -> &str {
        &self.prog
    }

    /// Register an argument outside any group.
    pub fn arg(&mut self, arg: Arg) -> &mut Self {
        self.args.push(arg);
        self
    }

    /// Create a help section. Arguments registered on the returned handle are
    /// rendered under it, in registration order.
    pub fn group(&mut self, title: Option<&str>, description: Option<&str>) -> GroupId {
        self.groups.push(GroupDef {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
            members: Vec::new(),
        });
        GroupId(self.groups.len() - 1)
    }

    /// Register an argument under a help section.
    pub fn arg_in_group(&mut self, group: GroupId, arg: Arg) -> &mut Self {
        self.args.push(arg);
        let idx = self.args.len() - 1;
        self.groups[group.0].members.push(idx);
        self
    }

    /// Validate the argument definitions without parsing anything.
    pub fn check(&self) -> ParseResult<()> {
        self.build_tables().map(|_| ())
    }

    /// Render the full help text.
    pub fn format_help(&self) -> String {
        help::render(self)
    }

    /// Parse strictly. Unrecognized tokens are an error.
    pub fn try_parse(&self, argv: &[String]) -> ParseResult<Matches> {
        let (matches, _) = self.parse_tokens(argv, false)?;
        Ok(matches)
    }

    /// Parse, collecting unrecognized tokens instead of rejecting them.
    ///
    /// Leftovers are returned in encounter order. Required arguments are
    /// still enforced.
    pub fn try_parse_known(&self, argv: &[String]) -> ParseResult<(Matches, Vec<String>)> {
        self.parse_tokens(argv, true)
    }

    /// Parse strictly, exiting the process on failure.
    ///
    /// Help requests print to stdout and exit 0; everything else prints a
    /// usage line and the error to stderr and exits 2.
    pub fn parse(&self, argv: &[String]) -> Matches {
        match self.try_parse(argv) {
            Ok(matches) => matches,
            Err(err) => self.exit_with(err),
        }
    }

    /// Like [`Parser::parse`], but returns unrecognized tokens instead of
    /// rejecting them.
    pub fn parse_known(&self, argv: &[String]) -> (Matches, Vec<String>) {
        match self.try_parse_known(argv) {
            Ok(outcome) => outcome,
            Err(err) => self.exit_with(err),
        }
    }

    fn exit_with(&self, err: ParseError) -> ! {
        match err {
            ParseError::HelpRequested(text) => {
                print!("{text}");
                process::exit(0);
            }
            err => {
                eprintln!("{}", help::usage_line(self));
                eprintln!("{}: error: {}", self.prog, err.message());
                process::exit(2);
            }
        }
    }

    fn build_tables(&self) -> ParseResult<FlagTables> {
        let mut long: HashMap<String, FlagTarget> = HashMap::new();
        let mut short: HashMap<String, FlagTarget> = HashMap::new();
        let mut positionals: Vec<usize> = Vec::new();
        let mut dests: HashSet<&str> = HashSet::new();

        for (idx, arg) in self.args.iter().enumerate() {
            if !dests.insert(arg.dest.as_str()) {
                return Err(ParseError::Definition(format!(
                    "duplicate destination '{}'",
                    arg.dest
                )));
            }
            if arg.flags.is_empty() {
                return Err(ParseError::Definition(format!(
                    "argument '{}' declares no flags",
                    arg.dest
                )));
            }
            if arg.required && arg.default.is_some() {
                return Err(ParseError::Definition(format!(
                    "argument '{}' is both required and defaulted",
                    arg.dest
                )));
            }
            if matches!(arg.arity, Some(Arity::Count(0))) {
                return Err(ParseError::Definition(format!(
                    "argument '{}' declares a zero-value count",
                    arg.dest
                )));
            }
            if arg.switch.is_some()
                && (arg.converter.is_some() || arg.arity.is_some() || arg.choices.is_some())
            {
                return Err(ParseError::Definition(format!(
                    "switch argument '{}' cannot take values",
                    arg.dest
                )));
            }

            if arg.is_positional() {
                if arg.flags.len() != 1 {
                    return Err(ParseError::Definition(format!(
                        "positional argument '{}' must declare exactly one name",
                        arg.dest
                    )));
                }
                if arg.switch.is_some() {
                    return Err(ParseError::Definition(format!(
                        "positional argument '{}' cannot be a switch",
                        arg.dest
                    )));
                }
                positionals.push(idx);
                continue;
            }

            for flag in &arg.flags {
                if let Some(rest) = flag.strip_prefix("--") {
                    if rest.is_empty() {
                        return Err(ParseError::Definition(format!(
                            "invalid flag '{flag}' for '{}'",
                            arg.dest
                        )));
                    }
                    insert_flag(&mut long, flag.clone(), FlagTarget { idx, negated: false }, &self.args)?;
                    if matches!(arg.switch, Some(SwitchStyle::Paired)) {
                        insert_flag(
                            &mut long,
                            format!("--no-{rest}"),
                            FlagTarget { idx, negated: true },
                            &self.args,
                        )?;
                    }
                } else if let Some(rest) = flag.strip_prefix('-') {
                    if rest.chars().count() != 1 {
                        return Err(ParseError::Definition(format!(
                            "invalid short flag '{flag}' for '{}'",
                            arg.dest
                        )));
                    }
                    insert_flag(&mut short, flag.clone(), FlagTarget { idx, negated: false }, &self.args)?;
                } else {
                    return Err(ParseError::Definition(format!(
                        "argument '{}' mixes positional and flag names",
                        arg.dest
                    )));
                }
            }
        }

        let builtin_help = !long.contains_key("--help") && !short.contains_key("-h");
        Ok(FlagTables {
            long,
            short,
            positionals,
            builtin_help,
        })
    }

    fn parse_tokens(&self, argv: &[String], known_only: bool) -> ParseResult<(Matches, Vec<String>)> {
        let tables = self.build_tables()?;

        let mut m = Matches::default();
        for arg in &self.args {
            m.insert_slot(arg.dest.clone());
        }

        // (argv index, token) pairs so leftovers keep encounter order.
        let mut positionals: Vec<(usize, &str)> = Vec::new();
        let mut unknown: Vec<(usize, String)> = Vec::new();
        let mut parse_error: Option<ParseError> = None;
        let mut help_requested = false;

        let mut i = 0usize;
        let mut after_separator = false;
        while i < argv.len() {
            let token = argv[i].as_str();

            if !after_separator && token == "--" {
                after_separator = true;
                i += 1;
                continue;
            }

            if !after_separator && token.starts_with("--") {
                // --key=value
                if let Some((flag, attached)) = token.split_once('=') {
                    if let Some(&target) = tables.long.get(flag) {
                        let arg = &self.args[target.idx];
                        if arg.switch.is_some() {
                            record_error(
                                &mut parse_error,
                                format!("flag does not take a value: {flag}"),
                            );
                        } else {
                            match capture_attached(arg, flag, attached) {
                                Ok(value) => m.set_explicit(&arg.dest, value),
                                Err(msg) => record_error(&mut parse_error, msg),
                            }
                        }
                    } else if tables.builtin_help && flag == "--help" {
                        record_error(
                            &mut parse_error,
                            format!("flag does not take a value: {flag}"),
                        );
                    } else {
                        unknown.push((i, token.to_string()));
                    }
                    i += 1;
                    continue;
                }

                if let Some(&target) = tables.long.get(token) {
                    let arg = &self.args[target.idx];
                    if let Some(style) = arg.switch {
                        m.set_explicit(&arg.dest, Value::Bool(switch_value(style, target.negated)));
                        i += 1;
                    } else {
                        match capture_following(arg, token, argv, i + 1) {
                            Ok((value, consumed)) => {
                                m.set_explicit(&arg.dest, value);
                                i += 1 + consumed;
                            }
                            Err(msg) => {
                                record_error(&mut parse_error, msg);
                                i += 1;
                            }
                        }
                    }
                    continue;
                }

                if tables.builtin_help && token == "--help" {
                    help_requested = true;
                    i += 1;
                    continue;
                }

                unknown.push((i, token.to_string()));
                i += 1;
                continue;
            }

            if !after_separator && token.starts_with('-') && token != "-" {
                if !token.is_ascii() {
                    unknown.push((i, token.to_string()));
                    i += 1;
                    continue;
                }

                // Pre-scan the cluster; an unknown leading switch makes the
                // whole token unrecognized rather than partially applied.
                let bytes = token.as_bytes();
                let mut valid = true;
                let mut k = 1usize;
                while k < bytes.len() {
                    let c = bytes[k] as char;
                    let flag = format!("-{c}");
                    if let Some(&target) = tables.short.get(&flag) {
                        if self.args[target.idx].switch.is_none() {
                            break;
                        }
                        k += 1;
                    } else if tables.builtin_help && c == 'h' {
                        k += 1;
                    } else {
                        valid = false;
                        break;
                    }
                }
                if !valid {
                    unknown.push((i, token.to_string()));
                    i += 1;
                    continue;
                }

                let mut k = 1usize;
                let mut consumed_extra = 0usize;
                while k < bytes.len() {
                    let c = bytes[k] as char;
                    let flag = format!("-{c}");
                    if let Some(&target) = tables.short.get(&flag) {
                        let arg = &self.args[target.idx];
                        if let Some(style) = arg.switch {
                            m.set_explicit(
                                &arg.dest,
                                Value::Bool(switch_value(style, target.negated)),
                            );
                            k += 1;
                            continue;
                        }
                        let rest = &token[k + 1..];
                        if rest.is_empty() {
                            match capture_following(arg, &flag, argv, i + 1) {
                                Ok((value, consumed)) => {
                                    m.set_explicit(&arg.dest, value);
                                    consumed_extra = consumed;
                                }
                                Err(msg) => record_error(&mut parse_error, msg),
                            }
                        } else {
                            match capture_attached(arg, &flag, rest) {
                                Ok(value) => m.set_explicit(&arg.dest, value),
                                Err(msg) => record_error(&mut parse_error, msg),
                            }
                        }
                        break;
                    }
                    // Builtin help inside a cluster.
                    help_requested = true;
                    k += 1;
                }

                i += 1 + consumed_extra;
                continue;
            }

            positionals.push((i, token));
            i += 1;
        }

        // Assign positional tokens to positional defs in declaration order.
        // A greedy positional takes everything that remains.
        let mut cursor = 0usize;
        let mut missing_positional: HashSet<usize> = HashSet::new();
        for &idx in &tables.positionals {
            let arg = &self.args[idx];
            let available = positionals.len() - cursor;
            match arg.arity {
                None => {
                    if available >= 1 {
                        match convert_one(arg, arg.display_name(), positionals[cursor].1) {
                            Ok(value) => m.set_explicit(&arg.dest, value),
                            Err(msg) => record_error(&mut parse_error, msg),
                        }
                        cursor += 1;
                    } else {
                        missing_positional.insert(idx);
                    }
                }
                Some(Arity::Count(n)) => {
                    if available >= n {
                        let mut items = Vec::with_capacity(n);
                        let mut ok = true;
                        for j in 0..n {
                            match convert_one(arg, arg.display_name(), positionals[cursor + j].1) {
                                Ok(value) => items.push(value),
                                Err(msg) => {
                                    record_error(&mut parse_error, msg);
                                    ok = false;
                                    break;
                                }
                            }
                        }
                        cursor += n;
                        if ok {
                            m.set_explicit(&arg.dest, Value::List(items));
                        }
                    } else {
                        cursor = positionals.len();
                        missing_positional.insert(idx);
                    }
                }
                Some(Arity::OneOrMore) | Some(Arity::ZeroOrMore) => {
                    if available == 0 {
                        if matches!(arg.arity, Some(Arity::OneOrMore)) {
                            missing_positional.insert(idx);
                        } else if arg.default.is_none() {
                            m.set(&arg.dest, Value::List(Vec::new()));
                        }
                    } else {
                        let mut items = Vec::with_capacity(available);
                        let mut ok = true;
                        for j in 0..available {
                            match convert_one(arg, arg.display_name(), positionals[cursor + j].1) {
                                Ok(value) => items.push(value),
                                Err(msg) => {
                                    record_error(&mut parse_error, msg);
                                    ok = false;
                                    break;
                                }
                            }
                        }
                        cursor = positionals.len();
                        if ok {
                            m.set_explicit(&arg.dest, Value::List(items));
                        }
                    }
                }
            }
        }

        // Apply defaults to anything still unset. Slots without a default
        // keep the no-value sentinel.
        for arg in &self.args {
            if !m.is_set(&arg.dest) {
                if let Some(default) = &arg.default {
                    m.set(&arg.dest, default.clone());
                }
            }
        }

        if help_requested {
            return Err(ParseError::HelpRequested(self.format_help()));
        }

        if let Some(err) = parse_error {
            return Err(err);
        }

        // Required checks, in definition order.
        let mut missing: Vec<String> = Vec::new();
        for (idx, arg) in self.args.iter().enumerate() {
            if arg.is_positional() {
                if missing_positional.contains(&idx) {
                    missing.push(format!("<{}>", help::value_label(arg)));
                }
            } else if arg.required && !m.is_set(&arg.dest) {
                let mut s = arg.display_name().to_string();
                if arg.takes_value() {
                    s.push(' ');
                    s.push('<');
                    s.push_str(&help::value_label(arg));
                    s.push('>');
                }
                missing.push(s);
            }
        }
        if !missing.is_empty() {
            if missing.len() == 1 {
                return Err(ParseError::InvalidArgs(format!(
                    "missing required argument: {}",
                    missing[0]
                )));
            }
            return Err(ParseError::InvalidArgs(format!(
                "missing required arguments: {}",
                missing.join(", ")
            )));
        }

        let mut leftovers: Vec<(usize, String)> = unknown;
        leftovers.extend(
            positionals[cursor..]
                .iter()
                .map(|(pos, token)| (*pos, token.to_string())),
        );
        leftovers.sort_by_key(|(pos, _)| *pos);
        let leftovers: Vec<String> = leftovers.into_iter().map(|(_, token)| token).collect();

        if !known_only && !leftovers.is_empty() {
            return Err(ParseError::InvalidArgs(format!(
                "unrecognized arguments: {}",
                leftovers.join(" ")
            )));
        }

        Ok((m, leftovers))
    }
}

fn insert_flag(
    map: &mut HashMap<String, FlagTarget>,
    flag: String,
    target: FlagTarget,
    args: &[Arg],
) -> ParseResult<()> {
    if let Some(prev) = map.insert(flag.clone(), target) {
        if prev.idx != target.idx {
            return Err(ParseError::Definition(format!(
                "argument definition conflict: {flag} maps to both '{}' and '{}'",
                args[prev.idx].dest, args[target.idx].dest
            )));
        }
    }
    Ok(())
}

fn record_error(slot: &mut Option<ParseError>, msg: String) {
    if slot.is_none() {
        *slot = Some(ParseError::InvalidArgs(msg));
    }
}

fn switch_value(style: SwitchStyle, negated: bool) -> bool {
    match style {
        SwitchStyle::SetTrue => true,
        SwitchStyle::SetFalse => false,
        SwitchStyle::Paired => !negated,
    }
}

fn convert_one(arg: &Arg, display: &str, raw: &str) -> Result<Value, String> {
    let value = match &arg.converter {
        Some(converter) => converter
            .convert(raw)
            .map_err(|err| format!("invalid value '{raw}' for '{display}': {err}"))?,
        None => Value::Str(raw.to_string()),
    };
    if let Some(choices) = &arg.choices {
        if !choices.contains(&value) {
            return Err(format!(
                "invalid value '{raw}' for '{display}'. possible values: {}",
                choices
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
    }
    Ok(value)
}

/// Capture for the `--flag=value` and `-fvalue` forms: the attached text is
/// the entire capture.
fn capture_attached(arg: &Arg, display: &str, attached: &str) -> Result<Value, String> {
    match arg.arity {
        None => convert_one(arg, display, attached),
        Some(Arity::Count(n)) if n != 1 => {
            Err(format!("expected {n} values for {display}, got 1"))
        }
        Some(_) => Ok(Value::List(vec![convert_one(arg, display, attached)?])),
    }
}

/// Capture from the tokens following a flag.
///
/// Scalar captures take the next token unconditionally, so `-` and values
/// resembling flags still work. Multi-value captures stop at flag-like
/// tokens; use `--` or the attached form for values starting with `-`.
fn capture_following(
    arg: &Arg,
    display: &str,
    argv: &[String],
    start: usize,
) -> Result<(Value, usize), String> {
    match arg.arity {
        None => {
            let Some(raw) = argv.get(start) else {
                return Err(format!("missing value for {display}"));
            };
            let value = convert_one(arg, display, raw)?;
            Ok((value, 1))
        }
        Some(Arity::Count(n)) => {
            let mut items = Vec::with_capacity(n);
            let mut consumed = 0usize;
            while items.len() < n {
                let Some(raw) = argv.get(start + consumed) else {
                    break;
                };
                if looks_like_flag(raw) {
                    break;
                }
                items.push(convert_one(arg, display, raw)?);
                consumed += 1;
            }
            if items.len() != n {
                return Err(format!(
                    "expected {n} value{} for {display}, got {}",
                    if n == 1 { "" } else { "s" },
                    items.len()
                ));
            }
            Ok((Value::List(items), consumed))
        }
        Some(Arity::OneOrMore) | Some(Arity::ZeroOrMore) => {
            let mut items = Vec::new();
            let mut consumed = 0usize;
            while let Some(raw) = argv.get(start + consumed) {
                if looks_like_flag(raw) {
                    break;
                }
                items.push(convert_one(arg, display, raw)?);
                consumed += 1;
            }
            if matches!(arg.arity, Some(Arity::OneOrMore)) && items.is_empty() {
                return Err(format!("expected at least one value for {display}"));
            }
            Ok((Value::List(items), consumed))
        }
    }
}

fn looks_like_flag(token: &str) -> bool {
    token != "-" && token.starts_with('-')
}
