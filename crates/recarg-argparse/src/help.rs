use std::collections::HashSet;

use crate::parser::{Arg, Arity, Parser, SwitchStyle};

pub(crate) fn value_label(arg: &Arg) -> String {
    arg.value_name
        .clone()
        .unwrap_or_else(|| arg.dest.to_ascii_uppercase())
}

pub(crate) fn usage_line(parser: &Parser) -> String {
    let mut out = format!("Usage: {}", parser.prog);
    let has_options =
        parser.args.iter().any(|a| !a.is_positional()) || builtin_help_enabled(parser);
    if has_options {
        out.push_str(" [OPTIONS]");
    }
    for arg in parser.args.iter().filter(|a| a.is_positional()) {
        let label = value_label(arg);
        match arg.arity {
            None => out.push_str(&format!(" <{label}>")),
            Some(Arity::Count(n)) => {
                for _ in 0..n {
                    out.push_str(&format!(" <{label}>"));
                }
            }
            Some(Arity::OneOrMore) => out.push_str(&format!(" <{label}>...")),
            Some(Arity::ZeroOrMore) => out.push_str(&format!(" [{label}...]")),
        }
    }
    out
}

/// Render the full help text: header, usage, ungrouped sections, then one
/// section per group in registration order.
pub(crate) fn render(parser: &Parser) -> String {
    let mut out = String::new();
    match &parser.about {
        Some(about) if !about.trim().is_empty() => {
            out.push_str(&format!("{} - {}\n", parser.prog, about.trim()));
        }
        _ => {
            out.push_str(&parser.prog);
            out.push('\n');
        }
    }
    out.push_str(&format!("\n{}\n", usage_line(parser)));

    let grouped: HashSet<usize> = parser
        .groups
        .iter()
        .flat_map(|g| g.members.iter().copied())
        .collect();

    let positionals: Vec<&Arg> = parser
        .args
        .iter()
        .enumerate()
        .filter(|(idx, a)| !grouped.contains(idx) && a.is_positional())
        .map(|(_, a)| a)
        .collect();
    let options: Vec<&Arg> = parser
        .args
        .iter()
        .enumerate()
        .filter(|(idx, a)| !grouped.contains(idx) && !a.is_positional())
        .map(|(_, a)| a)
        .collect();

    if !positionals.is_empty() {
        out.push_str("\nArguments:\n");
        let rows: Vec<(String, String)> = positionals
            .iter()
            .map(|a| (format_left(a), format_help_text(a)))
            .collect();
        push_rows(&mut out, rows);
    }

    let mut rows: Vec<(String, String)> = options
        .iter()
        .map(|a| (format_left(a), format_help_text(a)))
        .collect();
    if builtin_help_enabled(parser) {
        rows.push(("-h, --help".to_string(), "Show help information".to_string()));
    }
    if !rows.is_empty() {
        out.push_str("\nOptions:\n");
        push_rows(&mut out, rows);
    }

    for group in &parser.groups {
        if group.members.is_empty() {
            continue;
        }
        out.push('\n');
        if let Some(title) = &group.title {
            out.push_str(&format!("{title}:\n"));
        }
        if let Some(description) = &group.description {
            if !description.trim().is_empty() {
                out.push_str(&format!("  {}\n", description.trim()));
            }
        }
        let rows: Vec<(String, String)> = group
            .members
            .iter()
            .map(|&idx| {
                let a = &parser.args[idx];
                (format_left(a), format_help_text(a))
            })
            .collect();
        push_rows(&mut out, rows);
    }

    out
}

fn builtin_help_enabled(parser: &Parser) -> bool {
    !parser
        .args
        .iter()
        .any(|a| a.flags.iter().any(|f| f == "-h" || f == "--help"))
}

fn push_rows(out: &mut String, rows: Vec<(String, String)>) {
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (left, help) in rows {
        if help.is_empty() {
            out.push_str(&format!("  {left}\n"));
        } else {
            out.push_str(&format!("  {left:width$}  {help}\n"));
        }
    }
}

fn format_left(arg: &Arg) -> String {
    if arg.is_positional() {
        let label = value_label(arg);
        return match arg.arity {
            None => format!("<{label}>"),
            Some(Arity::Count(n)) => {
                let one = format!("<{label}>");
                vec![one; n].join(" ")
            }
            Some(Arity::OneOrMore) => format!("<{label}>..."),
            Some(Arity::ZeroOrMore) => format!("[{label}...]"),
        };
    }

    let mut names: Vec<String> = Vec::new();
    for flag in &arg.flags {
        names.push(flag.clone());
        if matches!(arg.switch, Some(SwitchStyle::Paired)) {
            if let Some(rest) = flag.strip_prefix("--") {
                names.push(format!("--no-{rest}"));
            }
        }
    }
    let mut out = names.join(", ");
    if arg.takes_value() {
        let token = value_token(arg);
        match arg.arity {
            None => out.push_str(&format!(" {token}")),
            Some(Arity::Count(n)) => {
                for _ in 0..n {
                    out.push_str(&format!(" {token}"));
                }
            }
            Some(Arity::OneOrMore) => out.push_str(&format!(" {token}...")),
            Some(Arity::ZeroOrMore) => out.push_str(&format!(" [{token}...]")),
        }
    }
    out
}

fn value_token(arg: &Arg) -> String {
    if arg.value_name.is_none() {
        if let Some(choices) = &arg.choices {
            let joined = choices
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return format!("{{{joined}}}");
        }
    }
    format!("<{}>", value_label(arg))
}

fn format_help_text(arg: &Arg) -> String {
    let mut out = arg.help.as_deref().unwrap_or("").trim().to_string();
    if arg.required && !arg.is_positional() {
        if out.is_empty() {
            out.push_str("required");
        } else {
            out.push_str(" (required)");
        }
    }
    if arg.takes_value() {
        if let Some(default) = &arg.default {
            if !default.is_null() {
                if out.is_empty() {
                    out.push_str(&format!("[default: {default}]"));
                } else {
                    out.push_str(&format!(" [default: {default}]"));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Converter, ValueKind};

    #[test]
    fn help_renders_sections_and_builtin() {
        let mut parser = Parser::new("show");
        parser.about("Show a file");
        parser
            .arg(Arg::new("file").flag("file").value_name("FILE").help("File to show"))
            .arg(
                Arg::new("verbose")
                    .flag("-v")
                    .flag("--verbose")
                    .switch(SwitchStyle::SetTrue)
                    .default(false)
                    .help("Verbose output"),
            );

        let text = parser.format_help();
        assert!(text.starts_with("show - Show a file\n"));
        assert!(text.contains("Usage: show [OPTIONS] <FILE>"));
        assert!(text.contains("Arguments:"));
        assert!(text.contains("<FILE>"));
        assert!(text.contains("Options:"));
        assert!(text.contains("-v, --verbose"));
        assert!(text.contains("-h, --help"));
    }

    #[test]
    fn grouped_arguments_render_under_their_section() {
        let mut parser = Parser::new("cmd");
        let group = parser.group(Some("Connection"), Some("How to reach the server"));
        parser.arg_in_group(group, Arg::new("host").flag("--host").default("localhost"));
        parser.arg_in_group(group, Arg::new("port").flag("--port").default(8080));
        parser.arg(Arg::new("verbose").flag("--verbose").switch(SwitchStyle::SetTrue).default(false));

        let text = parser.format_help();
        assert!(text.contains("Connection:\n"));
        assert!(text.contains("How to reach the server"));
        let connection_at = text.find("Connection:").unwrap();
        let host_at = text.find("--host").unwrap();
        let port_at = text.find("--port").unwrap();
        assert!(connection_at < host_at && host_at < port_at);
        // Grouped args do not repeat in the ungrouped options section.
        let options_at = text.find("Options:").unwrap();
        assert!(host_at > options_at);
    }

    #[test]
    fn anonymous_groups_render_without_title() {
        let mut parser = Parser::new("cmd");
        let first = parser.group(None, None);
        let second = parser.group(None, None);
        parser.arg_in_group(first, Arg::new("a").flag("--a").default(1));
        parser.arg_in_group(second, Arg::new("b").flag("--b").default(2));

        let text = parser.format_help();
        assert!(text.contains("--a"));
        assert!(text.contains("--b"));
        assert!(!text.contains(":\n  --a"));
    }

    #[test]
    fn choices_render_as_value_token() {
        let mut parser = Parser::new("cmd");
        parser.arg(
            Arg::new("level")
                .flag("--level")
                .converter(Converter::for_kind(ValueKind::Int).unwrap())
                .choices([1, 2, 3])
                .default(1),
        );

        let text = parser.format_help();
        assert!(text.contains("--level {1, 2, 3}"));
        assert!(text.contains("[default: 1]"));
    }

    #[test]
    fn required_and_default_annotations() {
        let mut parser = Parser::new("cmd");
        parser
            .arg(Arg::new("input").flag("--input").required(true).help("Input path"))
            .arg(Arg::new("format").flag("--format").default("plain").help("Output format"));

        let text = parser.format_help();
        assert!(text.contains("Input path (required)"));
        assert!(text.contains("Output format [default: plain]"));
    }

    #[test]
    fn paired_switch_shows_both_spellings() {
        let mut parser = Parser::new("cmd");
        parser.arg(
            Arg::new("color")
                .flag("--color")
                .switch(SwitchStyle::Paired)
                .required(true),
        );

        let text = parser.format_help();
        assert!(text.contains("--color, --no-color"));
    }
}
