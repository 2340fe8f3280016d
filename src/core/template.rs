//! Runtime printf-style message templates
//!
//! Templates are plain strings known only at runtime, so the substitution
//! happens here rather than through `format!`. Supported verbs:
//!
//! | verb        | accepts                    |
//! |-------------|----------------------------|
//! | `%s` `%v`   | any value (display form)   |
//! | `%d`        | signed/unsigned integers   |
//! | `%f` `%.Nf` | floats (precision 6 default) |
//! | `%t`        | booleans                   |
//! | `%q`        | strings, quoted            |
//! | `%%`        | literal percent            |
//!
//! Optional `-` flag and a width are honored for padding. Mismatches are
//! rendered inline and never panic:
//!
//! ```
//! use request_logger::core::template::sprintf;
//! use request_logger::FieldValue;
//!
//! assert_eq!(sprintf("%s and %s", &["a".into()]), "a and %!s(MISSING)");
//! assert_eq!(sprintf("%d", &["abc".into()]), "%!d(string=abc)");
//! assert_eq!(sprintf("done", &[FieldValue::Int(1)]), "done%!(EXTRA int64=1)");
//! ```

use super::field::FieldValue;
use std::iter::Peekable;
use std::str::Chars;

const DEFAULT_FLOAT_PRECISION: usize = 6;

#[derive(Debug, Default)]
struct Directive {
    left_align: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Substitute `args` into `template` positionally.
pub fn sprintf(template: &str, args: &[FieldValue]) -> String {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let directive = parse_directive(&mut chars);
        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };

        if verb == '%' {
            out.push('%');
            continue;
        }

        match args.get(next_arg) {
            Some(arg) => {
                next_arg += 1;
                match render(verb, &directive, arg) {
                    Some(rendered) => out.push_str(&pad(rendered, &directive)),
                    None => out.push_str(&bad_verb(verb, arg)),
                }
            }
            None => {
                out.push_str("%!");
                out.push(verb);
                out.push_str("(MISSING)");
            }
        }
    }

    if next_arg < args.len() {
        let extra = args[next_arg..]
            .iter()
            .map(|arg| format!("{}={}", arg.type_name(), arg))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str("%!(EXTRA ");
        out.push_str(&extra);
        out.push(')');
    }

    out
}

fn parse_directive(chars: &mut Peekable<Chars<'_>>) -> Directive {
    let mut directive = Directive::default();

    while let Some(&flag) = chars.peek() {
        match flag {
            '-' => directive.left_align = true,
            '+' | '#' | ' ' | '0' => {}
            _ => break,
        }
        chars.next();
    }

    directive.width = parse_number(chars);

    if chars.peek() == Some(&'.') {
        chars.next();
        directive.precision = Some(parse_number(chars).unwrap_or(0));
    }

    directive
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
    }
    value
}

fn render(verb: char, directive: &Directive, arg: &FieldValue) -> Option<String> {
    match (verb, arg) {
        ('v', value) => Some(value.to_string()),
        ('s', FieldValue::Null) => None,
        ('s', value) => Some(value.to_string()),
        ('d', FieldValue::Int(i)) => Some(i.to_string()),
        ('d', FieldValue::Uint(u)) => Some(u.to_string()),
        ('f' | 'F', FieldValue::Float(f)) => Some(format!(
            "{:.*}",
            directive.precision.unwrap_or(DEFAULT_FLOAT_PRECISION),
            f
        )),
        ('t', FieldValue::Bool(b)) => Some(b.to_string()),
        ('q', FieldValue::String(s)) => Some(format!("{:?}", s)),
        _ => None,
    }
}

fn pad(rendered: String, directive: &Directive) -> String {
    match directive.width {
        Some(width) if rendered.chars().count() < width => {
            if directive.left_align {
                format!("{:<width$}", rendered, width = width)
            } else {
                format!("{:>width$}", rendered, width = width)
            }
        }
        _ => rendered,
    }
}

fn bad_verb(verb: char, arg: &FieldValue) -> String {
    match arg {
        FieldValue::Null => format!("%!{}(<nil>)", verb),
        other => format!("%!{}({}={})", verb, other.type_name(), other),
    }
}
