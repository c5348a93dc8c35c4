//! Pretty, source-literal rendering of a `Node` tree.
//!
//! Two bracket styles share one writer:
//!
//! ```text
//! Classic            Bracketed
//! array (            [
//!   'a' => 1,          'a' => 1,
//!   'b' => array (     'b' => [
//!     'c' => 3,          'c' => 3,
//!   ),                 ],
//! )                  ]
//! ```
//!
//! Output depends only on the input's order, never on hashing.
use crate::node::{Mapping, Node, Scalar};

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportStyle {
    #[default]
    Classic,
    Bracketed,
}

impl ExportStyle {
    fn open(self) -> &'static str {
        match self {
            ExportStyle::Classic => "array (",
            ExportStyle::Bracketed => "[",
        }
    }

    fn close(self) -> &'static str {
        match self {
            ExportStyle::Classic => ")",
            ExportStyle::Bracketed => "]",
        }
    }
}

pub fn export_pretty(node: &Node, style: ExportStyle) -> String {
    let mut out = String::new();
    write_node(node, 0, style, &mut out);
    out
}

fn write_node(node: &Node, indent: usize, style: ExportStyle, out: &mut String) {
    match node {
        Node::Scalar(s) => write_scalar(s, out),
        Node::Mapping(map) => write_mapping(map, indent, style, out),
        Node::Sequence(items) => write_sequence(items, indent, style, out),
    }
}

fn write_mapping(map: &Mapping, indent: usize, style: ExportStyle, out: &mut String) {
    out.push_str(style.open());
    out.push('\n');
    for (key, value) in map {
        push_indent(indent + 1, out);
        push_quoted(key, out);
        out.push_str(" => ");
        write_node(value, indent + 1, style, out);
        out.push_str(",\n");
    }
    push_indent(indent, out);
    out.push_str(style.close());
}

// list keys are positions, rendered bare
fn write_sequence(items: &[Node], indent: usize, style: ExportStyle, out: &mut String) {
    out.push_str(style.open());
    out.push('\n');
    for (idx, value) in items.iter().enumerate() {
        push_indent(indent + 1, out);
        out.push_str(&idx.to_string());
        out.push_str(" => ");
        write_node(value, indent + 1, style, out);
        out.push_str(",\n");
    }
    push_indent(indent, out);
    out.push_str(style.close());
}

fn write_scalar(scalar: &Scalar, out: &mut String) {
    match scalar {
        Scalar::Null => out.push_str("NULL"),
        Scalar::Bool(true) => out.push_str("true"),
        Scalar::Bool(false) => out.push_str("false"),
        Scalar::Int(i) => out.push_str(&i.to_string()),
        Scalar::Float(f) => out.push_str(&float_literal(*f)),
        Scalar::Str(s) => push_quoted(s, out),
    }
}

/// Shortest round-trip form that still reads as a float: `1.0`, `0.5`,
/// `1.0E+25`, `2.5E-8`.
fn float_literal(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF".to_string() } else { "-INF".to_string() };
    }
    // Debug keeps a `.0` on whole numbers and switches to `e` notation at the extremes
    let debug = format!("{f:?}");
    match debug.split_once('e') {
        None => debug,
        Some((mantissa, exp)) => {
            let mantissa = if mantissa.contains('.') {
                mantissa.to_string()
            } else {
                format!("{mantissa}.0")
            };
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}E{sign}{digits}")
        }
    }
}

fn push_quoted(text: &str, out: &mut String) {
    out.push('\'');
    for ch in text.chars() {
        if ch == '\\' || ch == '\'' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('\'');
}

fn push_indent(level: usize, out: &mut String) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}
