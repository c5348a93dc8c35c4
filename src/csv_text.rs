//! CSV / TSV text helpers.
//!
//! Parsing is forgiving: outside quoted fields every line is trimmed and
//! blank lines are skipped, and a quoted field may be preceded by whitespace
//! (`"Richard", "Roe"`). Quoted text is kept verbatim, commas, padding and
//! line breaks included. Numeric-looking fields become numbers.
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::node::Scalar;

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("static regex")
});

/// Parse comma-separated text into rows of scalars.
///
/// With `header`, the first row is dropped. Blank input yields a single row
/// holding one empty string, the same shape as a single empty line.
pub fn parse_csv(text: &str, header: bool) -> Vec<Vec<Scalar>> {
    let rows = read_rows(text, b',', true);
    let mut rows: Vec<Vec<Scalar>> = rows
        .into_iter()
        .map(|row| row.into_iter().map(|field| coerce(&field)).collect())
        .collect();
    if rows.is_empty() {
        rows.push(vec![Scalar::Str(String::new())]);
    }
    if header {
        rows.remove(0);
    }
    rows
}

/// Tab-separated text into rows of strings; no quoting, no coercion.
pub fn parse_tab_delimited(text: &str) -> Vec<Vec<String>> {
    read_rows(text, b'\t', false)
}

fn read_rows(text: &str, delimiter: u8, quoting: bool) -> Vec<Vec<String>> {
    let cleaned = tidy(text, delimiter, quoting);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quoting(quoting)
        .from_reader(cleaned.as_bytes());

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        match record {
            Ok(record) => rows.push(record.iter().map(str::to_string).collect()),
            // reading from an in-memory buffer only fails on invalid UTF-8, which &str rules out
            Err(error) => warn!(line, %error, "skipping unreadable csv row"),
        }
    }
    rows
}

/// Rewrite `text` into plain csv the reader understands: outside quoted
/// fields every line is trimmed and blank lines are dropped, and blanks
/// between a delimiter and an opening quote are removed (` "Roe"`). Text
/// inside quotes, line breaks included, is left untouched.
fn tidy(text: &str, delimiter: u8, quoting: bool) -> String {
    let delimiter = char::from(delimiter);
    let is_blank = |c: char| c != delimiter && (c == ' ' || c == '\t');

    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;
    for raw in text.lines() {
        let line = if in_quotes {
            out.push('\n');
            raw
        } else {
            let line = raw.trim_start();
            if line.trim_end().is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            line
        };

        let mut field_start = !in_quotes;
        let mut rest = line;
        loop {
            if quoting && field_start {
                let unpadded = rest.trim_start_matches(is_blank);
                if unpadded.starts_with('"') {
                    rest = unpadded;
                }
            }
            let Some(c) = rest.chars().next() else {
                break;
            };
            rest = &rest[c.len_utf8()..];
            field_start = false;
            // a doubled quote inside a quoted field toggles twice and stays quoted
            if quoting && c == '"' {
                in_quotes = !in_quotes;
            } else if c == delimiter && !in_quotes {
                field_start = true;
            }
            out.push(c);
        }

        if !in_quotes {
            let kept = out.trim_end().len();
            out.truncate(kept);
        }
    }
    out
}

fn coerce(field: &str) -> Scalar {
    if !NUMERIC.is_match(field) {
        return Scalar::Str(field.to_string());
    }
    if let Ok(i) = field.parse::<i64>() {
        return Scalar::Int(i);
    }
    match field.parse::<f64>() {
        Ok(f) => Scalar::Float(f),
        Err(_) => Scalar::Str(field.to_string()),
    }
}

/// Write rows as CSV, creating parent directories as needed.
pub fn write_csv_file(path: impl AsRef<Path>, rows: &[Vec<Scalar>]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let mut writer = WriterBuilder::new().flexible(true).from_path(path)?;
    for row in rows {
        writer.write_record(row.iter().map(Scalar::to_text))?;
    }
    writer.flush().map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), rows = rows.len(), "wrote csv file");
    Ok(())
}

/// Boolean form of [`write_csv_file`].
pub fn put_rows_to_csv_file(path: impl AsRef<Path>, rows: &[Vec<Scalar>]) -> bool {
    match write_csv_file(path, rows) {
        Ok(()) => true,
        Err(error) => {
            warn!(%error, "csv write failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(x: &str) -> Scalar {
        Scalar::Str(x.to_string())
    }

    #[test]
    fn blank_and_single_values() {
        assert_eq!(parse_csv("", false), vec![vec![s("")]]);
        assert_eq!(parse_csv("1", false), vec![vec![Scalar::Int(1)]]);
        assert_eq!(parse_csv("123", false), vec![vec![Scalar::Int(123)]]);
        assert_eq!(parse_csv("1.5,-2,abc", false), vec![vec![Scalar::Float(1.5), Scalar::Int(-2), s("abc")]]);
        assert!(parse_csv("", true).is_empty());
    }

    #[test]
    fn indented_text_with_late_quotes() {
        let text = "
                First name,Last name
                John,Doe
                \"Richard\", \"Roe\"
            ";
        assert_eq!(
            parse_csv(text, false),
            vec![
                vec![s("First name"), s("Last name")],
                vec![s("John"), s("Doe")],
                vec![s("Richard"), s("Roe")],
            ]
        );
        assert_eq!(
            parse_csv(text, true),
            vec![vec![s("John"), s("Doe")], vec![s("Richard"), s("Roe")]]
        );
    }

    #[test]
    fn quoted_commas_and_escaped_quotes() {
        let rows = parse_csv("\"a, b\",\"say \"\"hi\"\"\"", false);
        assert_eq!(rows, vec![vec![s("a, b"), s("say \"hi\"")]]);
    }

    #[test]
    fn padded_quoted_field_keeps_its_commas() {
        assert_eq!(parse_csv("a, \"b, c\"", false), vec![vec![s("a"), s("b, c")]]);
        assert_eq!(parse_csv("x,\t\"1\",y", false), vec![vec![s("x"), Scalar::Int(1), s("y")]]);
    }

    #[test]
    fn whitespace_inside_quotes_is_kept() {
        assert_eq!(parse_csv("\"  x  \",y", false), vec![vec![s("  x  "), s("y")]]);
    }

    #[test]
    fn quoted_field_may_span_lines() {
        let text = "id,note\n  1, \"first line\n  second line\"\n\n2,plain\n";
        assert_eq!(
            parse_csv(text, true),
            vec![
                vec![Scalar::Int(1), s("first line\n  second line")],
                vec![Scalar::Int(2), s("plain")],
            ]
        );
    }

    #[test]
    fn rows_may_differ_in_width() {
        let rows = parse_csv("a,b,c\nd", false);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1], vec![s("d")]);
    }

    #[test]
    fn tab_delimited() {
        assert_eq!(
            parse_tab_delimited("a\tb\tc\nd\tf\tg"),
            vec![vec!["a", "b", "c"], vec!["d", "f", "g"]]
        );
    }

    #[test]
    fn numeric_detection() {
        assert_eq!(coerce("007"), Scalar::Int(7));
        assert_eq!(coerce("1e3"), Scalar::Float(1000.0));
        assert_eq!(coerce(".5"), Scalar::Float(0.5));
        assert_eq!(coerce("1.2.3"), s("1.2.3"));
        assert_eq!(coerce("99999999999999999999"), Scalar::Float(1e20));
    }
}
