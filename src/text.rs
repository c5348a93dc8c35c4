//! Small string helpers.

/// Left-pad `s` with zeros to at least `extra + 1` characters; longer input
/// is returned as is. `("1", 1)` → `"01"`, `("1", 2)` → `"001"`.
pub fn add_zero_prefix(s: &str, extra: usize) -> String {
    let width = extra + 1;
    format!("{s:0>width$}")
}

/// `s` repeated `n` times with `sep` between copies.
pub fn repeat_with_separator(s: &str, n: usize, sep: &str) -> String {
    vec![s; n].join(sep)
}

/// Uppercase the first character (Unicode-aware), leave the rest untouched.
pub fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// SQL `VALUES` tuple: `("one", "two")`. A `quote` inside a value is doubled.
pub fn sql_values_string<S: AsRef<str>>(values: &[S], quote: char) -> String {
    let doubled = format!("{quote}{quote}");
    let items = values
        .iter()
        .map(|v| format!("{quote}{}{quote}", v.as_ref().replace(quote, &doubled)))
        .collect::<Vec<_>>();
    format!("({})", items.join(", "))
}
