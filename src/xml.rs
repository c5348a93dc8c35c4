//! Flat records → XML document.
//!
//! Each record becomes `<item{i}>` with one child element per field, the
//! field key used verbatim as the tag name. Keys are assumed to already be
//! valid XML names; only text content is escaped.
use thiserror::Error;

use crate::node::Node;

const XML_DECL: &str = "<?xml version=\"1.0\"?>\n";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidRecordError {
    #[error("record {index} is not a mapping")]
    NotAMapping { index: usize },
    #[error("record {index}: field `{key}` is not a scalar")]
    NestedValue { index: usize, key: String },
}

/// Fails on the first element that is not a flat scalar-valued mapping.
pub fn encode_xml(records: &[Node]) -> Result<String, InvalidRecordError> {
    let mut out = String::from(XML_DECL);
    out.push_str("<data value=\"\">");
    for (index, record) in records.iter().enumerate() {
        let map = record
            .as_mapping()
            .ok_or(InvalidRecordError::NotAMapping { index })?;
        out.push_str(&format!("<item{index}>"));
        for (key, value) in map {
            let scalar = value
                .as_scalar()
                .ok_or_else(|| InvalidRecordError::NestedValue { index, key: key.clone() })?;
            out.push('<');
            out.push_str(key);
            out.push('>');
            push_escaped(&scalar.to_text(), &mut out);
            out.push_str("</");
            out.push_str(key);
            out.push('>');
        }
        out.push_str(&format!("</item{index}>"));
    }
    out.push_str("</data>\n");
    Ok(out)
}

fn push_escaped(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}
