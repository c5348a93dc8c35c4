//! Stateless helpers for nested key/value data: key decoration, pretty
//! structural export, records → XML, record deduplication, plus CSV, date,
//! string, filesystem and request-context utilities.
pub mod node;
pub mod decorate;
pub mod export;
pub mod xml;
pub mod dedupe;
pub mod rows;
pub mod csv_text;
pub mod dates;
pub mod text;
pub mod http;
pub mod fs_util;
pub mod error;
pub mod jq_exec;
pub mod path_de;

pub use decorate::{add_postfix_to_keys, add_prefix_to_keys, decorate_keys, AffixMode};
pub use dedupe::{dedupe, structurally_equal};
pub use error::{Error, Result};
pub use export::{export_pretty, ExportStyle};
pub use node::{Mapping, Node, Record, Scalar};
pub use xml::{encode_xml, InvalidRecordError};
