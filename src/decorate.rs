//! Key decoration: add a prefix or postfix to every key of a mapping.
use crate::node::{Mapping, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffixMode {
    Prefix,
    Postfix,
}

impl AffixMode {
    fn apply(self, affix: &str, key: &str) -> String {
        match self {
            AffixMode::Prefix => format!("{affix}{key}"),
            AffixMode::Postfix => format!("{key}{affix}"),
        }
    }
}

/// Rename every key of `map` with `affix`, keeping key order.
///
/// With `recursive`, mappings nested at any depth are renamed as well
/// (including mappings that sit inside sequences). A sequence is a list, not
/// a mapping with integer keys, so its positions are left alone. If two renamed keys collide the later value
/// wins and keeps the earlier slot.
pub fn decorate_keys(map: &Mapping, affix: &str, recursive: bool, mode: AffixMode) -> Mapping {
    let mut out = Mapping::with_capacity(map.len());
    for (key, value) in map {
        let value = if recursive {
            decorate_nested(value, affix, mode)
        } else {
            value.clone()
        };
        out.insert(mode.apply(affix, key), value);
    }
    out
}

fn decorate_nested(node: &Node, affix: &str, mode: AffixMode) -> Node {
    match node {
        Node::Mapping(m) => Node::Mapping(decorate_keys(m, affix, true, mode)),
        Node::Sequence(xs) => Node::Sequence(
            xs.iter().map(|x| decorate_nested(x, affix, mode)).collect(),
        ),
        Node::Scalar(_) => node.clone(),
    }
}

pub fn add_prefix_to_keys(map: &Mapping, prefix: &str, recursive: bool) -> Mapping {
    decorate_keys(map, prefix, recursive, AffixMode::Prefix)
}

pub fn add_postfix_to_keys(map: &Mapping, postfix: &str, recursive: bool) -> Mapping {
    decorate_keys(map, postfix, recursive, AffixMode::Postfix)
}

impl Node {
    /// Like [`decorate_keys`], but accepts any node. A top-level sequence has
    /// no keys of its own; its mappings are decorated only when `recursive`.
    pub fn decorate_keys(&self, affix: &str, recursive: bool, mode: AffixMode) -> Node {
        match self {
            Node::Mapping(m) => Node::Mapping(decorate_keys(m, affix, recursive, mode)),
            Node::Sequence(_) if recursive => decorate_nested(self, affix, mode),
            _ => self.clone(),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
