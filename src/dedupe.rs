//! Stable removal of structurally-equal records.
//!
//! Equality is strict: `1`, `1.0` and `"1"` are three different values, and
//! two mappings with the same entries in a different order are different
//! rows. Floats compare by bit pattern, so `-0.0` and `0.0` differ; every
//! `NaN` collapses to one pattern and matches itself.
use std::collections::HashSet;

use crate::node::{Node, Scalar};

/// Hashable, order-preserving image of a `Node`. Two nodes are structurally
/// equal iff their fingerprints are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Fingerprint {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
    Mapping(Vec<(String, Fingerprint)>),
    Sequence(Vec<Fingerprint>),
}

impl Fingerprint {
    fn of(node: &Node) -> Self {
        match node {
            Node::Scalar(Scalar::Null) => Fingerprint::Null,
            Node::Scalar(Scalar::Bool(b)) => Fingerprint::Bool(*b),
            Node::Scalar(Scalar::Int(i)) => Fingerprint::Int(*i),
            Node::Scalar(Scalar::Float(f)) => Fingerprint::Float(float_bits(*f)),
            Node::Scalar(Scalar::Str(s)) => Fingerprint::Str(s.clone()),
            Node::Mapping(m) => Fingerprint::Mapping(
                m.iter().map(|(k, v)| (k.clone(), Fingerprint::of(v))).collect(),
            ),
            Node::Sequence(xs) => Fingerprint::Sequence(xs.iter().map(Fingerprint::of).collect()),
        }
    }
}

/// Deep, order-sensitive equality over `Node`.
pub fn structurally_equal(a: &Node, b: &Node) -> bool {
    match (a, b) {
        (Node::Scalar(x), Node::Scalar(y)) => scalar_equal(x, y),
        (Node::Mapping(x), Node::Mapping(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && structurally_equal(va, vb))
        }
        (Node::Sequence(x), Node::Sequence(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| structurally_equal(a, b))
        }
        _ => false,
    }
}

fn scalar_equal(a: &Scalar, b: &Scalar) -> bool {
    match (a, b) {
        (Scalar::Null, Scalar::Null) => true,
        (Scalar::Bool(x), Scalar::Bool(y)) => x == y,
        (Scalar::Int(x), Scalar::Int(y)) => x == y,
        (Scalar::Float(x), Scalar::Float(y)) => float_bits(*x) == float_bits(*y),
        (Scalar::Str(x), Scalar::Str(y)) => x == y,
        _ => false,
    }
}

fn float_bits(f: f64) -> u64 {
    if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

/// Keep the first occurrence of every distinct record, in input order.
pub fn dedupe(records: &[Node]) -> Vec<Node> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(Fingerprint::of(record)) {
            out.push(record.clone());
        }
    }
    out
}
