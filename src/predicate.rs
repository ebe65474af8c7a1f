use roaring::RoaringBitmap;

use crate::dictionary::{Dictionary, NOT_FOUND};
use crate::error::Result;
use crate::key_path::resolve;
use crate::postings::PostingStore;

/// The reserved byte separating a key path from its stringified value in a
/// key-value token. Chosen to not collide with any byte legal in a user key
/// (`.`, `[`, `]`, `$`, `=` are the other reserved bytes; `0x00` is the one
/// used here).
pub const KV_SEP: u8 = 0x00;

/// A leaf predicate. Tagged variants, matched exhaustively rather than
/// downcast from a dynamic subtype hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq { key: String, value: String },
    NotEq { key: String, value: String },
    In { key: String, values: Vec<String> },
    NotIn { key: String, values: Vec<String> },
    IsNull { key: String },
    IsNotNull { key: String },
}

impl Predicate {
    /// Exclusive predicates can only be evaluated soundly at the filter
    /// root: their source-level truth depends on *no* flattened expansion
    /// matching, which requires the complement to run after flattened-to-
    /// source projection.
    pub fn is_exclusive(&self) -> bool {
        matches!(self, Predicate::NotEq { .. } | Predicate::NotIn { .. } | Predicate::IsNull { .. })
    }

    pub fn key(&self) -> &str {
        match self {
            Predicate::Eq { key, .. }
            | Predicate::NotEq { key, .. }
            | Predicate::In { key, .. }
            | Predicate::NotIn { key, .. }
            | Predicate::IsNull { key }
            | Predicate::IsNotNull { key } => key,
        }
    }
}

fn key_value_token(key: &str, value: &str) -> Vec<u8> {
    let mut token = Vec::with_capacity(key.len() + 1 + value.len());
    token.extend_from_slice(key.as_bytes());
    token.push(KV_SEP);
    token.extend_from_slice(value.as_bytes());
    token
}

fn lookup(dict: &Dictionary, postings: &PostingStore, token: &[u8]) -> Result<RoaringBitmap> {
    match dict.index_of(token) {
        NOT_FOUND => Ok(RoaringBitmap::new()),
        id => postings.postings(id),
    }
}

/// Evaluates `predicate` against the dictionary and posting store,
/// returning a bitmap of **flattened** doc ids.
///
/// Exclusive predicates (`NOT_EQ`, `NOT_IN`, `IS_NULL`) are evaluated here
/// exactly as their inclusive counterpart. The complement is applied once,
/// by the filter evaluator, at the projected source-id level. Evaluating
/// the complement here would silently produce the wrong answer for
/// documents with more than one flattened expansion of the key.
pub fn evaluate(dict: &Dictionary, postings: &PostingStore, predicate: &Predicate) -> Result<RoaringBitmap> {
    let resolved = resolve(predicate.key())?;

    let mut acc: Option<RoaringBitmap> = None;
    for constraint in &resolved.constraints {
        match dict.index_of(constraint.as_bytes()) {
            NOT_FOUND => {
                log::debug!("constraint token {constraint:?} absent, predicate yields empty");
                return Ok(RoaringBitmap::new());
            }
            id => {
                let list = postings.postings(id)?;
                acc = Some(match acc {
                    Some(a) => a & list,
                    None => list,
                });
            }
        }
    }

    let value_bitmap = match predicate {
        Predicate::Eq { value, .. } | Predicate::NotEq { value, .. } => {
            lookup(dict, postings, &key_value_token(&resolved.residual, value))?
        }
        Predicate::In { values, .. } | Predicate::NotIn { values, .. } => {
            let mut union = RoaringBitmap::new();
            for value in values {
                union |= lookup(dict, postings, &key_value_token(&resolved.residual, value))?;
            }
            union
        }
        Predicate::IsNull { .. } | Predicate::IsNotNull { .. } => {
            lookup(dict, postings, resolved.residual.as_bytes())?
        }
    };

    let result = match acc {
        Some(a) => a & value_bitmap,
        None => value_bitmap,
    };
    log::debug!("predicate {predicate:?} resolved to {} flattened doc id(s)", result.len());
    Ok(result)
}
