use roaring::RoaringBitmap;

use crate::cancel::{CancelCheck, CancelGate};
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::mapping::FlatToSource;
use crate::options::ReaderOptions;
use crate::postings::PostingStore;
use crate::predicate::{self, Predicate};

/// A filter tree: `And`/`Or` compose children, `Predicate` is a leaf.
/// Arity is unbounded so callers aren't forced into a binary tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Predicate(Predicate),
}

/// Evaluates `filter` against the index described by `dict`/`postings`/
/// `mapping`, returning a bitmap of source doc ids.
///
/// Implements the two evaluation rules verbatim:
/// - a root-level exclusive predicate is evaluated inclusively, projected,
///   and complemented against `[0, num_source_docs)`;
/// - anything else is evaluated recursively at the flattened level (AND =
///   intersection, OR = union, exclusive predicates below AND/OR are
///   rejected), then projected once at the end.
pub fn matching_doc_ids(
    dict: &Dictionary,
    postings: &PostingStore,
    mapping: &FlatToSource,
    num_source_docs: u32,
    filter: &FilterNode,
    options: ReaderOptions,
    cancel: CancelCheck,
) -> Result<RoaringBitmap> {
    if let FilterNode::Predicate(p) = filter {
        if p.is_exclusive() {
            log::debug!("evaluating exclusive root predicate {p:?} via inclusive complement");
            let flattened = predicate::evaluate(dict, postings, p)?;
            let matched = project(&flattened, mapping)?;
            let mut universe = RoaringBitmap::new();
            universe.insert_range(0..num_source_docs);
            return Ok(universe - matched);
        }
    }

    let mut gate = CancelGate::new(cancel, options.cancel_every);
    let flattened = eval_flattened(filter, dict, postings, &mut gate)?;
    project(&flattened, mapping)
}

fn eval_flattened(
    node: &FilterNode,
    dict: &Dictionary,
    postings: &PostingStore,
    gate: &mut CancelGate,
) -> Result<RoaringBitmap> {
    match node {
        FilterNode::Predicate(p) => {
            if p.is_exclusive() {
                return Err(Error::NestedExclusive);
            }
            predicate::evaluate(dict, postings, p)
        }
        FilterNode::And(children) => {
            let mut acc: Option<RoaringBitmap> = None;
            for child in children {
                let result = eval_flattened(child, dict, postings, gate)?;
                acc = Some(match acc {
                    Some(a) => a & result,
                    None => result,
                });
                if gate.tick() {
                    return Err(Error::Cancelled);
                }
            }
            log::debug!("AND over {} child/children folded", children.len());
            Ok(acc.unwrap_or_default())
        }
        FilterNode::Or(children) => {
            let mut acc: Option<RoaringBitmap> = None;
            for child in children {
                let result = eval_flattened(child, dict, postings, gate)?;
                acc = Some(match acc {
                    Some(a) => a | result,
                    None => result,
                });
                if gate.tick() {
                    return Err(Error::Cancelled);
                }
            }
            log::debug!("OR over {} child/children folded", children.len());
            Ok(acc.unwrap_or_default())
        }
    }
}

fn project(flattened: &RoaringBitmap, mapping: &FlatToSource) -> Result<RoaringBitmap> {
    let mut out = RoaringBitmap::new();
    for flat in flattened.iter() {
        out.insert(mapping.to_source(flat)?);
    }
    Ok(out)
}
