//! Set-algebraic combination of condition results: union, intersection
//! (at document and symmetric-window sentence granularity), and the
//! placeholder-based complement used by NOT.
//!
//! All operations here are pure: they borrow their inputs and return a
//! freshly allocated `QueryResult`. Nothing is mutated in place.

use std::collections::{HashSet, HashMap};

use crate::error::{QueryError, Result};
use crate::model::{Granularity, MatchDetail, QueryResult};

/// Remove structural duplicates (equal value, value type, position,
/// condition id, variable name) while preserving first-seen order.
///
/// Shared with `crate::temporal::join`, whose output is also subject to
/// the result-algebra's dedup responsibility (`spec.md` §3).
pub(crate) fn dedup(details: Vec<MatchDetail>) -> Vec<MatchDetail> {
    let mut seen = HashSet::new();
    details
        .into_iter()
        .filter(|d| seen.insert(d.clone()))
        .collect()
}

fn require_matching_shape(a: &QueryResult, b: &QueryResult, op: &str) -> Result<()> {
    if a.matches_shape(b) {
        Ok(())
    } else {
        tracing::warn!(
            op,
            left_granularity = ?a.granularity(),
            left_size = a.granularity_size(),
            right_granularity = ?b.granularity(),
            right_size = b.granularity_size(),
            "rejecting combination of mismatched granularity/size",
        );
        Err(QueryError::InvalidCondition {
            condition: op.to_string(),
            reason: "mixed granularity or granularity size".to_string(),
        })
    }
}

/// Union: concatenate details from both sides and structurally dedup.
pub fn union(a: &QueryResult, b: &QueryResult) -> Result<QueryResult> {
    require_matching_shape(a, b, "union")?;

    let mut combined = Vec::with_capacity(a.len() + b.len());
    combined.extend(a.details().iter().cloned());
    combined.extend(b.details().iter().cloned());

    Ok(QueryResult::new(
        a.granularity(),
        a.granularity_size(),
        dedup(combined),
    ))
}

/// Intersection, dispatching to the document or sentence-window rule
/// based on the shared granularity.
pub fn intersect(a: &QueryResult, b: &QueryResult) -> Result<QueryResult> {
    require_matching_shape(a, b, "intersect")?;

    match a.granularity() {
        Granularity::Document => Ok(intersect_document(a, b)),
        Granularity::Sentence => Ok(intersect_sentence_window(a, b, a.granularity_size())),
    }
}

/// Document-granularity intersection: every detail from either side whose
/// document id is in both sides' document-id sets. Probes the smaller
/// side's id set against the larger side for membership.
fn intersect_document(a: &QueryResult, b: &QueryResult) -> QueryResult {
    let a_docs: HashSet<i32> = a.document_ids().collect();
    let b_docs: HashSet<i32> = b.document_ids().collect();

    let (small, large) = if a_docs.len() <= b_docs.len() {
        (&a_docs, &b_docs)
    } else {
        (&b_docs, &a_docs)
    };
    let common: HashSet<i32> = small.iter().copied().filter(|d| large.contains(d)).collect();

    let mut out = Vec::new();
    for d in a.details() {
        if common.contains(&d.document_id()) {
            out.push(d.clone());
        }
    }
    for d in b.details() {
        if common.contains(&d.document_id()) {
            out.push(d.clone());
        }
    }

    QueryResult::new(Granularity::Document, a.granularity_size(), dedup(out))
}

/// Sentence-granularity intersection with a symmetric window.
///
/// `allowed = max(0, (w - 1) / 2)` (integer division). For each common
/// document, a sentence id on one side survives if some sentence id on
/// the other side is within `allowed` of it; the check is symmetric.
/// Surviving `(document, sentence)` pairs are the matching sentence
/// units; every detail from either side at a surviving unit is emitted,
/// structurally deduplicated.
fn intersect_sentence_window(a: &QueryResult, b: &QueryResult, window: i32) -> QueryResult {
    let allowed = ((window - 1).max(0)) / 2;

    let mut a_by_doc: HashMap<i32, Vec<i32>> = HashMap::new();
    for (doc, sent) in a.document_sentence_ids() {
        a_by_doc.entry(doc).or_default().push(sent);
    }
    let mut b_by_doc: HashMap<i32, Vec<i32>> = HashMap::new();
    for (doc, sent) in b.document_sentence_ids() {
        b_by_doc.entry(doc).or_default().push(sent);
    }

    let mut units: Vec<(i32, i32)> = Vec::new();

    for (&doc, a_sents) in &a_by_doc {
        let Some(b_sents) = b_by_doc.get(&doc) else {
            continue;
        };

        for &s1 in a_sents {
            if b_sents.iter().any(|&s2| (s1 - s2).abs() <= allowed) {
                units.push((doc, s1));
            }
        }
        for &s2 in b_sents {
            if a_sents.iter().any(|&s1| (s1 - s2).abs() <= allowed) {
                units.push((doc, s2));
            }
        }
    }
    units.sort_unstable();
    units.dedup();

    let mut out = Vec::new();
    for (doc, sent) in units {
        out.extend(a.details_for_document_sentence(doc, sent).cloned());
        out.extend(b.details_for_document_sentence(doc, sent).cloned());
    }

    QueryResult::new(Granularity::Sentence, window, dedup(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchValue, Position, ValueType};

    fn detail(doc: i32, sent: i32, value: &str) -> MatchDetail {
        MatchDetail::new(
            MatchValue::Text(value.to_string()),
            ValueType::Term,
            Position::in_sentence(doc, sent, 0, 1),
            "cond",
        )
    }

    fn result(granularity: Granularity, size: i32, details: Vec<MatchDetail>) -> QueryResult {
        QueryResult::new(granularity, size, details)
    }

    #[test]
    fn union_is_commutative_and_idempotent() {
        let r = result(
            Granularity::Document,
            0,
            vec![detail(1, -1, "a"), detail(2, -1, "b")],
        );
        let u1 = union(&r, &r).unwrap();
        assert_eq!(u1.len(), r.len());

        let empty = result(Granularity::Document, 0, vec![]);
        let u2 = union(&r, &empty).unwrap();
        let u3 = union(&empty, &r).unwrap();
        assert_eq!(u2.len(), u3.len());
    }

    #[test]
    fn document_intersection_keeps_all_details_from_matching_docs() {
        let a = result(
            Granularity::Document,
            0,
            vec![detail(1, -1, "apple"), detail(2, -1, "apple")],
        );
        let b = result(
            Granularity::Document,
            0,
            vec![detail(2, -1, "juice"), detail(3, -1, "juice")],
        );
        let i = intersect(&a, &b).unwrap();
        let docs: HashSet<i32> = i.document_ids().collect();
        assert_eq!(docs, HashSet::from([2]));
        assert_eq!(i.len(), 2);
    }

    #[test]
    fn sentence_window_zero_requires_exact_equality() {
        let a = result(Granularity::Sentence, 0, vec![detail(1, 0, "apple")]);
        let b = result(
            Granularity::Sentence,
            0,
            vec![detail(1, 0, "served"), detail(1, 1, "served")],
        );
        let i = intersect(&a, &b).unwrap();
        let units: HashSet<(i32, i32)> = i.document_sentence_ids().collect();
        assert_eq!(units, HashSet::from([(1, 0)]));
    }

    #[test]
    fn sentence_window_three_allows_adjacent_sentences() {
        let a = result(Granularity::Sentence, 3, vec![detail(1, 0, "apple")]);
        let b = result(
            Granularity::Sentence,
            3,
            vec![detail(1, 0, "served"), detail(1, 1, "served")],
        );
        let i = intersect(&a, &b).unwrap();
        let units: HashSet<(i32, i32)> = i.document_sentence_ids().collect();
        assert_eq!(units, HashSet::from([(1, 0), (1, 1)]));
    }

    #[test]
    fn mixed_granularity_is_rejected() {
        let a = result(Granularity::Document, 0, vec![detail(1, -1, "apple")]);
        let b = result(Granularity::Sentence, 0, vec![detail(1, 0, "apple")]);
        assert!(intersect(&a, &b).is_err());
        assert!(union(&a, &b).is_err());
    }
}
