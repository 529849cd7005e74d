//! Temporal join over two materialized subquery results.
//!
//! `INNER` is the only semantics this spec requires; `LEFT`/`RIGHT`/
//! `FULL` are recognized enum variants (so a parser can represent them)
//! but rejected with `UnsupportedOperation`.

use std::collections::HashMap;

use crate::algebra::dedup;
use crate::condition::TemporalPredicate;
use crate::error::{QueryError, Result};
use crate::model::{Granularity, JoinSide, MatchDetail, MatchValue, QueryResult, ValueType};

use super::predicate::interval_matches;

/// A column reference on one side of a join: a structural identifier or a
/// bound variable name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    DocumentId,
    SentenceId,
    Variable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

/// A join condition referencing `alias.key` on each side. `predicate`
/// governs the comparison when both sides resolve to typed (non-
/// structural) values; `proximity_window_days` is only consulted for
/// `TemporalPredicate::Proximity`.
#[derive(Debug, Clone)]
pub struct JoinCondition {
    pub left_alias: String,
    pub left_key: JoinKey,
    pub right_alias: String,
    pub right_key: JoinKey,
    pub join_type: JoinType,
    pub predicate: Option<TemporalPredicate>,
    pub proximity_window_days: Option<i64>,
}

enum ExtractedValue {
    DocumentId(i32),
    SentenceId(i32),
    Typed(MatchValue, ValueType),
}

/// Resolve `key` against `detail`. Returns `Ok(None)` when the detail
/// simply doesn't carry the referenced variable (a non-match, not an
/// error); returns `Err` only for the disallowed `-1` sentinel on
/// `sentence_id`.
fn extract(detail: &MatchDetail, key: &JoinKey, display: &str) -> Result<Option<ExtractedValue>> {
    match key {
        JoinKey::DocumentId => Ok(Some(ExtractedValue::DocumentId(detail.document_id()))),
        JoinKey::SentenceId => {
            let sentence_id = detail.sentence_id();
            if sentence_id < 0 {
                return Err(QueryError::InvalidCondition {
                    condition: display.to_string(),
                    reason: "sentence_id join key on a document-level detail (-1 sentinel)"
                        .to_string(),
                });
            }
            Ok(Some(ExtractedValue::SentenceId(sentence_id)))
        }
        JoinKey::Variable(name) => {
            if detail.variable_name.as_deref() == Some(name.as_str()) {
                return Ok(Some(ExtractedValue::Typed(
                    detail.value.clone(),
                    detail.value_type,
                )));
            }
            if let Some(join) = &detail.join {
                if join.right_variable_name.as_deref() == Some(name.as_str()) {
                    return Ok(Some(ExtractedValue::Typed(
                        join.right_value.clone(),
                        join.right_value_type,
                    )));
                }
            }
            Ok(None)
        }
    }
}

fn values_match(
    left: &ExtractedValue,
    right: &ExtractedValue,
    predicate: Option<TemporalPredicate>,
    window_days: Option<i64>,
) -> bool {
    match (left, right) {
        (ExtractedValue::DocumentId(a), ExtractedValue::DocumentId(b)) => a == b,
        (ExtractedValue::SentenceId(a), ExtractedValue::SentenceId(b)) => a == b,
        (ExtractedValue::Typed(v1, t1), ExtractedValue::Typed(v2, t2)) => {
            if matches!(t1, ValueType::Date) && matches!(t2, ValueType::Date) {
                let (Some(d1), Some(d2)) = (v1.as_date(), v2.as_date()) else {
                    return false;
                };
                match predicate {
                    Some(pred) => interval_matches(pred, d1, d1, d2, d2, window_days),
                    None => false,
                }
            } else if t1 == t2 && matches!(predicate, Some(TemporalPredicate::Equal)) {
                v1 == v2
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Execute the join, producing a single `QueryResult` at `granularity`.
///
/// `subqueries` is the alias → materialized `QueryResult` map `spec.md`
/// §4.7.3 calls the "subquery context"; `condition.left_alias`/
/// `right_alias` are resolved against it here rather than by the caller,
/// so an unknown alias surfaces as `InvalidCondition` (malformed
/// `alias.key`, per §7/§4.9) instead of silently joining the wrong sides.
pub fn execute(
    condition: &JoinCondition,
    subqueries: &HashMap<String, QueryResult>,
    granularity: Granularity,
    granularity_size: i32,
) -> Result<QueryResult> {
    let display = format!(
        "JOIN {}.{:?} = {}.{:?}",
        condition.left_alias, condition.left_key, condition.right_alias, condition.right_key
    );

    if condition.join_type != JoinType::Inner {
        return Err(QueryError::UnsupportedOperation {
            condition: display,
            reason: format!("{:?} joins are not implemented", condition.join_type),
        });
    }

    let left = resolve_alias(subqueries, &condition.left_alias, &display)?;
    let right = resolve_alias(subqueries, &condition.right_alias, &display)?;

    let mut details = Vec::new();

    for l in left.details() {
        let Some(left_value) = extract(l, &condition.left_key, &display)? else {
            continue;
        };
        for r in right.details() {
            let Some(right_value) = extract(r, &condition.right_key, &display)? else {
                continue;
            };

            if values_match(
                &left_value,
                &right_value,
                condition.predicate,
                condition.proximity_window_days,
            ) {
                let join_side = JoinSide {
                    right_value: r.value.clone(),
                    right_value_type: r.value_type,
                    right_variable_name: r.variable_name.clone(),
                };
                details.push(l.clone().with_join(join_side));
            }
        }
    }

    Ok(QueryResult::new(granularity, granularity_size, dedup(details)))
}

/// Look up `alias` in the subquery context, or report it as a malformed
/// `alias.key` reference.
fn resolve_alias<'a>(
    subqueries: &'a HashMap<String, QueryResult>,
    alias: &str,
    display: &str,
) -> Result<&'a QueryResult> {
    subqueries
        .get(alias)
        .ok_or_else(|| QueryError::InvalidCondition {
            condition: display.to_string(),
            reason: format!("unknown subquery alias `{alias}`"),
        })
}
