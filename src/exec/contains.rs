//! CONTAINS executor: n-gram pattern match with up to one wildcard.

use crate::condition::{ContainsCondition, ContainsTerm};
use crate::error::{QueryError, Result};
use crate::index::{compose_key, key_to_display, IndexAccess};
use crate::model::{MatchDetail, MatchValue, QueryResult, ValueType};

use super::ExecContext;

fn index_name_for_arity(arity: usize) -> Option<&'static str> {
    match arity {
        1 => Some("unigram"),
        2 => Some("bigram"),
        3 => Some("trigram"),
        _ => None,
    }
}

pub fn execute(condition: &ContainsCondition, ctx: &ExecContext<'_>) -> Result<QueryResult> {
    let condition_display = format!("{condition:?}");

    if condition.terms.is_empty() || condition.terms.len() > 3 {
        return Err(QueryError::InvalidCondition {
            condition: condition_display.clone(),
            reason: format!(
                "CONTAINS supports 1-3 terms, got {}",
                condition.terms.len()
            ),
        });
    }

    let index_name = index_name_for_arity(condition.terms.len()).expect("arity checked above");
    let index = *ctx.indexes.get(index_name).ok_or_else(|| QueryError::MissingIndex {
        index: index_name.to_string(),
        condition: condition_display.clone(),
    })?;

    let wildcard_count = condition
        .terms
        .iter()
        .filter(|t| matches!(t, ContainsTerm::Wildcard))
        .count();

    if wildcard_count > 1 {
        tracing::warn!(condition = %condition_display, "more than one wildcard in CONTAINS key is unsupported");
        return Ok(QueryResult::empty(ctx.granularity, ctx.granularity_size));
    }

    let lowered: Vec<LoweredTerm> = condition
        .terms
        .iter()
        .map(|t| match t {
            ContainsTerm::Literal(s) => LoweredTerm::Literal(s.to_lowercase()),
            ContainsTerm::Wildcard => LoweredTerm::Wildcard,
        })
        .collect();

    let delimiter = index.delimiter();

    let entries = if wildcard_count == 0 {
        exact_lookup(index, delimiter, &lowered, &condition_display)?
    } else if matches!(lowered.last(), Some(LoweredTerm::Wildcard)) {
        prefix_scan(index, delimiter, &lowered)?
    } else {
        tracing::warn!(
            condition = %condition_display,
            "wildcard in a non-trailing CONTAINS position is unsupported"
        );
        return Err(QueryError::UnsupportedOperation {
            condition: condition_display.clone(),
            reason: "non-trailing wildcard in CONTAINS".to_string(),
        });
    };

    let mut details = Vec::new();
    for (key, positions) in entries {
        let value = key_to_display(delimiter, &key);
        for position in positions {
            let mut detail = MatchDetail::new(
                MatchValue::Text(value.clone()),
                ValueType::Term,
                position,
                condition.stable_id_helper(),
            );
            if let Some(var) = &condition.variable {
                detail = detail.with_variable(var);
            }
            details.push(detail);
        }
    }

    Ok(QueryResult::new(
        ctx.granularity,
        ctx.granularity_size,
        details,
    ))
}

enum LoweredTerm {
    Literal(String),
    Wildcard,
}

fn exact_lookup(
    index: &dyn IndexAccess,
    delimiter: u8,
    terms: &[LoweredTerm],
    condition_display: &str,
) -> Result<Vec<(Vec<u8>, Vec<crate::model::Position>)>> {
    let parts: Vec<&str> = terms
        .iter()
        .map(|t| match t {
            LoweredTerm::Literal(s) => s.as_str(),
            LoweredTerm::Wildcard => unreachable!("exact_lookup called with no wildcard"),
        })
        .collect();
    let key = compose_key(delimiter, &parts);

    let list = index.get(&key).map_err(|source| QueryError::IndexAccessError {
        condition: condition_display.to_string(),
        source,
    })?;

    Ok(match list {
        Some(list) => vec![(key, list.into_iter().collect())],
        None => Vec::new(),
    })
}

fn prefix_scan(
    index: &dyn IndexAccess,
    delimiter: u8,
    terms: &[LoweredTerm],
) -> Result<Vec<(Vec<u8>, Vec<crate::model::Position>)>> {
    let prefix_parts: Vec<&str> = terms[..terms.len() - 1]
        .iter()
        .map(|t| match t {
            LoweredTerm::Literal(s) => s.as_str(),
            LoweredTerm::Wildcard => unreachable!("wildcard only supported trailing"),
        })
        .collect();

    let mut prefix = compose_key(delimiter, &prefix_parts);
    if !prefix.is_empty() {
        prefix.push(delimiter);
    }

    let mut cursor = index
        .iterator()
        .map_err(|source| QueryError::IndexAccessError {
            condition: "contains-prefix-scan".to_string(),
            source,
        })?;
    cursor
        .seek(&prefix)
        .map_err(|source| QueryError::IndexAccessError {
            condition: "contains-prefix-scan".to_string(),
            source,
        })?;

    let mut out = Vec::new();
    loop {
        let entry = cursor.next().map_err(|source| QueryError::IndexAccessError {
            condition: "contains-prefix-scan".to_string(),
            source,
        })?;
        let Some((key, positions)) = entry else {
            break;
        };
        if !key.starts_with(&prefix) {
            break;
        }
        out.push((key, positions.into_iter().collect()));
    }
    Ok(out)
}

impl ContainsCondition {
    fn stable_id_helper(&self) -> String {
        crate::condition::Condition::Contains(self.clone()).stable_id()
    }
}
