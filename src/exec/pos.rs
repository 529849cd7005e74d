//! Part-of-speech executor. Keys are `tag DELIMITER term`.

use crate::condition::{Condition, PosCondition};
use crate::error::{QueryError, Result};
use crate::index::compose_key;
use crate::model::{MatchDetail, MatchValue, QueryResult, ValueType};

use super::ExecContext;

pub fn execute(condition: &PosCondition, ctx: &ExecContext<'_>) -> Result<QueryResult> {
    let display = Condition::Pos(condition.clone()).display_form();
    let condition_id = Condition::Pos(condition.clone()).stable_id();

    let index = *ctx
        .indexes
        .get("pos")
        .ok_or_else(|| QueryError::MissingIndex {
            index: "pos".to_string(),
            condition: display.clone(),
        })?;
    let delimiter = index.delimiter();

    let mut details = Vec::new();

    match condition {
        PosCondition::Literal { tag, term } => {
            let key = compose_key(delimiter, &[&tag.to_lowercase(), &term.to_lowercase()]);
            let list = index
                .get(&key)
                .map_err(|source| QueryError::IndexAccessError {
                    condition: display.clone(),
                    source,
                })?;
            if let Some(list) = list {
                let value = format!("{}/{}", term.to_lowercase(), tag.to_lowercase());
                for position in list {
                    details.push(MatchDetail::new(
                        MatchValue::Text(value.clone()),
                        ValueType::PosTerm,
                        position,
                        condition_id.clone(),
                    ));
                }
            }
        }
        PosCondition::Variable { tag, variable } => {
            let mut prefix = compose_key(delimiter, &[&tag.to_lowercase()]);
            prefix.push(delimiter);

            let mut cursor =
                index
                    .iterator()
                    .map_err(|source| QueryError::IndexAccessError {
                        condition: display.clone(),
                        source,
                    })?;
            cursor
                .seek(&prefix)
                .map_err(|source| QueryError::IndexAccessError {
                    condition: display.clone(),
                    source,
                })?;

            loop {
                let entry = cursor
                    .next()
                    .map_err(|source| QueryError::IndexAccessError {
                        condition: display.clone(),
                        source,
                    })?;
                let Some((key, list)) = entry else { break };
                if !key.starts_with(&prefix) {
                    break;
                }
                let term = key
                    .split(|&b| b == delimiter)
                    .nth(1)
                    .map(|p| String::from_utf8_lossy(p).into_owned())
                    .unwrap_or_default();
                let value = format!("{term}/{}", tag.to_lowercase());
                for position in list {
                    details.push(
                        MatchDetail::new(
                            MatchValue::Text(value.clone()),
                            ValueType::PosTerm,
                            position,
                            condition_id.clone(),
                        )
                        .with_variable(variable),
                    );
                }
            }
        }
    }

    Ok(QueryResult::new(
        ctx.granularity,
        ctx.granularity_size,
        details,
    ))
}
