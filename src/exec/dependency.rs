//! Dependency executor. Keys are `governor DELIMITER relation DELIMITER
//! dependent`, all lowercased.

use crate::condition::{Condition, DependencyCondition};
use crate::error::{QueryError, Result};
use crate::index::compose_key;
use crate::model::{MatchDetail, MatchValue, QueryResult, ValueType};

use super::ExecContext;

pub fn execute(condition: &DependencyCondition, ctx: &ExecContext<'_>) -> Result<QueryResult> {
    let display = Condition::Dependency(condition.clone()).display_form();
    let condition_id = Condition::Dependency(condition.clone()).stable_id();

    let index = *ctx
        .indexes
        .get("dependency")
        .ok_or_else(|| QueryError::MissingIndex {
            index: "dependency".to_string(),
            condition: display.clone(),
        })?;
    let delimiter = index.delimiter();

    let key = compose_key(
        delimiter,
        &[
            &condition.governor.to_lowercase(),
            &condition.relation.to_lowercase(),
            &condition.dependent.to_lowercase(),
        ],
    );

    let list = index
        .get(&key)
        .map_err(|source| QueryError::IndexAccessError {
            condition: display.clone(),
            source,
        })?;

    let mut details = Vec::new();
    if let Some(list) = list {
        let value = format!(
            "{}-{}->{}",
            condition.governor.to_lowercase(),
            condition.relation.to_lowercase(),
            condition.dependent.to_lowercase()
        );
        for position in list {
            let mut detail = MatchDetail::new(
                MatchValue::Text(value.clone()),
                ValueType::Dependency,
                position,
                condition_id.clone(),
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
