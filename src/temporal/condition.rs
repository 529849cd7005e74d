//! Temporal condition executor: direct `ner_date` scan, or the temporal
//! hash index when available for document-granularity, non-binding
//! queries.

use crate::condition::{Condition, TemporalCondition};
use crate::error::{QueryError, Result};
use crate::exec::ExecContext;
use crate::model::{Granularity, MatchDetail, MatchValue, Position, QueryResult, ValueType};

use super::parse_date_key;
use super::predicate::interval_matches;

pub fn execute(condition: &TemporalCondition, ctx: &ExecContext<'_>) -> Result<QueryResult> {
    let display = Condition::Temporal(condition.clone()).display_form();
    let condition_id = Condition::Temporal(condition.clone()).stable_id();

    let try_hash_index =
        condition.variable.is_none() && matches!(ctx.granularity, Granularity::Document);

    if try_hash_index {
        if let Some(hash_index) = ctx.corpus.temporal_hash()? {
            let docs =
                hash_index.query(condition.predicate, condition.start, condition.effective_end());
            let details = docs
                .into_iter()
                .map(|doc| {
                    MatchDetail::new(
                        MatchValue::Text("DATE_MATCH".to_string()),
                        ValueType::Date,
                        Position::placeholder_document(doc),
                        condition_id.clone(),
                    )
                })
                .collect();
            return Ok(QueryResult::new(
                ctx.granularity,
                ctx.granularity_size,
                details,
            ));
        }
    }

    direct_scan(condition, ctx, &display, &condition_id)
}

fn direct_scan(
    condition: &TemporalCondition,
    ctx: &ExecContext<'_>,
    display: &str,
    condition_id: &str,
) -> Result<QueryResult> {
    let index = *ctx
        .indexes
        .get("ner_date")
        .ok_or_else(|| QueryError::MissingIndex {
            index: "ner_date".to_string(),
            condition: display.to_string(),
        })?;

    let mut cursor = index
        .iterator()
        .map_err(|source| QueryError::IndexAccessError {
            condition: display.to_string(),
            source,
        })?;
    cursor
        .seek_to_first()
        .map_err(|source| QueryError::IndexAccessError {
            condition: display.to_string(),
            source,
        })?;

    let query_end = condition.effective_end();
    let mut details = Vec::new();

    while let Some((key, positions)) =
        cursor
            .next()
            .map_err(|source| QueryError::IndexAccessError {
                condition: display.to_string(),
                source,
            })?
    {
        let date = parse_date_key(&key).map_err(|reason| QueryError::IndexAccessError {
            condition: display.to_string(),
            source: anyhow::anyhow!(reason),
        })?;

        if !interval_matches(
            condition.predicate,
            date,
            date,
            condition.start,
            query_end,
            None,
        ) {
            continue;
        }

        for position in positions.iter() {
            let mut detail = MatchDetail::new(
                MatchValue::Date(date),
                ValueType::Date,
                position.clone(),
                condition_id.to_string(),
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
