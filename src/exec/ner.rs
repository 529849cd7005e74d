//! Named-entity executor.
//!
//! `DATE` routes to the `ner_date` index, whose keys are raw `YYYYMMDD`
//! date strings; every other entity type routes to `ner`, whose keys are
//! `TYPE DELIMITER surface_text`.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

use crate::condition::{Condition, NerCondition};
use crate::error::{QueryError, Result};
use crate::index::{compose_key, IndexAccess};
use crate::model::{MatchDetail, MatchValue, QueryResult, ValueType};

use super::ExecContext;

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year][month][day]");

pub fn execute(condition: &NerCondition, ctx: &ExecContext<'_>) -> Result<QueryResult> {
    let display = Condition::Ner(condition.clone()).display_form();

    if condition.entity_type == "*" {
        return Err(QueryError::UnsupportedOperation {
            condition: display,
            reason: "wildcard entity type is not supported".to_string(),
        });
    }

    let is_date = condition.entity_type.eq_ignore_ascii_case("date");
    let index_name = if is_date { "ner_date" } else { "ner" };
    let index = *ctx
        .indexes
        .get(index_name)
        .ok_or_else(|| QueryError::MissingIndex {
            index: index_name.to_string(),
            condition: display.clone(),
        })?;

    let delimiter = index.delimiter();
    let condition_id = Condition::Ner(condition.clone()).stable_id();

    let entries = if is_date {
        scan_all(index, &display)?
    } else {
        let prefix = {
            let mut p = compose_key(delimiter, &[condition.entity_type.to_uppercase().as_str()]);
            p.push(delimiter);
            p
        };
        scan_prefix(index, &prefix, &display)?
    };

    let mut details = Vec::new();
    for (key, positions) in entries {
        let surface = if is_date {
            String::from_utf8_lossy(&key).into_owned()
        } else {
            key.split(|&b| b == delimiter)
                .nth(1)
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .unwrap_or_default()
        };

        if let Some(target) = &condition.target {
            if surface.to_lowercase() != target.to_lowercase() {
                continue;
            }
        }

        for position in positions {
            let value = if is_date {
                let date = Date::parse(&surface, DATE_FORMAT).map_err(|e| {
                    QueryError::IndexAccessError {
                        condition: display.clone(),
                        source: anyhow::anyhow!("invalid ner_date key `{surface}`: {e}"),
                    }
                })?;
                MatchValue::Date(date)
            } else if condition.variable.is_some() {
                MatchValue::Text(surface.clone())
            } else if let Some(target) = &condition.target {
                MatchValue::Text(target.clone())
            } else {
                MatchValue::Text(condition.entity_type.clone())
            };

            let value_type = if is_date { ValueType::Date } else { ValueType::Entity };

            let mut detail = MatchDetail::new(value, value_type, position, condition_id.clone());
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

fn scan_prefix(
    index: &dyn IndexAccess,
    prefix: &[u8],
    condition_display: &str,
) -> Result<Vec<(Vec<u8>, Vec<crate::model::Position>)>> {
    let mut cursor = index
        .iterator()
        .map_err(|source| QueryError::IndexAccessError {
            condition: condition_display.to_string(),
            source,
        })?;
    cursor
        .seek(prefix)
        .map_err(|source| QueryError::IndexAccessError {
            condition: condition_display.to_string(),
            source,
        })?;

    let mut out = Vec::new();
    loop {
        let entry = cursor
            .next()
            .map_err(|source| QueryError::IndexAccessError {
                condition: condition_display.to_string(),
                source,
            })?;
        let Some((key, positions)) = entry else {
            break;
        };
        if !key.starts_with(prefix) {
            break;
        }
        out.push((key, positions.into_iter().collect()));
    }
    Ok(out)
}

fn scan_all(
    index: &dyn IndexAccess,
    condition_display: &str,
) -> Result<Vec<(Vec<u8>, Vec<crate::model::Position>)>> {
    let mut cursor = index
        .iterator()
        .map_err(|source| QueryError::IndexAccessError {
            condition: condition_display.to_string(),
            source,
        })?;
    cursor
        .seek_to_first()
        .map_err(|source| QueryError::IndexAccessError {
            condition: condition_display.to_string(),
            source,
        })?;

    let mut out = Vec::new();
    while let Some((key, positions)) = cursor
        .next()
        .map_err(|source| QueryError::IndexAccessError {
            condition: condition_display.to_string(),
            source,
        })?
    {
        out.push((key, positions.into_iter().collect()));
    }
    Ok(out)
}
