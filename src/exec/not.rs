//! NOT executor: complement against the `unigram`-index universe.

use std::collections::HashSet;

use crate::condition::{Condition, NotCondition};
use crate::error::{QueryError, Result};
use crate::index::IndexAccess;
use crate::model::{Granularity, MatchDetail, MatchValue, Position, QueryResult, ValueType};

use super::ExecContext;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum UniverseId {
    Document(i32),
    Sentence(i32, i32),
}

pub fn execute(condition: &NotCondition, ctx: &ExecContext<'_>) -> Result<QueryResult> {
    let display = Condition::Not(condition.clone()).display_form();

    let unigram = *ctx
        .indexes
        .get("unigram")
        .ok_or_else(|| QueryError::MissingIndex {
            index: "unigram".to_string(),
            condition: display.clone(),
        })?;

    let universe = compute_universe(unigram, ctx.granularity, &display)?;

    let child_result = super::execute(&condition.child, ctx)?;
    let child_ids: HashSet<UniverseId> = child_result
        .details()
        .iter()
        .map(|d| match ctx.granularity {
            Granularity::Document => UniverseId::Document(d.document_id()),
            Granularity::Sentence => {
                if d.sentence_id() >= 0 {
                    UniverseId::Sentence(d.document_id(), d.sentence_id())
                } else {
                    UniverseId::Document(d.document_id())
                }
            }
        })
        .collect();

    let diff: Vec<UniverseId> = universe.difference(&child_ids).copied().collect();

    let condition_id = Condition::Not(condition.clone()).stable_id();
    let details = diff
        .into_iter()
        .map(|id| {
            let position = match id {
                UniverseId::Document(doc) => Position::placeholder_document(doc),
                UniverseId::Sentence(doc, sent) => Position::placeholder_sentence(doc, sent),
            };
            MatchDetail::new(
                MatchValue::Text("NOT_MATCH".to_string()),
                ValueType::Term,
                position,
                condition_id.clone(),
            )
        })
        .collect();

    Ok(QueryResult::new(
        ctx.granularity,
        ctx.granularity_size,
        details,
    ))
}

fn compute_universe(
    unigram: &dyn IndexAccess,
    granularity: Granularity,
    condition_display: &str,
) -> Result<HashSet<UniverseId>> {
    let mut universe = HashSet::new();

    let mut cursor =
        unigram
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

    while let Some((_, positions)) =
        cursor
            .next()
            .map_err(|source| QueryError::IndexAccessError {
                condition: condition_display.to_string(),
                source,
            })?
    {
        for position in positions.iter() {
            let id = match granularity {
                Granularity::Document => UniverseId::Document(position.document_id),
                Granularity::Sentence => {
                    if position.sentence_id >= 0 {
                        UniverseId::Sentence(position.document_id, position.sentence_id)
                    } else {
                        UniverseId::Document(position.document_id)
                    }
                }
            };
            universe.insert(id);
        }
    }

    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ContainsCondition, ContainsTerm};
    use crate::index::{Corpus, IndexSet, InMemoryIndexAccess};

    fn build_unigram() -> InMemoryIndexAccess {
        let mut idx = InMemoryIndexAccess::new("unigram");
        idx.insert(b"apple".to_vec(), vec![Position::in_sentence(1, 0, 0, 5)]);
        idx.insert(b"served".to_vec(), vec![Position::in_sentence(1, 0, 6, 12)]);
        idx.insert(b"juice".to_vec(), vec![Position::in_sentence(2, 0, 0, 5)]);
        idx
    }

    #[test]
    fn not_matches_universe_minus_child_at_document_granularity() {
        let unigram = build_unigram();
        let mut indexes: IndexSet = IndexSet::new();
        indexes.insert("unigram", &unigram);

        let child = Condition::Contains(ContainsCondition {
            terms: vec![ContainsTerm::Literal("apple".to_string())],
            variable: None,
        });
        let not_cond = NotCondition {
            child: Box::new(child),
        };

        let corpus = Corpus::new(indexes);
        let ctx = ExecContext::new(&corpus, Granularity::Document, 0);
        let result = execute(&not_cond, &ctx).unwrap();

        let docs: HashSet<i32> = result.document_ids().collect();
        assert_eq!(docs, HashSet::from([2]));
    }
}
