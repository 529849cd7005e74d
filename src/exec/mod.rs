//! Condition dispatch: the single function that maps a parsed `Condition`
//! variant to its executor.
//!
//! Executors are conceptually singletons; `Logical` and `Not` carry child
//! references and recurse back into [`execute`]. This is the only place
//! in the crate with an exhaustive match over `Condition` — adding a new
//! variant is meant to be a one-site change here.

pub mod contains;
pub mod dependency;
pub mod logical;
pub mod ner;
pub mod not;
pub mod pos;

use std::collections::HashMap;

use crate::condition::Condition;
use crate::error::Result;
use crate::index::{Corpus, IndexSet};
use crate::model::{Granularity, QueryResult};
use crate::query::Query;
use crate::temporal;

/// Everything an executor needs besides the condition it is evaluating.
///
/// Carries the whole `Corpus` (not just its `IndexSet`) so the temporal
/// condition executor can reach the corpus's lazily built, memoized
/// temporal hash index (`spec.md` §4.7.2/§5) through `corpus.temporal_hash()`
/// rather than a precomputed, possibly-absent field.
#[derive(Clone, Copy)]
pub struct ExecContext<'a> {
    pub indexes: &'a IndexSet<'a>,
    pub corpus: &'a Corpus<'a>,
    pub granularity: Granularity,
    pub granularity_size: i32,
}

impl<'a> ExecContext<'a> {
    pub fn new(corpus: &'a Corpus<'a>, granularity: Granularity, granularity_size: i32) -> Self {
        ExecContext {
            indexes: corpus.indexes(),
            corpus,
            granularity,
            granularity_size,
        }
    }
}

/// Execute a top-level query end to end.
///
/// When the query carries a join condition, each of `query.subqueries` is
/// materialized into a `QueryResult` keyed by its alias (§4.7.3's
/// "subquery context mapping alias → QueryResult"), and the join driver
/// resolves `alias.key` references against that map; `query.condition` is
/// not otherwise consulted in that case (see `DESIGN.md`). Without a join,
/// `query.condition` is executed directly.
pub fn run(query: &Query, corpus: &Corpus<'_>) -> Result<QueryResult> {
    if let Some(join_condition) = &query.join {
        let mut subqueries: HashMap<String, QueryResult> = HashMap::with_capacity(query.subqueries.len());
        for spec in &query.subqueries {
            let sub_ctx = ExecContext::new(corpus, spec.granularity, spec.granularity_size);
            let result = execute(&spec.condition, &sub_ctx)?;
            subqueries.insert(spec.alias.clone(), result);
        }
        return temporal::join::execute(
            join_condition,
            &subqueries,
            query.granularity,
            query.granularity_size,
        );
    }

    let ctx = ExecContext::new(corpus, query.granularity, query.granularity_size);
    execute(&query.condition, &ctx)
}

/// Execute one condition, recursing through `Logical`/`Not` as needed.
pub fn execute(condition: &Condition, ctx: &ExecContext<'_>) -> Result<QueryResult> {
    match condition {
        Condition::Contains(c) => contains::execute(c, ctx),
        Condition::Ner(c) => ner::execute(c, ctx),
        Condition::Pos(c) => pos::execute(c, ctx),
        Condition::Dependency(c) => dependency::execute(c, ctx),
        Condition::Temporal(c) => temporal::condition::execute(c, ctx),
        Condition::Logical(c) => logical::execute(c, ctx),
        Condition::Not(c) => not::execute(c, ctx),
    }
}
