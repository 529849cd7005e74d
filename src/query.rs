//! The top-level parsed query consumed by this crate.
//!
//! Everything upstream of this (tokenizing a query language, resolving
//! `alias.key` references, building the `Condition` tree) is out of scope
//! per `spec.md` §1 and §6; this struct is the contract the parser hands
//! to `crate::exec::execute`.

use crate::condition::Condition;
use crate::model::Granularity;
use crate::temporal::join::JoinCondition;

/// One named subquery: a condition tree executed independently of the
/// top-level `Query::condition`, at its own granularity, and registered
/// under `alias` in the join driver's alias→`QueryResult` map (`spec.md`
/// §4.7.3, §6).
#[derive(Debug, Clone)]
pub struct SubquerySpec {
    pub alias: String,
    pub condition: Condition,
    pub granularity: Granularity,
    pub granularity_size: i32,
}

/// A fully parsed, ready-to-execute query over one corpus.
#[derive(Debug, Clone)]
pub struct Query {
    /// Name of the source corpus; carried for diagnostics only — the
    /// actual index handles are supplied separately as an `IndexSet`.
    pub corpus: String,
    pub condition: Condition,
    pub granularity: Granularity,
    /// The sentence-window parameter. Only meaningful (and only read) at
    /// `Granularity::Sentence`; ignored at `Granularity::Document`.
    pub granularity_size: i32,
    /// Named subqueries a `join` condition resolves `alias.key` references
    /// against. Empty unless `join` is set.
    pub subqueries: Vec<SubquerySpec>,
    /// The cross-subquery temporal join (`spec.md` §4.7.3). When set,
    /// `exec::run` materializes `subqueries` and returns the join's
    /// output instead of executing `condition` directly.
    pub join: Option<JoinCondition>,
}

impl Query {
    pub fn new(corpus: impl Into<String>, condition: Condition, granularity: Granularity) -> Self {
        Query {
            corpus: corpus.into(),
            condition,
            granularity,
            granularity_size: 0,
            subqueries: Vec::new(),
            join: None,
        }
    }

    pub fn with_window(mut self, window: i32) -> Self {
        self.granularity_size = window;
        self
    }

    pub fn with_join(mut self, join: JoinCondition, subqueries: Vec<SubquerySpec>) -> Self {
        self.join = Some(join);
        self.subqueries = subqueries;
        self
    }
}
