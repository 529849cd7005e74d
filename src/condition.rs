//! The parsed condition tree consumed by the dispatcher.
//!
//! The query parser itself is out of scope for this crate (see
//! `spec.md` §1/§6); this module defines the shape the parser is expected
//! to hand the core. `Condition` is a sealed, tagged variant — the
//! dispatcher in `crate::exec` is the one place with an exhaustive match
//! over it, and adding a new variant is meant to be a one-site change
//! there.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use time::Date;

/// One term within a CONTAINS condition: a literal (already lowercased by
/// the caller) or the wildcard token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainsTerm {
    Literal(String),
    Wildcard,
}

/// `terms.len()` selects the n-gram index: 1 → unigram, 2 → bigram,
/// 3 → trigram.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainsCondition {
    pub terms: Vec<ContainsTerm>,
    pub variable: Option<String>,
}

/// A named-entity condition. `entity_type` is the upper-case canonical
/// type, or `"*"` (accepted at parse time, rejected at execution — see
/// `crate::exec::ner`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NerCondition {
    pub entity_type: String,
    pub target: Option<String>,
    pub variable: Option<String>,
}

/// A part-of-speech condition. Literal mode supplies both `tag` and
/// `term` and produces no binding; variable mode supplies only `tag` and
/// binds every matching term to `variable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PosCondition {
    Literal { tag: String, term: String },
    Variable { tag: String, variable: String },
}

/// A dependency-relation condition over `governor`/`relation`/`dependent`.
/// Present in literal mode with no binding, or with `variable` set to
/// additionally bind the formatted triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyCondition {
    pub governor: String,
    pub relation: String,
    pub dependent: String,
    pub variable: Option<String>,
}

/// The ten temporal predicates a `Temporal` condition or a temporal join
/// may evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalPredicate {
    Before,
    After,
    BeforeEqual,
    AfterEqual,
    Equal,
    Contains,
    ContainedBy,
    Intersect,
    Proximity,
}

/// A temporal condition over the `ner_date` index. `end` defaults to
/// `start` when absent, per `spec.md` §4.7.1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemporalCondition {
    pub predicate: TemporalPredicate,
    pub start: Date,
    pub end: Option<Date>,
    pub variable: Option<String>,
}

impl TemporalCondition {
    pub fn effective_end(&self) -> Date {
        self.end.unwrap_or(self.start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalCondition {
    pub op: LogicalOp,
    pub children: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotCondition {
    pub child: Box<Condition>,
}

/// The sealed condition variant. The dispatcher's match over this is the
/// only place that knows the full set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Contains(ContainsCondition),
    Ner(NerCondition),
    Pos(PosCondition),
    Dependency(DependencyCondition),
    Temporal(TemporalCondition),
    Logical(LogicalCondition),
    Not(NotCondition),
}

impl Condition {
    /// A stable identifier derived from this condition's content, used
    /// only as `MatchDetail::condition_id` for tracing. Stable within one
    /// process run, which is all `spec.md` requires of it.
    pub fn stable_id(&self) -> String {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        format!("cond-{:016x}", hasher.finish())
    }

    /// A human-readable form used in error messages.
    pub fn display_form(&self) -> String {
        format!("{self:?}")
    }

    /// Variable names this condition (or any descendant) binds.
    pub fn produces(&self) -> HashSet<String> {
        let mut out = HashSet::new();
        self.collect_produces(&mut out);
        out
    }

    fn collect_produces(&self, out: &mut HashSet<String>) {
        match self {
            Condition::Contains(c) => {
                if let Some(v) = &c.variable {
                    out.insert(v.clone());
                }
            }
            Condition::Ner(c) => {
                if let Some(v) = &c.variable {
                    out.insert(v.clone());
                }
            }
            Condition::Pos(PosCondition::Variable { variable, .. }) => {
                out.insert(variable.clone());
            }
            Condition::Pos(PosCondition::Literal { .. }) => {}
            Condition::Dependency(c) => {
                if let Some(v) = &c.variable {
                    out.insert(v.clone());
                }
            }
            Condition::Temporal(c) => {
                if let Some(v) = &c.variable {
                    out.insert(v.clone());
                }
            }
            Condition::Logical(c) => {
                for child in &c.children {
                    child.collect_produces(out);
                }
            }
            Condition::Not(c) => c.child.collect_produces(out),
        }
    }

    /// Variable names this condition (or any descendant) consumes.
    ///
    /// None of the leaf executors in this spec reference a variable bound
    /// elsewhere in the tree — binding is always local to the condition
    /// that introduces it — so today this is always empty. It exists so
    /// the `AND` reordering hook in `crate::exec::logical` has a real
    /// producer/consumer contract to topologically sort against, the way
    /// `spec.md` §4.4 describes it, rather than a hook with no caller.
    pub fn consumes(&self) -> HashSet<String> {
        HashSet::new()
    }
}
