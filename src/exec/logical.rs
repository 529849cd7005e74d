//! AND/OR executor.
//!
//! `AND` folds children left-to-right with intersection and short-circuits
//! to empty as soon as any child (or the running accumulator) is empty.
//! `OR` folds with union; empty children contribute nothing. An empty
//! child list is empty, never an error.
//!
//! Before folding, `AND` children are topologically reordered so
//! producers of a variable run before consumers of it, using each
//! condition's `produces()`/`consumes()` sets (`spec.md` §4.4). When a
//! cycle exists, the cyclic subsequence keeps its original order.

use std::collections::HashSet;

use crate::algebra;
use crate::condition::{Condition, LogicalCondition, LogicalOp};
use crate::error::Result;
use crate::model::QueryResult;

use super::ExecContext;

pub fn execute(condition: &LogicalCondition, ctx: &ExecContext<'_>) -> Result<QueryResult> {
    if condition.children.is_empty() {
        return Ok(QueryResult::empty(ctx.granularity, ctx.granularity_size));
    }

    match condition.op {
        LogicalOp::And => execute_and(&condition.children, ctx),
        LogicalOp::Or => execute_or(&condition.children, ctx),
    }
}

fn execute_and(children: &[Condition], ctx: &ExecContext<'_>) -> Result<QueryResult> {
    let ordered = reorder_producers_first(children);

    let mut acc: Option<QueryResult> = None;
    for child in ordered {
        let child_result = super::execute(child, ctx)?;
        if child_result.is_empty() {
            return Ok(QueryResult::empty(ctx.granularity, ctx.granularity_size));
        }
        acc = Some(match acc {
            None => child_result,
            Some(running) => {
                let next = algebra::intersect(&running, &child_result)?;
                if next.is_empty() {
                    return Ok(QueryResult::empty(ctx.granularity, ctx.granularity_size));
                }
                next
            }
        });
    }

    Ok(acc.unwrap_or_else(|| QueryResult::empty(ctx.granularity, ctx.granularity_size)))
}

fn execute_or(children: &[Condition], ctx: &ExecContext<'_>) -> Result<QueryResult> {
    let mut acc: Option<QueryResult> = None;
    for child in children {
        let child_result = super::execute(child, ctx)?;
        if child_result.is_empty() {
            continue;
        }
        acc = Some(match acc {
            None => child_result,
            Some(running) => algebra::union(&running, &child_result)?,
        });
    }

    Ok(acc.unwrap_or_else(|| QueryResult::empty(ctx.granularity, ctx.granularity_size)))
}

/// Topologically sort `children` so that any condition producing a
/// variable another condition consumes runs first. Falls back to
/// original order for a cyclic suffix it cannot schedule.
fn reorder_producers_first(children: &[Condition]) -> Vec<&Condition> {
    let n = children.len();
    let produces: Vec<HashSet<String>> = children.iter().map(|c| c.produces()).collect();
    let consumes: Vec<HashSet<String>> = children.iter().map(|c| c.consumes()).collect();

    // edge i -> j if i produces a variable j consumes.
    let mut out_edges: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree: Vec<usize> = vec![0; n];

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            if produces[i].iter().any(|v| consumes[j].contains(v)) {
                out_edges[i].push(j);
                in_degree[j] += 1;
            }
        }
    }

    let mut scheduled = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut in_degree_work = in_degree.clone();

    loop {
        // Kahn's algorithm, but prefer the lowest original index among
        // ready nodes so unconstrained children keep their input order.
        let ready = (0..n).find(|&i| !scheduled[i] && in_degree_work[i] == 0);
        match ready {
            Some(i) => {
                scheduled[i] = true;
                order.push(i);
                for &j in &out_edges[i] {
                    if in_degree_work[j] > 0 {
                        in_degree_work[j] -= 1;
                    }
                }
            }
            None => break,
        }
    }

    // Any remaining (cyclic) nodes keep their original relative order,
    // appended after everything that could be scheduled.
    for (i, &is_scheduled) in scheduled.iter().enumerate() {
        if !is_scheduled {
            order.push(i);
        }
    }

    order.into_iter().map(|i| &children[i]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::{ContainsCondition, ContainsTerm};

    fn contains(term: &str) -> Condition {
        Condition::Contains(ContainsCondition {
            terms: vec![ContainsTerm::Literal(term.to_string())],
            variable: None,
        })
    }

    #[test]
    fn reorder_is_stable_when_no_producer_consumer_edges_exist() {
        let children = vec![contains("a"), contains("b"), contains("c")];
        let ordered = reorder_producers_first(&children);
        assert_eq!(ordered, vec![&children[0], &children[1], &children[2]]);
    }
}
