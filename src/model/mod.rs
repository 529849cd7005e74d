//! Immutable value types shared by every executor and the result algebra.
//!
//! `Position`/`PositionList` are created by the index adapter and never
//! mutated. `MatchDetail`/`QueryResult` are created by an executor, shared
//! (by reference) by combinators, and retained to completion.

mod match_detail;
mod position;
mod query_result;
mod value;

pub use match_detail::{JoinSide, MatchDetail};
pub use position::{Position, PositionList};
pub use query_result::{Granularity, QueryResult};
pub use value::{normalize_variable_name, MatchValue, ValueType};
