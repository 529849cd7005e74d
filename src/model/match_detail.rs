//! The atomic output record produced by a condition executor.

use serde::{Deserialize, Serialize};
use time::Date;

use super::position::Position;
use super::value::{normalize_variable_name, MatchValue, ValueType};

/// The right-hand side of a join-result detail, populated only by the
/// temporal joiner (see `crate::temporal::join`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JoinSide {
    pub right_value: MatchValue,
    pub right_value_type: ValueType,
    pub right_variable_name: Option<String>,
}

/// One matching position produced by a condition executor.
///
/// A `MatchDetail` may optionally carry a second, "right" triple — it is
/// then a join-result detail, created only by the temporal joiner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchDetail {
    pub value: MatchValue,
    pub value_type: ValueType,
    pub position: Position,
    pub condition_id: String,
    pub variable_name: Option<String>,
    pub join: Option<JoinSide>,
}

impl MatchDetail {
    pub fn new(
        value: MatchValue,
        value_type: ValueType,
        position: Position,
        condition_id: impl Into<String>,
    ) -> Self {
        MatchDetail {
            value,
            value_type,
            position,
            condition_id: condition_id.into(),
            variable_name: None,
            join: None,
        }
    }

    /// Attach a binding variable, normalizing its name.
    pub fn with_variable(mut self, variable_name: impl AsRef<str>) -> Self {
        self.variable_name = Some(normalize_variable_name(variable_name.as_ref()));
        self
    }

    /// Attach a join side, turning this into a join-result detail.
    pub fn with_join(mut self, join: JoinSide) -> Self {
        self.join = Some(join);
        self
    }

    pub fn document_id(&self) -> i32 {
        self.position.document_id
    }

    pub fn sentence_id(&self) -> i32 {
        self.position.sentence_id
    }

    /// The matched date, defined iff `value_type == Date`.
    pub fn matched_date(&self) -> Option<Date> {
        if matches!(self.value_type, ValueType::Date) {
            self.value.as_date()
        } else {
            None
        }
    }

    pub fn is_join_result(&self) -> bool {
        self.join.is_some()
    }
}
