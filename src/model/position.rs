//! Position and position-list value types.

use serde::{Deserialize, Serialize};

/// A single occurrence of a matched key inside one document.
///
/// `sentence_id = -1` means "document-level, no sentence known".
/// `begin_char = end_char = -1` means this is a placeholder position (used
/// by the NOT complement and by temporal-hash-index results, which only
/// carry a document or (document, sentence) identifier). `source_tag` is an
/// optional annotation the index adapter may attach to a position (e.g.
/// which annotation pass produced it); the core reads it but never
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub document_id: i32,
    pub sentence_id: i32,
    pub begin_char: i32,
    pub end_char: i32,
    #[serde(default)]
    pub source_tag: Option<String>,
}

impl Position {
    /// A full position with character offsets and no sentence.
    pub fn document_level(document_id: i32, begin_char: i32, end_char: i32) -> Self {
        Position {
            document_id,
            sentence_id: -1,
            begin_char,
            end_char,
            source_tag: None,
        }
    }

    /// A full position scoped to one sentence.
    pub fn in_sentence(
        document_id: i32,
        sentence_id: i32,
        begin_char: i32,
        end_char: i32,
    ) -> Self {
        Position {
            document_id,
            sentence_id,
            begin_char,
            end_char,
            source_tag: None,
        }
    }

    /// Attach a source tag to this position, overwriting any previous one.
    pub fn with_source_tag(mut self, tag: impl Into<String>) -> Self {
        self.source_tag = Some(tag.into());
        self
    }

    /// A placeholder position carrying only a document identifier.
    pub fn placeholder_document(document_id: i32) -> Self {
        Position {
            document_id,
            sentence_id: -1,
            begin_char: -1,
            end_char: -1,
            source_tag: None,
        }
    }

    /// A placeholder position carrying a document and sentence identifier.
    pub fn placeholder_sentence(document_id: i32, sentence_id: i32) -> Self {
        Position {
            document_id,
            sentence_id,
            begin_char: -1,
            end_char: -1,
            source_tag: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.begin_char == -1 && self.end_char == -1
    }

    pub fn is_document_level(&self) -> bool {
        self.sentence_id == -1
    }
}

/// An ordered sequence of positions sharing one index key.
///
/// Positions within a list may span many documents; the core never
/// reorders them, and does not assume any particular order coming out of
/// the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionList(pub Vec<Position>);

impl PositionList {
    pub fn new(positions: Vec<Position>) -> Self {
        PositionList(positions)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl IntoIterator for PositionList {
    type Item = Position;
    type IntoIter = std::vec::IntoIter<Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PositionList {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Position> for PositionList {
    fn from_iter<T: IntoIterator<Item = Position>>(iter: T) -> Self {
        PositionList(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_source_tag_attaches_without_disturbing_other_fields() {
        let position = Position::in_sentence(1, 0, 3, 7).with_source_tag("ocr-pass-2");
        assert_eq!(position.source_tag.as_deref(), Some("ocr-pass-2"));
        assert_eq!(position.document_id, 1);
        assert!(!position.is_placeholder());
    }

    #[test]
    fn deserializes_positions_with_no_source_tag_field() {
        let position: Position =
            serde_json::from_str(r#"{"document_id":1,"sentence_id":0,"begin_char":0,"end_char":5}"#)
                .unwrap();
        assert_eq!(position.source_tag, None);
    }
}
