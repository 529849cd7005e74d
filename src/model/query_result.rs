//! Immutable aggregate of `MatchDetail`s plus granularity metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

use time::Date;

use super::match_detail::MatchDetail;

/// Whether results are grouped per document or per (document, sentence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Document,
    Sentence,
}

/// An immutable container of `MatchDetail`s plus granularity metadata.
///
/// Groupings by document, by (document, sentence), by matched date, and by
/// variable name are memoized views: they are computed on first access and
/// cached, and never diverge from the underlying detail list because that
/// list is immutable once the result is built.
#[derive(Debug)]
pub struct QueryResult {
    granularity: Granularity,
    granularity_size: i32,
    details: Vec<MatchDetail>,
    by_document: OnceLock<HashMap<i32, Vec<usize>>>,
    by_document_sentence: OnceLock<HashMap<(i32, i32), Vec<usize>>>,
    by_matched_date: OnceLock<HashMap<Date, Vec<usize>>>,
    by_variable: OnceLock<HashMap<String, Vec<usize>>>,
}

impl Clone for QueryResult {
    fn clone(&self) -> Self {
        QueryResult {
            granularity: self.granularity,
            granularity_size: self.granularity_size,
            details: self.details.clone(),
            by_document: OnceLock::new(),
            by_document_sentence: OnceLock::new(),
            by_matched_date: OnceLock::new(),
            by_variable: OnceLock::new(),
        }
    }
}

impl QueryResult {
    pub fn new(granularity: Granularity, granularity_size: i32, details: Vec<MatchDetail>) -> Self {
        QueryResult {
            granularity,
            granularity_size,
            details,
            by_document: OnceLock::new(),
            by_document_sentence: OnceLock::new(),
            by_matched_date: OnceLock::new(),
            by_variable: OnceLock::new(),
        }
    }

    pub fn empty(granularity: Granularity, granularity_size: i32) -> Self {
        Self::new(granularity, granularity_size, Vec::new())
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn granularity_size(&self) -> i32 {
        self.granularity_size
    }

    pub fn details(&self) -> &[MatchDetail] {
        &self.details
    }

    pub fn into_details(self) -> Vec<MatchDetail> {
        self.details
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    /// Two results combine only if both granularity and size agree.
    pub fn matches_shape(&self, other: &QueryResult) -> bool {
        self.granularity == other.granularity && self.granularity_size == other.granularity_size
    }

    fn by_document_index(&self) -> &HashMap<i32, Vec<usize>> {
        self.by_document.get_or_init(|| {
            let mut map: HashMap<i32, Vec<usize>> = HashMap::new();
            for (i, d) in self.details.iter().enumerate() {
                map.entry(d.document_id()).or_default().push(i);
            }
            map
        })
    }

    fn by_document_sentence_index(&self) -> &HashMap<(i32, i32), Vec<usize>> {
        self.by_document_sentence.get_or_init(|| {
            let mut map: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
            for (i, d) in self.details.iter().enumerate() {
                map.entry((d.document_id(), d.sentence_id()))
                    .or_default()
                    .push(i);
            }
            map
        })
    }

    fn by_matched_date_index(&self) -> &HashMap<Date, Vec<usize>> {
        self.by_matched_date.get_or_init(|| {
            let mut map: HashMap<Date, Vec<usize>> = HashMap::new();
            for (i, d) in self.details.iter().enumerate() {
                if let Some(date) = d.matched_date() {
                    map.entry(date).or_default().push(i);
                }
            }
            map
        })
    }

    fn by_variable_index(&self) -> &HashMap<String, Vec<usize>> {
        self.by_variable.get_or_init(|| {
            let mut map: HashMap<String, Vec<usize>> = HashMap::new();
            for (i, d) in self.details.iter().enumerate() {
                if let Some(name) = &d.variable_name {
                    map.entry(name.clone()).or_default().push(i);
                }
            }
            map
        })
    }

    pub fn document_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.by_document_index().keys().copied()
    }

    pub fn document_sentence_ids(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.by_document_sentence_index().keys().copied()
    }

    pub fn details_for_document(&self, document_id: i32) -> impl Iterator<Item = &MatchDetail> {
        self.by_document_index()
            .get(&document_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.details[i])
    }

    pub fn details_for_document_sentence(
        &self,
        document_id: i32,
        sentence_id: i32,
    ) -> impl Iterator<Item = &MatchDetail> {
        self.by_document_sentence_index()
            .get(&(document_id, sentence_id))
            .into_iter()
            .flatten()
            .map(move |&i| &self.details[i])
    }

    pub fn details_for_matched_date(&self, date: Date) -> impl Iterator<Item = &MatchDetail> {
        self.by_matched_date_index()
            .get(&date)
            .into_iter()
            .flatten()
            .map(move |&i| &self.details[i])
    }

    pub fn details_for_variable(&self, variable_name: &str) -> impl Iterator<Item = &MatchDetail> {
        self.by_variable_index()
            .get(variable_name)
            .into_iter()
            .flatten()
            .map(move |&i| &self.details[i])
    }
}
