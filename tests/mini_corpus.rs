//! End-to-end coverage of the numbered scenarios over the tiny corpus:
//!
//! ```text
//! doc 1 sentence 0: "apple pie is served"
//! doc 1 sentence 1: "served daily"
//! doc 2 sentence 0: "apple juice"
//! doc 3 sentence 0: "Einstein was born in 1879"
//! ```

use std::collections::HashSet;

use qcore::condition::{
    Condition, ContainsCondition, ContainsTerm, LogicalCondition, LogicalOp, NerCondition,
    NotCondition, TemporalCondition, TemporalPredicate,
};
use qcore::exec::{self, ExecContext};
use qcore::index::{Corpus, IndexSet, InMemoryIndexAccess};
use qcore::model::{Granularity, Position};
use qcore::query::{Query, SubquerySpec};
use qcore::temporal::join::{JoinCondition, JoinKey, JoinType};
use time::{Date, Month};

struct MiniCorpus {
    unigram: InMemoryIndexAccess,
    bigram: InMemoryIndexAccess,
    ner: InMemoryIndexAccess,
    ner_date: InMemoryIndexAccess,
}

fn build_corpus() -> MiniCorpus {
    let mut unigram = InMemoryIndexAccess::new("unigram");
    unigram.insert(b"apple".to_vec(), vec![Position::in_sentence(1, 0, 0, 5)]);
    unigram.insert(b"pie".to_vec(), vec![Position::in_sentence(1, 0, 6, 9)]);
    unigram.insert(b"is".to_vec(), vec![Position::in_sentence(1, 0, 10, 12)]);
    unigram.insert(b"served".to_vec(), vec![Position::in_sentence(1, 0, 13, 19)]);
    unigram.insert(b"served".to_vec(), vec![Position::in_sentence(1, 1, 0, 6)]);
    unigram.insert(b"daily".to_vec(), vec![Position::in_sentence(1, 1, 7, 12)]);
    unigram.insert(b"apple".to_vec(), vec![Position::in_sentence(2, 0, 0, 5)]);
    unigram.insert(b"juice".to_vec(), vec![Position::in_sentence(2, 0, 6, 11)]);
    unigram.insert(b"einstein".to_vec(), vec![Position::in_sentence(3, 0, 0, 8)]);
    unigram.insert(b"was".to_vec(), vec![Position::in_sentence(3, 0, 9, 12)]);
    unigram.insert(b"born".to_vec(), vec![Position::in_sentence(3, 0, 13, 17)]);
    unigram.insert(b"in".to_vec(), vec![Position::in_sentence(3, 0, 18, 20)]);
    unigram.insert(b"1879".to_vec(), vec![Position::in_sentence(3, 0, 21, 25)]);

    let mut bigram = InMemoryIndexAccess::new("bigram");
    bigram.insert(
        b"apple\0pie".to_vec(),
        vec![Position::in_sentence(1, 0, 0, 9)],
    );
    bigram.insert(
        b"pie\0is".to_vec(),
        vec![Position::in_sentence(1, 0, 6, 12)],
    );
    bigram.insert(
        b"is\0served".to_vec(),
        vec![Position::in_sentence(1, 0, 10, 19)],
    );
    bigram.insert(
        b"apple\0juice".to_vec(),
        vec![Position::in_sentence(2, 0, 0, 11)],
    );

    let mut ner = InMemoryIndexAccess::new("ner");
    ner.insert(
        b"PERSON\0Einstein".to_vec(),
        vec![Position::in_sentence(3, 0, 0, 8)],
    );

    let mut ner_date = InMemoryIndexAccess::new("ner_date");
    ner_date.insert(b"18790101".to_vec(), vec![Position::in_sentence(3, 0, 21, 25)]);

    MiniCorpus {
        unigram,
        bigram,
        ner,
        ner_date,
    }
}

fn index_set(corpus: &MiniCorpus) -> IndexSet<'_> {
    let mut set: IndexSet = IndexSet::new();
    set.insert("unigram", &corpus.unigram);
    set.insert("bigram", &corpus.bigram);
    set.insert("ner", &corpus.ner);
    set.insert("ner_date", &corpus.ner_date);
    set
}

fn contains(terms: &[&str]) -> Condition {
    Condition::Contains(ContainsCondition {
        terms: terms
            .iter()
            .map(|t| ContainsTerm::Literal(t.to_string()))
            .collect(),
        variable: None,
    })
}

#[test]
fn scenario_1_bigram_contains_at_document_granularity() {
    let mini = build_corpus();
    let corpus = Corpus::new(index_set(&mini));
    let ctx = ExecContext::new(&corpus, Granularity::Document, 0);

    let result = exec::execute(&contains(&["apple", "pie"]), &ctx).unwrap();

    assert_eq!(result.len(), 1);
    let detail = &result.details()[0];
    assert_eq!(detail.document_id(), 1);
    assert_eq!(detail.value.as_text(), Some("apple pie"));
}

#[test]
fn scenario_2_and_at_document_granularity_narrows_to_shared_documents() {
    let mini = build_corpus();
    let corpus = Corpus::new(index_set(&mini));
    let ctx = ExecContext::new(&corpus, Granularity::Document, 0);

    let and_cond = Condition::Logical(LogicalCondition {
        op: LogicalOp::And,
        children: vec![contains(&["apple"]), contains(&["juice"])],
    });

    let result = exec::execute(&and_cond, &ctx).unwrap();
    let docs: HashSet<i32> = result.document_ids().collect();
    assert_eq!(docs, HashSet::from([2]));
}

#[test]
fn scenario_3_sentence_window_zero_requires_same_sentence() {
    let mini = build_corpus();
    let corpus = Corpus::new(index_set(&mini));
    let ctx = ExecContext::new(&corpus, Granularity::Sentence, 0);

    let and_cond = Condition::Logical(LogicalCondition {
        op: LogicalOp::And,
        children: vec![contains(&["apple"]), contains(&["served"])],
    });

    let result = exec::execute(&and_cond, &ctx).unwrap();
    let units: HashSet<(i32, i32)> = result.document_sentence_ids().collect();
    assert_eq!(units, HashSet::from([(1, 0)]));
}

#[test]
fn scenario_4_sentence_window_three_allows_the_adjacent_sentence() {
    let mini = build_corpus();
    let corpus = Corpus::new(index_set(&mini));
    let ctx = ExecContext::new(&corpus, Granularity::Sentence, 3);

    let and_cond = Condition::Logical(LogicalCondition {
        op: LogicalOp::And,
        children: vec![contains(&["apple"]), contains(&["served"])],
    });

    let result = exec::execute(&and_cond, &ctx).unwrap();
    let units: HashSet<(i32, i32)> = result.document_sentence_ids().collect();
    assert_eq!(units, HashSet::from([(1, 0), (1, 1)]));
}

#[test]
fn scenario_5_ner_person_binds_the_surface_text() {
    let mini = build_corpus();
    let corpus = Corpus::new(index_set(&mini));
    let ctx = ExecContext::new(&corpus, Granularity::Document, 0);

    let ner_cond = Condition::Ner(NerCondition {
        entity_type: "PERSON".to_string(),
        target: None,
        variable: Some("p".to_string()),
    });

    let result = exec::execute(&ner_cond, &ctx).unwrap();
    assert_eq!(result.len(), 1);
    let detail = &result.details()[0];
    assert_eq!(detail.document_id(), 3);
    assert_eq!(detail.value.as_text(), Some("Einstein"));
    assert_eq!(detail.variable_name.as_deref(), Some("?p"));
}

#[test]
fn scenario_6_temporal_between_uses_the_hash_index_and_returns_a_placeholder() {
    // Exercises `exec::run`, the documented single entry point, so the
    // lazily built, memoized per-corpus temporal hash index is reached
    // the same way a real caller would reach it — not wired in by hand.
    let mini = build_corpus();
    let corpus = Corpus::new(index_set(&mini));

    let temporal_cond = Condition::Temporal(TemporalCondition {
        predicate: TemporalPredicate::Contains,
        start: Date::from_calendar_date(1875, Month::January, 1).unwrap(),
        end: Some(Date::from_calendar_date(1880, Month::December, 31).unwrap()),
        variable: None,
    });
    let query = Query::new("mini", temporal_cond, Granularity::Document);

    let result = exec::run(&query, &corpus).unwrap();
    assert_eq!(result.len(), 1);
    let detail = &result.details()[0];
    assert_eq!(detail.document_id(), 3);
    assert!(detail.position.is_placeholder());

    // The hash index is built at most once per corpus; calling `run`
    // again must observe the already-built structure, not rebuild it.
    let second = exec::run(&query, &corpus).unwrap();
    assert_eq!(second.len(), 1);
}

#[test]
fn scenario_7_not_contains_apple_leaves_the_document_lacking_it() {
    let mini = build_corpus();
    let corpus = Corpus::new(index_set(&mini));
    let ctx = ExecContext::new(&corpus, Granularity::Document, 0);

    let not_cond = Condition::Not(NotCondition {
        child: Box::new(contains(&["apple"])),
    });

    let result = exec::execute(&not_cond, &ctx).unwrap();
    let docs: HashSet<i32> = result.document_ids().collect();
    assert_eq!(docs, HashSet::from([3]));
}

#[test]
fn scenario_8_run_resolves_a_temporal_join_across_subqueries_by_alias() {
    // `apple` (aliased `left`) and `einstein` (aliased `right`) each run as
    // their own subquery; the join condition's `alias.key` references are
    // resolved against the alias -> QueryResult map `exec::run` builds,
    // not against positional left/right arguments.
    let mini = build_corpus();
    let corpus = Corpus::new(index_set(&mini));

    let left_date = Condition::Temporal(TemporalCondition {
        predicate: TemporalPredicate::Equal,
        start: Date::from_calendar_date(1879, Month::January, 1).unwrap(),
        end: None,
        variable: Some("?d".to_string()),
    });
    let right_date = Condition::Temporal(TemporalCondition {
        predicate: TemporalPredicate::Equal,
        start: Date::from_calendar_date(1879, Month::January, 1).unwrap(),
        end: None,
        variable: Some("?d".to_string()),
    });

    let join = JoinCondition {
        left_alias: "left".to_string(),
        left_key: JoinKey::Variable("?d".to_string()),
        right_alias: "right".to_string(),
        right_key: JoinKey::Variable("?d".to_string()),
        join_type: JoinType::Inner,
        predicate: Some(TemporalPredicate::Equal),
        proximity_window_days: None,
    };

    let query = Query::new("mini", contains(&["apple"]), Granularity::Document).with_join(
        join,
        vec![
            SubquerySpec {
                alias: "left".to_string(),
                condition: left_date,
                granularity: Granularity::Document,
                granularity_size: 0,
            },
            SubquerySpec {
                alias: "right".to_string(),
                condition: right_date,
                granularity: Granularity::Document,
                granularity_size: 0,
            },
        ],
    );

    let result = exec::run(&query, &corpus).unwrap();
    assert_eq!(result.len(), 1);
    assert!(result.details()[0].is_join_result());
}
