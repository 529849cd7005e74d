//! The temporal subsystem: predicate evaluation, the direct/hash-index
//! condition executor, and the cross-condition temporal join.

pub mod condition;
pub mod hash_index;
pub mod join;
pub mod predicate;

pub use hash_index::TemporalHashIndex;

use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

const DATE_KEY_FORMAT: &[FormatItem<'static>] = format_description!("[year][month][day]");

/// Parse a raw `ner_date` key (`YYYYMMDD` ASCII bytes) into a `time::Date`.
pub fn parse_date_key(key: &[u8]) -> Result<Date, String> {
    let text = std::str::from_utf8(key).map_err(|e| format!("non-utf8 date key: {e}"))?;
    Date::parse(text, DATE_KEY_FORMAT).map_err(|e| format!("invalid date key `{text}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn parses_well_formed_date_key() {
        let date = parse_date_key(b"18790314").unwrap();
        assert_eq!(date, Date::from_calendar_date(1879, Month::March, 14).unwrap());
    }

    #[test]
    fn rejects_malformed_date_key() {
        assert!(parse_date_key(b"not-a-date").is_err());
    }
}
