//! Day/hour addressing.
//!
//! A record inside `days` (or inside one day's `hours`) is addressed either by
//! its `datetime` string or by its zero-based position. Resolution never fails
//! for a well-typed identifier: a miss is `None`. Only identifiers that are
//! neither a string nor a number are rejected.

use serde_json::{Number, Value};

use crate::{
    error::{Result, WeatherError},
    model::{DATETIME, Record},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// Match on the record's `datetime` field; the first match wins.
    Key(String),
    /// Zero-based position. Negative or too large positions resolve to nothing.
    Index(i64),
    /// A number with a fractional part. It is a position that no record
    /// occupies, so it never resolves.
    Fractional(String),
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::Key(key) => write!(f, "'{key}'"),
            Identifier::Index(index) => write!(f, "#{index}"),
            Identifier::Fractional(number) => write!(f, "#{number}"),
        }
    }
}

/// Anything that can address a day or an hour.
pub trait AnyIdentifier {
    fn into_identifier(self) -> Result<Identifier>;
}

impl AnyIdentifier for Identifier {
    fn into_identifier(self) -> Result<Identifier> {
        Ok(self)
    }
}

impl AnyIdentifier for &Identifier {
    fn into_identifier(self) -> Result<Identifier> {
        Ok(self.clone())
    }
}

impl AnyIdentifier for &str {
    fn into_identifier(self) -> Result<Identifier> {
        Ok(Identifier::Key(self.to_string()))
    }
}

impl AnyIdentifier for String {
    fn into_identifier(self) -> Result<Identifier> {
        Ok(Identifier::Key(self))
    }
}

impl AnyIdentifier for &String {
    fn into_identifier(self) -> Result<Identifier> {
        Ok(Identifier::Key(self.clone()))
    }
}

impl AnyIdentifier for usize {
    fn into_identifier(self) -> Result<Identifier> {
        Ok(Identifier::Index(i64::try_from(self).unwrap_or(i64::MAX)))
    }
}

impl AnyIdentifier for i64 {
    fn into_identifier(self) -> Result<Identifier> {
        Ok(Identifier::Index(self))
    }
}

impl AnyIdentifier for i32 {
    fn into_identifier(self) -> Result<Identifier> {
        Ok(Identifier::Index(i64::from(self)))
    }
}

impl AnyIdentifier for u32 {
    fn into_identifier(self) -> Result<Identifier> {
        Ok(Identifier::Index(i64::from(self)))
    }
}

impl AnyIdentifier for &Value {
    fn into_identifier(self) -> Result<Identifier> {
        match self {
            Value::String(key) => Ok(Identifier::Key(key.clone())),
            Value::Number(number) => Ok(number_to_index(number)),
            other => Err(WeatherError::InvalidIdentifierType(other.clone())),
        }
    }
}

impl AnyIdentifier for Value {
    fn into_identifier(self) -> Result<Identifier> {
        (&self).into_identifier()
    }
}

fn number_to_index(number: &Number) -> Identifier {
    if let Some(index) = number.as_i64() {
        return Identifier::Index(index);
    }
    if number.as_u64().is_some() {
        return Identifier::Index(i64::MAX);
    }
    match number.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => Identifier::Index(f as i64),
        _ => Identifier::Fractional(number.to_string()),
    }
}

/// Position of the record addressed by `id`, if any.
pub(crate) fn position_of(sequence: &[Value], id: &Identifier) -> Option<usize> {
    match id {
        Identifier::Key(key) => sequence
            .iter()
            .position(|item| item.get(DATETIME).and_then(Value::as_str) == Some(key.as_str())),
        Identifier::Index(index) => usize::try_from(*index)
            .ok()
            .filter(|index| *index < sequence.len()),
        Identifier::Fractional(_) => None,
    }
}

/// Looks up the record addressed by `id` in `sequence`.
pub fn resolve_by_identifier(sequence: &[Value], id: impl AnyIdentifier) -> Result<Option<&Value>> {
    let id = id.into_identifier()?;
    Ok(position_of(sequence, &id).map(|pos| &sequence[pos]))
}

/// Mutable counterpart of [`resolve_by_identifier`].
pub(crate) fn resolve_mut<'a>(sequence: &'a mut [Value], id: &Identifier) -> Option<&'a mut Value> {
    let pos = position_of(sequence, id)?;
    sequence.get_mut(pos)
}

/// Replaces the addressed record with `record`, keeping the original
/// `datetime`. Returns `false` without touching `sequence` when nothing matches.
pub fn replace_item_at(
    sequence: &mut [Value],
    id: impl AnyIdentifier,
    mut record: Record,
) -> Result<bool> {
    let id = id.into_identifier()?;
    let Some(target) = resolve_mut(sequence, &id) else {
        return Ok(false);
    };

    match target.get(DATETIME).cloned() {
        Some(datetime) => record.insert(DATETIME.to_string(), datetime),
        None => record.remove(DATETIME),
    };
    *target = Value::Object(record);

    Ok(true)
}

/// Shallow-merges `partial` onto the addressed record. The record's
/// `datetime` is never overwritten. Returns `false` when nothing matches.
pub fn merge_item_at(sequence: &mut [Value], id: impl AnyIdentifier, partial: Record) -> Result<bool> {
    let id = id.into_identifier()?;
    let Some(target) = resolve_mut(sequence, &id) else {
        return Ok(false);
    };

    merge_into(target, partial);
    Ok(true)
}

pub(crate) fn merge_into(target: &mut Value, partial: Record) {
    if !target.is_object() {
        *target = Value::Object(Record::new());
    }
    if let Value::Object(existing) = target {
        for (key, value) in partial {
            if key != DATETIME {
                existing.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn days() -> Vec<Value> {
        vec![
            json!({"datetime": "2025-03-07", "temp": 15, "humidity": 80}),
            json!({"datetime": "2025-03-08", "temp": 11}),
            json!({"datetime": "2025-03-07", "temp": 99}),
        ]
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn resolves_by_key_first_match() {
        let days = days();
        let found = resolve_by_identifier(&days, "2025-03-07").unwrap().unwrap();
        assert_eq!(found["temp"], json!(15));
    }

    #[test]
    fn resolves_by_index() {
        let days = days();
        let found = resolve_by_identifier(&days, 1usize).unwrap().unwrap();
        assert_eq!(found["datetime"], json!("2025-03-08"));
    }

    #[test]
    fn misses_are_none() {
        let days = days();
        assert!(resolve_by_identifier(&days, "1970-01-01").unwrap().is_none());
        assert!(resolve_by_identifier(&days, 3usize).unwrap().is_none());
        assert!(resolve_by_identifier(&days, -1i64).unwrap().is_none());
        assert!(resolve_by_identifier(&[], 0usize).unwrap().is_none());
    }

    #[test]
    fn json_identifiers_dispatch_on_type() {
        let days = days();
        let by_key = resolve_by_identifier(&days, json!("2025-03-08")).unwrap();
        let by_index = resolve_by_identifier(&days, json!(1)).unwrap();
        let by_float_index = resolve_by_identifier(&days, json!(1.0)).unwrap();
        assert_eq!(by_key, by_index);
        assert_eq!(by_index, by_float_index);
    }

    #[test]
    fn fractional_numbers_miss() {
        let mut days = days();
        let before = days.clone();

        assert_eq!(json!(0.5).into_identifier().unwrap(), Identifier::Fractional("0.5".into()));
        assert!(resolve_by_identifier(&days, json!(0.5)).unwrap().is_none());
        assert!(resolve_by_identifier(&days, json!(-2.25)).unwrap().is_none());
        assert!(!replace_item_at(&mut days, json!(1.5), record(json!({"temp": 1}))).unwrap());
        assert!(!merge_item_at(&mut days, json!(2.5), record(json!({"temp": 1}))).unwrap());
        assert_eq!(days, before);
    }

    #[test]
    fn invalid_identifier_types_are_rejected() {
        let days = days();
        for bad in [json!(null), json!(true), json!([0]), json!({"datetime": "x"})] {
            let err = resolve_by_identifier(&days, &bad).unwrap_err();
            match err {
                WeatherError::InvalidIdentifierType(value) => assert_eq!(value, bad),
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn replace_keeps_original_datetime() {
        let mut days = days();
        let replaced = replace_item_at(
            &mut days,
            "2025-03-08",
            record(json!({"datetime": "1999-12-31", "temp": 0})),
        )
        .unwrap();

        assert!(replaced);
        assert_eq!(days[1], json!({"datetime": "2025-03-08", "temp": 0}));
    }

    #[test]
    fn replace_by_index_drops_fields_not_in_replacement() {
        let mut days = days();
        replace_item_at(&mut days, 0usize, record(json!({"temp": 1}))).unwrap();
        assert_eq!(days[0], json!({"datetime": "2025-03-07", "temp": 1}));
    }

    #[test]
    fn replace_miss_is_noop() {
        let mut days = days();
        let before = days.clone();
        assert!(!replace_item_at(&mut days, "2000-01-01", Record::new()).unwrap());
        assert!(!replace_item_at(&mut days, 10usize, Record::new()).unwrap());
        assert_eq!(days, before);
    }

    #[test]
    fn merge_preserves_untouched_fields_and_datetime() {
        let mut days = days();
        let merged = merge_item_at(
            &mut days,
            0usize,
            record(json!({"datetime": "bogus", "temp": 20, "snow": 0})),
        )
        .unwrap();

        assert!(merged);
        assert_eq!(
            days[0],
            json!({"datetime": "2025-03-07", "temp": 20, "humidity": 80, "snow": 0})
        );
    }

    #[test]
    fn merge_with_bad_identifier_does_not_mutate() {
        let mut days = days();
        let before = days.clone();
        assert!(merge_item_at(&mut days, json!(false), record(json!({"temp": 1}))).is_err());
        assert_eq!(days, before);
    }
}
