use serde_json::{Map, Value};

/// A JSON object: the whole weather document, one day, or one hour.
pub type Record = Map<String, Value>;

/// Key that identifies a day (`YYYY-MM-DD`) or an hour (`HH:MM:SS`) record.
pub const DATETIME: &str = "datetime";
pub const DAYS: &str = "days";
pub const HOURS: &str = "hours";

/// Copy of `record` restricted to `fields`. Keys missing from the record are
/// left out rather than filled with null. `None` keeps every key.
pub fn project(record: &Record, fields: Option<&[&str]>) -> Record {
    match fields {
        None => record.clone(),
        Some(fields) => fields
            .iter()
            .filter_map(|name| record.get(*name).map(|v| ((*name).to_string(), v.clone())))
            .collect(),
    }
}

/// Same as [`project`] for a value that is expected to hold an object.
/// Non-object values project to an empty record.
pub fn project_value(value: &Value, fields: Option<&[&str]>) -> Record {
    value
        .as_object()
        .map(|record| project(record, fields))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_keeps_requested_keys_in_order_given() {
        let record = json!({"datetime": "2025-03-07", "temp": 15, "humidity": 0})
            .as_object()
            .cloned()
            .unwrap();

        let projected = project(&record, Some(&["humidity", "missing", "datetime"]));

        assert_eq!(projected.len(), 2);
        assert_eq!(projected.get("humidity"), Some(&json!(0)));
        assert!(!projected.contains_key("missing"));
        assert!(!projected.contains_key("temp"));
    }

    #[test]
    fn project_without_filter_is_a_copy() {
        let record = json!({"a": 1}).as_object().cloned().unwrap();
        assert_eq!(project(&record, None), record);
    }

    #[test]
    fn project_value_of_non_object_is_empty() {
        assert!(project_value(&json!(3), None).is_empty());
    }
}
