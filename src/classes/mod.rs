//! Class list data
//!
//! Remote records are "user" objects from a JSON API; every field is
//! optional and any shape deviation falls back to a fixed string.

mod client;

pub use client::{ClassesClient, FetchError, DEFAULT_ENDPOINT};

use serde_json::Value;

pub const UNKNOWN_ID: &str = "unknown";
pub const UNKNOWN_NAME: &str = "Unknown Name";
pub const UNKNOWN_TEACHER: &str = "Unknown Teacher";
pub const UNKNOWN_ROOM: &str = "Unknown Room";

/// One card in the class list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
    pub id: String,
    pub name: String,
    pub teacher: String,
    pub room: String,
}

impl ClassRecord {
    /// Build a record from one remote object
    pub fn from_remote(user: &Value) -> Self {
        let id = display_value(user.get("id")).unwrap_or_else(|| UNKNOWN_ID.to_string());
        Self {
            id: format!("U-{}", id),
            name: display_value(user.get("name")).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            teacher: display_value(user.pointer("/company/name"))
                .unwrap_or_else(|| UNKNOWN_TEACHER.to_string()),
            room: display_value(user.pointer("/address/suite"))
                .unwrap_or_else(|| UNKNOWN_ROOM.to_string()),
        }
    }
}

/// Map a remote payload into class records.
///
/// The payload must be a JSON array; elements of any shape are accepted.
pub fn records_from_payload(payload: &Value) -> Result<Vec<ClassRecord>, FetchError> {
    let users = payload.as_array().ok_or(FetchError::UnexpectedShape)?;
    Ok(users.iter().map(ClassRecord::from_remote).collect())
}

/// Render a scalar for display. Falsy values (null, false, 0, "") yield None.
fn display_value(value: Option<&Value>) -> Option<String> {
    let value = value?;
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_well_formed_record() {
        let user = json!({
            "id": 1,
            "name": "Leanne Graham",
            "company": { "name": "Romaguera-Crona" },
            "address": { "suite": "Apt. 556" }
        });
        let record = ClassRecord::from_remote(&user);
        assert_eq!(
            record,
            ClassRecord {
                id: "U-1".to_string(),
                name: "Leanne Graham".to_string(),
                teacher: "Romaguera-Crona".to_string(),
                room: "Apt. 556".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_fields_use_fallbacks() {
        let record = ClassRecord::from_remote(&json!({}));
        assert_eq!(record.id, "U-unknown");
        assert_eq!(record.name, UNKNOWN_NAME);
        assert_eq!(record.teacher, UNKNOWN_TEACHER);
        assert_eq!(record.room, UNKNOWN_ROOM);
    }

    #[test]
    fn test_missing_company_only() {
        let user = json!({ "id": 7, "name": "Kurtis", "address": { "suite": "Suite 1" } });
        let record = ClassRecord::from_remote(&user);
        assert_eq!(record.teacher, UNKNOWN_TEACHER);
        assert_eq!(record.room, "Suite 1");
    }

    #[test]
    fn test_falsy_values_fall_back() {
        let user = json!({ "id": 0, "name": "", "company": null, "address": { "suite": null } });
        let record = ClassRecord::from_remote(&user);
        assert_eq!(record.id, "U-unknown");
        assert_eq!(record.name, UNKNOWN_NAME);
        assert_eq!(record.teacher, UNKNOWN_TEACHER);
        assert_eq!(record.room, UNKNOWN_ROOM);
    }

    #[test]
    fn test_null_element_is_absorbed() {
        let records = records_from_payload(&json!([null, { "id": "x9" }])).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "U-unknown");
        assert_eq!(records[1].id, "U-x9");
    }

    #[test]
    fn test_non_array_payload_is_rejected() {
        assert!(matches!(
            records_from_payload(&json!({ "users": [] })),
            Err(FetchError::UnexpectedShape)
        ));
    }
}
