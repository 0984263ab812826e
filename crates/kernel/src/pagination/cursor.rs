//! Opaque cursor encoding.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PaginationError;

/// Sort value recorded in a cursor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CursorValue {
    Integer(i64),
    Text(String),
}

/// Position of a row in a keyset ordering: its sort value, then its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub id: Uuid,
    pub value: CursorValue,
}

impl Cursor {
    pub fn new(id: Uuid, value: CursorValue) -> Self {
        Self { id, value }
    }

    /// Format: base64 of `{"id": "<uuid>", "value": <sort value>}`.
    pub fn encode(&self) -> String {
        // Serializing a uuid and a scalar cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        general_purpose::STANDARD.encode(json)
    }

    pub fn decode(cursor: &str) -> Result<Self, PaginationError> {
        let bytes = general_purpose::STANDARD
            .decode(cursor)
            .map_err(|e| PaginationError::invalid(format!("Invalid cursor format: {e}")))?;

        serde_json::from_slice(&bytes)
            .map_err(|e| PaginationError::invalid(format!("Invalid cursor contents: {e}")))
    }

    /// The (value, id) pair rows are ordered by.
    pub fn key(&self) -> (&CursorValue, &Uuid) {
        (&self.value, &self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_base64_json() {
        let id = Uuid::now_v7();
        let cursor = Cursor::new(id, CursorValue::Integer(1_700_000_000));
        let encoded = cursor.encode();

        let json = general_purpose::STANDARD.decode(&encoded).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(value["value"], 1_700_000_000);
        assert_eq!(value["id"], id.to_string());

        assert_eq!(Cursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn text_values_survive_decoding() {
        let cursor = Cursor::new(Uuid::nil(), CursorValue::Text("Ada".to_string()));
        assert_eq!(Cursor::decode(&cursor.encode()).unwrap(), cursor);
    }

    #[test]
    fn garbage_is_an_argument_error() {
        assert!(matches!(
            Cursor::decode("not base64!"),
            Err(PaginationError::InvalidArgument(_))
        ));

        let not_json = general_purpose::STANDARD.encode("offset:3");
        assert!(matches!(
            Cursor::decode(&not_json),
            Err(PaginationError::InvalidArgument(_))
        ));
    }
}
