//! Wire shapes exchanged with the sink

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::reconcile::Table;

/// Submission payload: both result tables plus addressing and auth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub secret: String,
    #[serde(rename = "sheetId")]
    pub sheet_id: String,
    /// Merged sums
    pub resultats: Table,
    /// Scaled variant
    pub ml: Table,
}

impl Envelope {
    pub fn new(
        secret: impl Into<String>,
        sheet_id: impl Into<String>,
        resultats: Table,
        ml: Table,
    ) -> Self {
        Envelope {
            secret: secret.into(),
            sheet_id: sheet_id.into(),
            resultats,
            ml,
        }
    }
}

/// Acknowledgment returned by the sink
///
/// Bodies that are not JSON objects are kept under `metadata["raw"]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Ack {
    /// Parse a response body leniently
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(value @ Value::Object(_)) => {
                serde_json::from_value(value).unwrap_or_else(|_| Ack::raw(body))
            }
            _ => Ack::raw(body),
        }
    }

    fn raw(body: &str) -> Self {
        let mut metadata = Map::new();
        metadata.insert("raw".to_string(), Value::String(body.to_string()));
        Ack {
            metadata,
            ..Default::default()
        }
    }

    /// Explicit `ok: false`
    pub fn is_rejection(&self) -> bool {
        self.ok == Some(false)
    }
}

/// Response of `?action=ml`
#[derive(Debug, Clone, Deserialize)]
pub struct MlResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub data: Option<Table>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `?action=latestSuivi`
#[derive(Debug, Clone, Deserialize)]
pub struct LatestTrackingResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub latest: Option<LatestTracking>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Most recent tracking file known to the sink
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestTracking {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::Cell;
    use serde_json::json;

    #[test]
    fn test_envelope_field_names() {
        let table = Table::new(
            vec!["Contact".into(), "nombre colonne carton 2024-01-01".into()],
            vec![vec![Cell::from("amy"), Cell::Number(2.0)]],
        );
        let envelope = Envelope::new("s3cret", "sheet-1", table.clone(), Table::empty());
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            json,
            json!({
                "secret": "s3cret",
                "sheetId": "sheet-1",
                "resultats": {
                    "headers": ["Contact", "nombre colonne carton 2024-01-01"],
                    "rows": [["amy", 2.0]]
                },
                "ml": { "headers": ["Contact"], "rows": [] }
            })
        );
    }

    #[test]
    fn test_ack_from_json_body() {
        let ack = Ack::from_body(r#"{"ok": true, "written": 12}"#);
        assert_eq!(ack.ok, Some(true));
        assert_eq!(ack.metadata.get("written"), Some(&json!(12)));
        assert!(!ack.is_rejection());

        let ack = Ack::from_body(r#"{"ok": false, "error": "bad secret"}"#);
        assert!(ack.is_rejection());
        assert_eq!(ack.error.as_deref(), Some("bad secret"));
    }

    #[test]
    fn test_ack_from_opaque_body() {
        let ack = Ack::from_body("<html>done</html>");
        assert_eq!(ack.ok, None);
        assert_eq!(ack.metadata.get("raw"), Some(&json!("<html>done</html>")));

        let ack = Ack::from_body("[1,2]");
        assert_eq!(ack.metadata.get("raw"), Some(&json!("[1,2]")));
    }
}
