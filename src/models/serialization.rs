//! Serde helpers shared by the stage and step records

use serde::{Deserialize, Deserializer};

/// Servers report ids either as strings or as numbers. Both normalize to a
/// string so that `step.stage_id == stage.id` compares like for like.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Integer(value) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "deserialize_id")]
        id: String,
    }

    #[test]
    fn test_numeric_id_becomes_string() {
        let holder: Holder = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(holder.id, "42");
    }

    #[test]
    fn test_string_id_is_kept() {
        let holder: Holder = serde_json::from_str(r#"{"id": "stage-7"}"#).unwrap();
        assert_eq!(holder.id, "stage-7");
    }

    #[test]
    fn test_other_id_types_are_rejected() {
        assert!(serde_json::from_str::<Holder>(r#"{"id": true}"#).is_err());
    }
}
