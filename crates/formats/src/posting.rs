use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingError, Buildings};

/// One auto-posting analysis result as served by the posting service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoPostingResult {
    pub id: i64,
    /// JSON-encoded [`Buildings`].
    #[serde(rename = "analsPostingBuilds")]
    pub buildings_json: String,
    #[serde(rename = "analsPostingGroupId", default, deserialize_with = "string_or_number")]
    pub group_id: String,
    #[serde(rename = "analsPostingInfoName", default)]
    pub info_name: String,
}

impl AutoPostingResult {
    pub fn buildings(&self) -> Result<Buildings, BuildingError> {
        Buildings::from_json_str(&self.buildings_json)
    }
}

pub fn parse_auto_posting_results(
    payload: &str,
) -> Result<Vec<AutoPostingResult>, serde_json::Error> {
    serde_json::from_str(payload)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::parse_auto_posting_results;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_service_records() {
        let payload = r#"[
            {"id": 7, "analsPostingBuilds": "{}", "analsPostingGroupId": 134, "analsPostingInfoName": "case A"},
            {"id": 8, "analsPostingBuilds": "{\"b\": {\"floor\": {}}}", "analsPostingGroupId": "134"}
        ]"#;
        let results = parse_auto_posting_results(payload).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].group_id, "134");
        assert_eq!(results[0].info_name, "case A");
        assert_eq!(results[1].info_name, "");
        assert!(results[0].buildings().unwrap().is_empty());
        assert_eq!(results[1].buildings().unwrap().len(), 1);
    }

    #[test]
    fn missing_buildings_field_is_an_error() {
        assert!(parse_auto_posting_results(r#"[{"id": 1}]"#).is_err());
    }
}
