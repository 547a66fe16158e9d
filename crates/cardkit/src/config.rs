use crate::buttons::ScriptConfig;
use crate::host::EntityId;
use derive_more::{AsRef, Deref, Display};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use thiserror::Error;

pub const AIR_PURIFIER_CARD: &str = "air-purifier-card";
pub const MODE_SELECTOR_CARD: &str = "mode-selector-card";
pub const TOWER_FAN_CARD: &str = "tower-fan-card";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TagError {
    #[error("Card tag is empty")]
    Empty,
    #[error("Card tag '{0}' must start with a lowercase letter")]
    BadStart(String),
    #[error("Card tag '{0}' must contain a hyphen")]
    NoHyphen(String),
    #[error("Card tag '{0}' contains '{1}'")]
    BadChar(String, char),
}

/// Name a card is registered under, following custom element naming rules.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Display, Deref, AsRef, SerializeDisplay, DeserializeFromStr,
)]
pub struct CardTag(String);

impl CardTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CardTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first = s.chars().next().ok_or(TagError::Empty)?;
        if !first.is_ascii_lowercase() {
            return Err(TagError::BadStart(s.to_string()));
        }
        if !s.contains('-') {
            return Err(TagError::NoHyphen(s.to_string()));
        }
        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')))
        {
            return Err(TagError::BadChar(s.to_string(), c));
        }
        Ok(Self(s.to_string()))
    }
}

fn default_card_type() -> CardTag {
    CardTag(AIR_PURIFIER_CARD.to_string())
}

/// Per-card configuration handed over by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(rename = "type", default = "default_card_type")]
    pub card_type: CardTag,
    #[serde(default)]
    pub entity_id: Option<EntityId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub scripts: ScriptConfig,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            card_type: default_card_type(),
            entity_id: None,
            name: None,
            scripts: ScriptConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ScriptId;
    use serde_json::json;

    #[test]
    fn test_tag_validation() {
        let cases = vec![
            ("air-purifier-card", Ok(())),
            ("my-card2", Ok(())),
            ("", Err(TagError::Empty)),
            ("Card-x", Err(TagError::BadStart("Card-x".to_string()))),
            ("purifier", Err(TagError::NoHyphen("purifier".to_string()))),
            ("my-Card", Err(TagError::BadChar("my-Card".to_string(), 'C'))),
        ];

        for (tag, expected) in cases {
            assert_eq!(tag.parse::<CardTag>().map(|_| ()), expected, "{tag}");
        }
    }

    #[test]
    fn test_card_config_deserialization() {
        let config: CardConfig = serde_json::from_value(json!({
            "type": "tower-fan-card",
            "name": "Tower fan",
            "entity_id": "fan.tower",
            "power_script_id": "tower_power",
            "lock": "tower_lock"
        }))
        .unwrap();

        assert_eq!(config.card_type.as_str(), TOWER_FAN_CARD);
        assert_eq!(config.name.as_deref(), Some("Tower fan"));
        assert_eq!(config.entity_id, Some(EntityId::from("fan.tower")));
        assert_eq!(config.scripts.power, Some(ScriptId::from("tower_power")));
        assert_eq!(config.scripts.lock, Some(ScriptId::from("tower_lock")));
        assert_eq!(config.scripts.timer, None);

        let config: CardConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, CardConfig::default());
        assert_eq!(config.card_type.as_str(), AIR_PURIFIER_CARD);

        let bad = serde_json::from_value::<CardConfig>(json!({ "type": "nohyphen" }));
        assert!(bad.is_err());
    }
}
