use crate::mode::ModeId;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use thiserror::Error;

/// Relative layout height every card reports to the host.
pub const CARD_SIZE: u32 = 5;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct EntityId(String);

crate::impl_string_newtype!(EntityId);

impl EntityId {
    /// The part after the domain prefix, e.g. `living_room` for `fan.living_room`.
    pub fn object_id(&self) -> &str {
        self.0.split_once('.').map_or(self.0.as_str(), |(_, id)| id)
    }
}

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ScriptId(String);

crate::impl_string_newtype!(ScriptId);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityState {
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// String items of a list attribute; non-string items are dropped.
    pub fn attribute_list(&self, key: &str) -> Option<Vec<ModeId>> {
        self.attributes.get(key).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ModeId::from)
                .collect()
        })
    }
}

/// Live state delivered by the host. Every delivery replaces the previous one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSnapshot(HashMap<EntityId, EntityState>);

impl StateSnapshot {
    pub fn new(states: HashMap<EntityId, EntityState>) -> Self {
        Self(states)
    }

    pub fn get(&self, id: &EntityId) -> Option<&EntityState> {
        self.0.get(id)
    }

    pub fn insert(&mut self, id: EntityId, state: EntityState) {
        self.0.insert(id, state);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: Value,
}

impl ServiceCall {
    pub fn new(domain: impl Into<String>, service: impl Into<String>, data: Value) -> Self {
        Self {
            domain: domain.into(),
            service: service.into(),
            data,
        }
    }

    pub fn set_preset_mode(entity: &EntityId, mode: &ModeId) -> Self {
        Self::new(
            "fan",
            "set_preset_mode",
            json!({ "entity_id": entity.as_str(), "preset_mode": mode.as_str() }),
        )
    }

    pub fn run_script(script: &ScriptId) -> Self {
        Self::new(
            "homeassistant",
            "turn_on",
            json!({ "entity_id": format!("script.{}", script) }),
        )
    }
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Host connection closed")]
    Closed,
    #[error("Host is busy, dropped {0}.{1}")]
    Busy(String, String),
}

/// The single capability a card needs from its host.
pub trait ServiceCaller {
    fn call_service(&self, call: ServiceCall) -> Result<(), HostError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_deserialization() {
        let json = r#"{
            "fan.bedroom": {
                "state": "on",
                "attributes": {
                    "name": "Bedroom purifier",
                    "preset_modes": ["pollution", "allergen", 3, "sleep"],
                    "preset_mode": "allergen"
                }
            },
            "sensor.bedroom_pm2_5": { "state": "12" }
        }"#;

        let snapshot: StateSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.len(), 2);

        let fan = snapshot.get(&EntityId::from("fan.bedroom")).unwrap();
        assert_eq!(fan.attribute_str("name"), Some("Bedroom purifier"));
        assert_eq!(fan.attribute_str("preset_mode"), Some("allergen"));
        assert_eq!(
            fan.attribute_list("preset_modes").unwrap(),
            vec![
                ModeId::from("pollution"),
                ModeId::from("allergen"),
                ModeId::from("sleep")
            ]
        );

        let sensor = snapshot.get(&EntityId::from("sensor.bedroom_pm2_5")).unwrap();
        assert!(sensor.attributes.is_empty());
    }

    #[test]
    fn test_service_call_payloads() {
        let call =
            ServiceCall::set_preset_mode(&EntityId::from("fan.bedroom"), &ModeId::from("sleep"));
        assert_eq!(call.domain, "fan");
        assert_eq!(call.service, "set_preset_mode");
        assert_eq!(
            call.data,
            json!({ "entity_id": "fan.bedroom", "preset_mode": "sleep" })
        );

        let call = ServiceCall::run_script(&ScriptId::from("tower_fan_power"));
        assert_eq!(call.domain, "homeassistant");
        assert_eq!(call.service, "turn_on");
        assert_eq!(call.data, json!({ "entity_id": "script.tower_fan_power" }));
    }

    #[test]
    fn test_object_id() {
        assert_eq!(EntityId::from("fan.living_room").object_id(), "living_room");
        assert_eq!(EntityId::from("plain").object_id(), "plain");
    }
}
