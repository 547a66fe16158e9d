//! Line protocol spoken on the aircard socket.
//!
//! Every message is a single line. Commands may be sent as bare words
//! (`show`, `hide`, `subscribe`) or as JSON objects tagged by `type`.

use crate::config::CardConfig;
use crate::host::{ServiceCall, StateSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/aircard.sock";

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Empty message")]
    Empty,
    #[error("Unknown command '{0}'")]
    UnknownCommand(String),
    #[error("Malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Messages a client sends to the daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Show,
    Hide,
    /// Keep the connection open and receive every service call the card makes.
    Subscribe,
    State { states: StateSnapshot },
    Config { config: CardConfig },
}

impl Request {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        match line {
            "" => Err(ProtocolError::Empty),
            "show" => Ok(Self::Show),
            "hide" => Ok(Self::Hide),
            "subscribe" => Ok(Self::Subscribe),
            _ if line.starts_with('{') => Ok(serde_json::from_str(line)?),
            _ => Err(ProtocolError::UnknownCommand(line.to_string())),
        }
    }

    pub fn to_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Messages the daemon pushes to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    CallService(ServiceCall),
}

impl Notification {
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line.trim())?)
    }

    pub fn to_line(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::EntityId;
    use serde_json::json;

    #[test]
    fn test_bare_words() {
        assert_eq!(Request::parse("show\n").unwrap(), Request::Show);
        assert_eq!(Request::parse("  hide").unwrap(), Request::Hide);
        assert_eq!(Request::parse("subscribe").unwrap(), Request::Subscribe);
        assert!(matches!(Request::parse(""), Err(ProtocolError::Empty)));
        assert!(matches!(
            Request::parse("reboot"),
            Err(ProtocolError::UnknownCommand(cmd)) if cmd == "reboot"
        ));
    }

    #[test]
    fn test_json_requests() {
        assert_eq!(Request::parse(r#"{"type":"show"}"#).unwrap(), Request::Show);

        let line = json!({
            "type": "state",
            "states": {
                "fan.living_room": {
                    "state": "on",
                    "attributes": { "preset_mode": "sleep" }
                }
            }
        })
        .to_string();
        let Request::State { states } = Request::parse(&line).unwrap() else {
            panic!("expected a state request");
        };
        let fan = states.get(&EntityId::from("fan.living_room")).unwrap();
        assert_eq!(fan.attribute_str("preset_mode"), Some("sleep"));

        let line = json!({ "type": "config", "config": { "type": "tower-fan-card", "name": "Fan" } })
            .to_string();
        let Request::Config { config } = Request::parse(&line).unwrap() else {
            panic!("expected a config request");
        };
        assert_eq!(config.name.as_deref(), Some("Fan"));

        assert!(matches!(
            Request::parse(r#"{"type":"launch"}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn test_notification_format() {
        let call = ServiceCall::set_preset_mode(&EntityId::from("fan.x"), &"turbo".into());
        let line = Notification::CallService(call.clone()).to_line().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "call_service",
                "domain": "fan",
                "service": "set_preset_mode",
                "data": { "entity_id": "fan.x", "preset_mode": "turbo" }
            })
        );
        assert_eq!(
            Notification::parse(&line).unwrap(),
            Notification::CallService(call)
        );
    }
}
