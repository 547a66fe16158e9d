use super::{Card, CardEffect, CardInput};
use crate::buttons::ButtonAction;
use crate::config::{CardConfig, TOWER_FAN_CARD};
use crate::error::CardError;
use crate::host::StateSnapshot;
use crate::scene::{Content, Element, ElementId, Point, Scene, Shape, Style, Surface};
use strum::IntoEnumIterator;

const TITLE_CENTER: Point = Point { x: 150.0, y: 12.0 };
const NOTICE: &str = "Configuration error: name is required";

/// Remote-control style panel running one script per button.
pub struct TowerFanCard {
    config: CardConfig,
    configured: bool,
    host_ready: bool,
    buttons: Vec<ButtonAction>,
}

impl TowerFanCard {
    pub fn new() -> Self {
        Self {
            config: CardConfig::default(),
            configured: false,
            host_ready: false,
            buttons: ButtonAction::iter().collect(),
        }
    }

    pub fn is_inert(&self) -> bool {
        !self.configured
    }

    fn press(&self, action: ButtonAction) -> Result<CardEffect, CardError> {
        if !self.configured {
            return Err(CardError::Configuration("name"));
        }
        if !self.host_ready {
            return Err(CardError::HostUnavailable);
        }
        let call = self.config.scripts.press(action)?;
        log::info!("{}: {} -> {}.{}", TOWER_FAN_CARD, action, call.domain, call.service);
        Ok(CardEffect::CallService(call))
    }
}

impl Default for TowerFanCard {
    fn default() -> Self {
        Self::new()
    }
}

impl Card for TowerFanCard {
    fn tag(&self) -> &'static str {
        TOWER_FAN_CARD
    }

    fn set_config(&mut self, config: CardConfig) {
        self.configured = config.name.is_some();
        if !self.configured {
            log::error!("{}: {}", TOWER_FAN_CARD, CardError::Configuration("name"));
        }
        for action in config.scripts.unbound() {
            log::warn!(
                "{}: no script configured for '{}' ({})",
                TOWER_FAN_CARD,
                action,
                action.config_key()
            );
        }
        self.config = config;
    }

    fn set_hass(&mut self, _snapshot: &StateSnapshot) {
        self.host_ready = true;
    }

    fn connect(&mut self, surface: &dyn Surface) {
        self.buttons = ButtonAction::iter()
            .filter(|action| {
                let present = surface.contains(&ElementId::Button(*action));
                if !present {
                    log::warn!(
                        "{}: {}",
                        TOWER_FAN_CARD,
                        CardError::MissingElement(ElementId::Button(*action))
                    );
                }
                present
            })
            .collect();
    }

    fn disconnect(&mut self) {
        self.host_ready = false;
    }

    fn handle(&mut self, input: CardInput) -> Vec<CardEffect> {
        let CardInput::Gesture(Some(ElementId::Button(action))) = input else {
            return Vec::new();
        };
        if !self.buttons.contains(&action) {
            return Vec::new();
        }

        match self.press(action) {
            Ok(effect) => vec![effect],
            Err(e) => {
                log::warn!("{}: button '{}' ignored: {}", TOWER_FAN_CARD, action, e);
                Vec::new()
            }
        }
    }

    fn scene(&self) -> Scene {
        if !self.configured {
            return Scene::new(vec![Element::new(
                ElementId::Notice,
                Shape::Rect,
                Content::Text(NOTICE.to_string()),
                Style::rect(TITLE_CENTER, 300.0, 24.0),
            )]);
        }

        let title = Element::new(
            ElementId::Title,
            Shape::Rect,
            Content::Text(self.config.name.clone().unwrap_or_default()),
            Style::rect(TITLE_CENTER, 300.0, 24.0),
        );
        let buttons = self.buttons.iter().map(|action| {
            let (center, diameter) = action.placement();
            Element::new(
                ElementId::Button(*action),
                Shape::Circle,
                Content::Text(action.label().to_string()),
                Style::circle(center, diameter, diameter * 0.5),
            )
        });

        Scene::new(std::iter::once(title).chain(buttons).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ScriptId, ServiceCall};
    use crate::scene::FullSurface;
    use serde_json::json;
    use std::collections::HashSet;

    fn configured() -> TowerFanCard {
        let mut card = TowerFanCard::new();
        card.set_config(
            serde_json::from_value(json!({
                "type": "tower-fan-card",
                "name": "Tower fan",
                "power_script_id": "tower_power",
                "lock_script_id": "tower_lock",
            }))
            .unwrap(),
        );
        card.connect(&FullSurface);
        card.set_hass(&StateSnapshot::default());
        card
    }

    fn click(card: &mut TowerFanCard, action: ButtonAction) -> Vec<CardEffect> {
        card.handle(CardInput::Gesture(Some(ElementId::Button(action))))
    }

    #[test]
    fn test_button_runs_its_script() {
        let mut card = configured();
        assert_eq!(
            click(&mut card, ButtonAction::LockToggle),
            vec![CardEffect::CallService(ServiceCall::run_script(
                &ScriptId::from("tower_lock")
            ))]
        );
        assert_eq!(
            click(&mut card, ButtonAction::PowerToggle),
            vec![CardEffect::CallService(ServiceCall::run_script(
                &ScriptId::from("tower_power")
            ))]
        );
    }

    #[test]
    fn test_unbound_button_does_nothing() {
        let mut card = configured();
        assert!(click(&mut card, ButtonAction::Timer).is_empty());
        assert!(card.handle(CardInput::Gesture(None)).is_empty());
    }

    #[test]
    fn test_missing_name_renders_notice() {
        let mut card = TowerFanCard::new();
        card.set_config(CardConfig {
            card_type: TOWER_FAN_CARD.parse().unwrap(),
            ..Default::default()
        });
        card.set_hass(&StateSnapshot::default());

        assert!(card.is_inert());
        let scene = card.scene();
        assert_eq!(scene.elements.len(), 1);
        assert!(scene.get(&ElementId::Notice).is_some());
        assert!(click(&mut card, ButtonAction::PowerToggle).is_empty());
    }

    #[test]
    fn test_no_calls_before_state_arrives() {
        let mut card = configured();
        card.disconnect();
        assert!(click(&mut card, ButtonAction::PowerToggle).is_empty());
    }

    #[test]
    fn test_scene_has_every_connected_button() {
        let mut card = configured();
        assert_eq!(card.scene().elements.len(), 8);

        let surface: HashSet<ElementId> = [ButtonAction::PowerToggle, ButtonAction::Timer]
            .into_iter()
            .map(ElementId::Button)
            .collect();
        card.connect(&surface);
        assert_eq!(card.scene().elements.len(), 3);
        assert!(click(&mut card, ButtonAction::LockToggle).is_empty());
    }
}
