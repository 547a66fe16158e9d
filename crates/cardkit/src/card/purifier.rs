use super::{
    Card, CardEffect, CardInput, CardStep, FanModes, ModeRequests, panel_effects, placeholder,
    radial_effects,
};
use crate::config::{AIR_PURIFIER_CARD, CardConfig};
use crate::host::StateSnapshot;
use crate::panel::{PanelLayout, SlidePanel};
use crate::radial::{RadialLayout, RadialMenu};
use crate::scene::{AssetName, Content, Element, ElementId, Point, Scene, Shape, Style, Surface};
use crate::schedule::Ticket;

pub const DEVICE_ASSET: &str = "device.png";
const DEVICE_CENTER: Point = Point { x: 280.0, y: 160.0 };
const DEVICE_SIZE: (f64, f64) = (150.0, 240.0);
const TITLE_CENTER: Point = Point { x: 200.0, y: 20.0 };
const PANEL: PanelLayout = PanelLayout {
    origin: Point { x: 265.0, y: 170.0 },
    width: 80.0,
    height: 120.0,
};

/// Air purifier: mode dial on the left, device picture with the filter
/// slide-out on the right.
pub struct PurifierCard {
    config: CardConfig,
    fan: FanModes,
    title: String,
    menu: RadialMenu,
    panel: SlidePanel,
}

impl PurifierCard {
    pub fn new() -> Self {
        Self {
            config: CardConfig::default(),
            fan: FanModes::default(),
            title: String::new(),
            menu: RadialMenu::new(RadialLayout::PURIFIER),
            panel: SlidePanel::new(PANEL),
        }
    }

    pub fn menu(&self) -> &RadialMenu {
        &self.menu
    }

    pub fn panel(&self) -> &SlidePanel {
        &self.panel
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    fn gesture(&mut self, target: Option<ElementId>) -> Vec<CardEffect> {
        let mut effects = Vec::new();

        if matches!(
            target,
            Some(ElementId::DeviceImage | ElementId::Overlay(_) | ElementId::CoverClosed)
        ) {
            effects.extend(panel_effects(self.panel.toggle()));
        }

        let mut requests =
            ModeRequests::new(self.config.entity_id.as_ref(), self.fan.host_ready);
        let schedules = self.menu.gesture(
            target.as_ref(),
            &self.fan.modes,
            self.fan.selected.as_ref(),
            &mut requests,
        );
        effects.extend(requests.into_effects());
        effects.extend(radial_effects(schedules));
        effects
    }
}

impl Default for PurifierCard {
    fn default() -> Self {
        Self::new()
    }
}

impl Card for PurifierCard {
    fn tag(&self) -> &'static str {
        AIR_PURIFIER_CARD
    }

    fn set_config(&mut self, config: CardConfig) {
        if config.entity_id.is_none() {
            log::error!("{}: configuration missing 'entity_id'", AIR_PURIFIER_CARD);
        }
        self.config = config;
    }

    fn set_hass(&mut self, snapshot: &StateSnapshot) {
        match self.fan.update(self.config.entity_id.as_ref(), snapshot) {
            Ok(title) => self.title = title,
            Err(e) => {
                log::warn!("{}: {}", AIR_PURIFIER_CARD, e);
                self.title = placeholder(&e).to_string();
            }
        }
        self.menu.set_selected(self.fan.selected.as_ref());
    }

    fn connect(&mut self, surface: &dyn Surface) {
        self.menu.connect(surface);
        self.panel.connect(surface);
    }

    fn disconnect(&mut self) {
        self.menu.disconnect();
        self.panel.disconnect();
    }

    fn handle(&mut self, input: CardInput) -> Vec<CardEffect> {
        match input {
            CardInput::Gesture(target) => self.gesture(target),
            CardInput::Step(Ticket {
                epoch,
                step: CardStep::Radial(step),
            }) => radial_effects(self.menu.on_step(Ticket::new(epoch, step))).collect(),
            CardInput::Step(Ticket {
                epoch,
                step: CardStep::Panel(step),
            }) => {
                self.panel.on_step(Ticket::new(epoch, step));
                Vec::new()
            }
            CardInput::TransitionEnd(id) => {
                self.panel.transition_end(&id);
                radial_effects(self.menu.transition_end(&id)).collect()
            }
        }
    }

    fn scene(&self) -> Scene {
        let title = Element::new(
            ElementId::Title,
            Shape::Rect,
            Content::Text(self.title.clone()),
            Style::rect(TITLE_CENTER, 360.0, 24.0),
        );
        let device = Element::new(
            ElementId::DeviceImage,
            Shape::Rect,
            Content::Image(AssetName::from(DEVICE_ASSET)),
            Style::rect(DEVICE_CENTER, DEVICE_SIZE.0, DEVICE_SIZE.1),
        );

        let mut elements = vec![title, device];
        elements.extend(self.panel.elements());
        elements.extend(self.menu.elements());
        Scene::new(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::testing::{Harness, fan_snapshot};
    use crate::host::{EntityId, ServiceCall};
    use crate::mode::ModeId;
    use crate::panel::Overlay;
    use crate::radial::Phase;

    fn card() -> Harness<PurifierCard> {
        let mut card = PurifierCard::new();
        card.set_config(CardConfig {
            entity_id: Some(EntityId::from("fan.living_room")),
            ..Default::default()
        });
        card.set_hass(&fan_snapshot(
            "fan.living_room",
            &["pollution", "allergen", "bacteria"],
            Some("allergen"),
        ));
        Harness::new(card)
    }

    #[test]
    fn test_hass_sets_title_and_hub_icon() {
        let harness = card();
        assert_eq!(harness.card.title(), "Living room purifier");
        assert_eq!(harness.card.menu().hub_icon().as_str(), "pap:allergen_mode");
        assert_eq!(harness.card.card_size(), 5);
    }

    #[test]
    fn test_missing_entity_shows_placeholder() {
        let mut card = PurifierCard::new();
        card.set_hass(&StateSnapshot::default());
        assert_eq!(card.title(), "No entity configured");

        card.set_config(CardConfig {
            entity_id: Some(EntityId::from("fan.elsewhere")),
            ..Default::default()
        });
        card.set_hass(&StateSnapshot::default());
        assert_eq!(card.title(), "Fan Entity not found");
    }

    #[test]
    fn test_each_delivery_replaces_fan_state() {
        let mut harness = card();
        harness.card.set_hass(&fan_snapshot(
            "fan.living_room",
            &["pollution", "allergen"],
            None,
        ));
        assert_eq!(harness.card.menu().hub_icon().as_str(), "pap:circle");

        harness.card.set_hass(&StateSnapshot::default());
        assert_eq!(harness.card.title(), "Fan Entity not found");
        harness.click(Some(ElementId::Hub));
        assert_eq!(harness.card.menu().phase(), Phase::Closed);
        assert!(harness.card.menu().options().is_empty());
        assert!(harness.calls.is_empty());
    }

    #[test]
    fn test_hub_click_opens_around_selected_mode() {
        let mut harness = card();
        harness.click(Some(ElementId::Hub));

        let menu = harness.card.menu();
        assert_eq!(menu.phase(), Phase::Open);
        let modes: Vec<_> = menu.options().iter().map(|o| o.mode.as_str()).collect();
        assert_eq!(modes, vec!["pollution", "bacteria"]);
    }

    #[test]
    fn test_option_click_calls_service_and_closes() {
        let mut harness = card();
        harness.click(Some(ElementId::Hub));
        harness.click(Some(ElementId::Option(ModeId::from("pollution"))));

        assert_eq!(
            harness.calls,
            vec![ServiceCall::set_preset_mode(
                &EntityId::from("fan.living_room"),
                &ModeId::from("pollution")
            )]
        );
        assert_eq!(
            harness.card.menu().hub_icon().as_str(),
            "pap:purification_only_mode"
        );
        assert_eq!(harness.card.menu().phase(), Phase::Closed);
        assert!(harness.card.scene().get(&ElementId::Option(ModeId::from("bacteria"))).is_none());
    }

    #[test]
    fn test_device_click_toggles_panel_and_closes_menu() {
        let mut harness = card();
        harness.click(Some(ElementId::Hub));
        harness.click(Some(ElementId::DeviceImage));

        assert_eq!(harness.card.menu().phase(), Phase::Closed);
        assert!(harness.card.panel().is_extended());
        assert!(!harness.card.panel().is_animating());
        assert!(harness.calls.is_empty());

        harness.click(Some(ElementId::Overlay(Overlay::CoverOpen)));
        let panel = harness.card.panel();
        assert!(!panel.is_extended());
        assert!(panel.cover_closed_visible());
        let cover = harness.card.scene();
        assert_eq!(cover.get(&ElementId::CoverClosed).unwrap().style.opacity, 1.0);
    }

    #[test]
    fn test_background_click_while_closed_does_nothing() {
        let mut harness = card();
        harness.click(None);
        assert_eq!(harness.card.menu().phase(), Phase::Closed);
        assert!(!harness.card.panel().is_animating());
    }

    #[test]
    fn test_disconnect_resets_controllers() {
        let mut card = card().card;
        let pending = card.handle(CardInput::Gesture(Some(ElementId::DeviceImage)));
        assert_eq!(pending.len(), 4);
        card.disconnect();

        for effect in pending {
            if let CardEffect::Schedule(schedule) = effect {
                card.handle(CardInput::Step(schedule.ticket().clone()));
            }
        }
        assert!(!card.panel().is_animating());
        assert!(!card.panel().is_extended());
    }
}
