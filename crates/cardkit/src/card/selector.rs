use super::{Card, CardEffect, CardInput, CardStep, FanModes, ModeRequests, radial_effects};
use crate::config::{CardConfig, MODE_SELECTOR_CARD};
use crate::host::StateSnapshot;
use crate::radial::{RadialLayout, RadialMenu};
use crate::scene::{ElementId, Scene, Surface};
use crate::schedule::Ticket;

/// The mode dial on its own.
pub struct ModeSelectorCard {
    config: CardConfig,
    fan: FanModes,
    menu: RadialMenu,
}

impl ModeSelectorCard {
    pub fn new() -> Self {
        Self {
            config: CardConfig::default(),
            fan: FanModes::default(),
            menu: RadialMenu::new(RadialLayout::SELECTOR),
        }
    }

    pub fn menu(&self) -> &RadialMenu {
        &self.menu
    }

    fn gesture(&mut self, target: Option<ElementId>) -> Vec<CardEffect> {
        let mut requests =
            ModeRequests::new(self.config.entity_id.as_ref(), self.fan.host_ready);
        let schedules = self.menu.gesture(
            target.as_ref(),
            &self.fan.modes,
            self.fan.selected.as_ref(),
            &mut requests,
        );
        requests
            .into_effects()
            .chain(radial_effects(schedules))
            .collect()
    }
}

impl Default for ModeSelectorCard {
    fn default() -> Self {
        Self::new()
    }
}

impl Card for ModeSelectorCard {
    fn tag(&self) -> &'static str {
        MODE_SELECTOR_CARD
    }

    fn set_config(&mut self, config: CardConfig) {
        self.config = config;
    }

    fn set_hass(&mut self, snapshot: &StateSnapshot) {
        if let Err(e) = self.fan.update(self.config.entity_id.as_ref(), snapshot) {
            log::warn!("{}: {}", MODE_SELECTOR_CARD, e);
        }
        self.menu.set_selected(self.fan.selected.as_ref());
    }

    fn connect(&mut self, surface: &dyn Surface) {
        self.menu.connect(surface);
    }

    fn disconnect(&mut self) {
        self.menu.disconnect();
    }

    fn handle(&mut self, input: CardInput) -> Vec<CardEffect> {
        match input {
            CardInput::Gesture(target) => self.gesture(target),
            CardInput::Step(Ticket {
                epoch,
                step: CardStep::Radial(step),
            }) => radial_effects(self.menu.on_step(Ticket::new(epoch, step))).collect(),
            CardInput::Step(ticket) => {
                log::debug!("{}: no handler for {:?}", MODE_SELECTOR_CARD, ticket.step);
                Vec::new()
            }
            CardInput::TransitionEnd(id) => radial_effects(self.menu.transition_end(&id)).collect(),
        }
    }

    fn scene(&self) -> Scene {
        Scene::new(self.menu.elements())
    }
}
