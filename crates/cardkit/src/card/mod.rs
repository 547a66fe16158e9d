//! Dashboard cards.
//!
//! A card owns its controllers and turns host input into effects. It never
//! waits on anything itself: frames and timers are requested as
//! [`CardEffect::Schedule`] and come back as [`CardInput::Step`], transition
//! completions come back as [`CardInput::TransitionEnd`].

pub mod purifier;
pub mod selector;
pub mod tower_fan;

pub use purifier::PurifierCard;
pub use selector::ModeSelectorCard;
pub use tower_fan::TowerFanCard;

use crate::config::CardConfig;
use crate::error::CardError;
use crate::host::{CARD_SIZE, EntityId, ServiceCall, StateSnapshot};
use crate::mode::{ModeId, ModeSet};
use crate::panel::PanelStep;
use crate::radial::{ModeChange, RadialStep};
use crate::scene::{ElementId, Scene, Surface};
use crate::schedule::{Schedule, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStep {
    Radial(RadialStep),
    Panel(PanelStep),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardInput {
    /// A click, with whatever element it landed on.
    Gesture(Option<ElementId>),
    Step(Ticket<CardStep>),
    TransitionEnd(ElementId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardEffect {
    Schedule(Schedule<CardStep>),
    CallService(ServiceCall),
}

pub trait Card {
    fn tag(&self) -> &'static str;

    fn set_config(&mut self, config: CardConfig);

    /// Takes a complete state snapshot. Nothing from earlier deliveries is kept.
    fn set_hass(&mut self, snapshot: &StateSnapshot);

    /// Attaches the card to a surface. Missing elements disable the features
    /// that need them.
    fn connect(&mut self, surface: &dyn Surface);

    /// Resets every controller and invalidates anything still scheduled.
    fn disconnect(&mut self);

    fn handle(&mut self, input: CardInput) -> Vec<CardEffect>;

    fn scene(&self) -> Scene;

    fn card_size(&self) -> u32 {
        CARD_SIZE
    }
}

fn radial_effects(schedules: Vec<Schedule<RadialStep>>) -> impl Iterator<Item = CardEffect> {
    schedules
        .into_iter()
        .map(|s| CardEffect::Schedule(s.map(CardStep::Radial)))
}

fn panel_effects(schedules: Vec<Schedule<PanelStep>>) -> impl Iterator<Item = CardEffect> {
    schedules
        .into_iter()
        .map(|s| CardEffect::Schedule(s.map(CardStep::Panel)))
}

/// Mode list and selection read from the fan entity.
#[derive(Debug, Clone, Default)]
struct FanModes {
    modes: ModeSet,
    selected: Option<ModeId>,
    host_ready: bool,
}

impl FanModes {
    /// Replaces everything from `snapshot` and returns the device title. When
    /// the fan can't be read no modes are offered.
    fn update(
        &mut self,
        entity: Option<&EntityId>,
        snapshot: &StateSnapshot,
    ) -> Result<String, CardError> {
        self.host_ready = true;
        self.modes = ModeSet::new(Vec::new());
        self.selected = None;
        let entity = entity.ok_or(CardError::Configuration("entity_id"))?;
        let state = snapshot
            .get(entity)
            .ok_or_else(|| CardError::MissingEntity(entity.clone()))?;

        self.modes = state
            .attribute_list("preset_modes")
            .map(ModeSet::new)
            .unwrap_or_default();
        self.selected = state.attribute_str("preset_mode").map(ModeId::from);
        if self.selected.is_none() {
            log::warn!("Mode attribute not found for entity: {}", entity);
        }

        Ok(state
            .attribute_str("name")
            .or_else(|| state.attribute_str("friendly_name"))
            .unwrap_or(entity.object_id())
            .to_string())
    }
}

/// What to show in place of the device name when the fan can't be read.
fn placeholder(err: &CardError) -> &'static str {
    match err {
        CardError::Configuration(_) => "No entity configured",
        CardError::MissingEntity(_) => "Fan Entity not found",
        _ => "Unavailable",
    }
}

/// Collects `fan.set_preset_mode` calls for the configured entity.
struct ModeRequests<'a> {
    entity: Option<&'a EntityId>,
    host_ready: bool,
    calls: Vec<ServiceCall>,
}

impl<'a> ModeRequests<'a> {
    fn new(entity: Option<&'a EntityId>, host_ready: bool) -> Self {
        Self {
            entity,
            host_ready,
            calls: Vec::new(),
        }
    }

    fn into_effects(self) -> impl Iterator<Item = CardEffect> {
        self.calls.into_iter().map(CardEffect::CallService)
    }
}

impl ModeChange for ModeRequests<'_> {
    fn change_mode(&mut self, mode: &ModeId) -> Result<(), CardError> {
        if !self.host_ready {
            return Err(CardError::HostUnavailable);
        }
        let entity = self.entity.ok_or(CardError::Configuration("entity_id"))?;
        log::info!("Requesting preset mode '{}' for {}", mode, entity);
        self.calls.push(ServiceCall::set_preset_mode(entity, mode));
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::testing::fan_snapshot;

    #[test]
    fn test_fan_modes_update() {
        let mut fan = FanModes::default();
        let entity = EntityId::from("fan.living_room");
        let snapshot = fan_snapshot("fan.living_room", &["sleep", "turbo"], Some("turbo"));

        let title = fan.update(Some(&entity), &snapshot).unwrap();
        assert_eq!(title, "Living room purifier");
        assert_eq!(fan.modes.len(), 2);
        assert_eq!(fan.selected, Some(ModeId::from("turbo")));

        let snapshot = fan_snapshot("fan.living_room", &["sleep", "turbo"], None);
        fan.update(Some(&entity), &snapshot).unwrap();
        assert_eq!(fan.selected, None);
    }

    #[test]
    fn test_fan_modes_placeholders() {
        let mut fan = FanModes::default();
        let snapshot = StateSnapshot::default();

        let err = fan.update(None, &snapshot).unwrap_err();
        assert_eq!(placeholder(&err), "No entity configured");

        let err = fan
            .update(Some(&EntityId::from("fan.gone")), &snapshot)
            .unwrap_err();
        assert_eq!(placeholder(&err), "Fan Entity not found");
        assert!(fan.host_ready);
    }

    #[test]
    fn test_fan_modes_cleared_when_entity_vanishes() {
        let mut fan = FanModes::default();
        let entity = EntityId::from("fan.living_room");
        let snapshot = fan_snapshot("fan.living_room", &["sleep", "turbo"], Some("turbo"));
        fan.update(Some(&entity), &snapshot).unwrap();

        assert!(fan.update(Some(&entity), &StateSnapshot::default()).is_err());
        assert!(fan.modes.is_empty());
        assert_eq!(fan.selected, None);

        fan.update(Some(&entity), &snapshot).unwrap();
        assert!(fan.update(None, &snapshot).is_err());
        assert!(fan.modes.is_empty());
    }

    #[test]
    fn test_mode_requests() {
        let entity = EntityId::from("fan.bedroom");
        let mut requests = ModeRequests::new(Some(&entity), false);
        assert!(matches!(
            requests.change_mode(&ModeId::from("sleep")),
            Err(CardError::HostUnavailable)
        ));

        let mut requests = ModeRequests::new(None, true);
        assert!(matches!(
            requests.change_mode(&ModeId::from("sleep")),
            Err(CardError::Configuration("entity_id"))
        ));

        let mut requests = ModeRequests::new(Some(&entity), true);
        requests.change_mode(&ModeId::from("sleep")).unwrap();
        let effects: Vec<_> = requests.into_effects().collect();
        assert_eq!(
            effects,
            vec![CardEffect::CallService(ServiceCall::set_preset_mode(
                &entity,
                &ModeId::from("sleep")
            ))]
        );
    }
}
