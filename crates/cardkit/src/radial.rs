//! Radial mode selector.
//!
//! The menu fans the available modes out around a central hub. Opening and
//! closing are transitions: the menu only accepts new gestures once every
//! option has reported the end of its move, so a slow renderer can never
//! interleave two sequences.

use crate::error::CardError;
use crate::mode::{IconToken, ModeId, ModeSet, icon_for};
use crate::scene::{
    Content, Easing, Element, ElementId, Point, Shape, Style, Surface, Timing, TransitionSpec,
};
use crate::schedule::{Epoch, Schedule, Ticket};
use std::f64::consts::PI;
use std::time::Duration;

pub const OPTION_MOVE: Timing = Timing::new(600, Easing::EaseOut);
pub const HUB_RESIZE: Timing = Timing::new(300, Easing::Ease);
/// Pause between fading the options out and dropping them.
pub const REMOVE_DELAY: Duration = Duration::from_millis(50);
/// Frames the options stay on the hub before moving out, so the renderer
/// has drawn the start position.
const SPAWN_FRAMES: u8 = 2;
const OPTION_ICON_RATIO: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialLayout {
    pub center: Point,
    pub hub_idle_diameter: f64,
    pub hub_open_diameter: f64,
    pub icon_idle_size: f64,
    pub icon_open_size: f64,
    pub option_diameter: f64,
    pub gap: f64,
}

impl RadialLayout {
    /// Large hub that shrinks while the menu is open.
    pub const PURIFIER: Self = Self {
        center: Point { x: 85.0, y: 150.0 },
        hub_idle_diameter: 120.0,
        hub_open_diameter: 50.0,
        icon_idle_size: 60.0,
        icon_open_size: 24.0,
        option_diameter: 30.0,
        gap: 5.0,
    };

    /// Fixed size hub.
    pub const SELECTOR: Self = Self {
        center: Point { x: 150.0, y: 150.0 },
        hub_idle_diameter: 50.0,
        hub_open_diameter: 50.0,
        icon_idle_size: 24.0,
        icon_open_size: 24.0,
        option_diameter: 30.0,
        gap: 5.0,
    };

    /// Distance from the hub center to every option center.
    pub fn distribution_radius(&self) -> f64 {
        self.hub_open_diameter / 2.0 + self.option_diameter / 2.0 + self.gap
    }

    pub fn angle(index: usize, count: usize) -> f64 {
        (index as f64 / count as f64) * 2.0 * PI
    }

    pub fn option_center(&self, index: usize, count: usize) -> Point {
        let angle = Self::angle(index, count);
        let radius = self.distribution_radius();
        self.center
            .offset(radius * angle.cos(), radius * angle.sin())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    Moving,
    Fading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Opening,
    Open,
    Closing(Teardown),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadialStep {
    Spawned { frames_left: u8 },
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedOption {
    pub mode: ModeId,
    pub angle_index: usize,
    pub center: Point,
    pub opacity: f64,
    settled: bool,
}

/// Whoever applies a mode change on the device.
pub trait ModeChange {
    fn change_mode(&mut self, mode: &ModeId) -> Result<(), CardError>;
}

type Schedules = Vec<Schedule<RadialStep>>;

#[derive(Debug, Clone)]
pub struct RadialMenu {
    layout: RadialLayout,
    phase: Phase,
    options: Vec<SpawnedOption>,
    hub_shrunk: bool,
    hub_icon: IconToken,
    epoch: Epoch,
    inert: bool,
}

impl RadialMenu {
    pub fn new(layout: RadialLayout) -> Self {
        Self {
            layout,
            phase: Phase::Closed,
            options: Vec::new(),
            hub_shrunk: false,
            hub_icon: icon_for(&ModeId::from("")),
            epoch: Epoch::default(),
            inert: false,
        }
    }

    pub fn layout(&self) -> &RadialLayout {
        &self.layout
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.phase, Phase::Opening | Phase::Closing(_))
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn options(&self) -> &[SpawnedOption] {
        &self.options
    }

    pub fn hub_icon(&self) -> &IconToken {
        &self.hub_icon
    }

    /// Shows `mode` on the hub, or the fallback icon with no selection.
    pub fn set_selected(&mut self, mode: Option<&ModeId>) {
        self.hub_icon = mode.map_or_else(|| icon_for(&ModeId::from("")), icon_for);
    }

    pub fn hub_style(&self) -> Style {
        let layout = &self.layout;
        if self.hub_shrunk {
            Style::circle(layout.center, layout.hub_open_diameter, layout.icon_open_size)
        } else {
            Style::circle(layout.center, layout.hub_idle_diameter, layout.icon_idle_size)
        }
    }

    fn ticket(&self, step: RadialStep) -> Ticket<RadialStep> {
        Ticket::new(self.epoch, step)
    }

    /// Spawns every mode except `selected` on the hub and schedules their
    /// move outwards.
    pub fn open(&mut self, modes: &ModeSet, selected: Option<&ModeId>) -> Schedules {
        if self.inert || self.phase != Phase::Closed {
            log::debug!("Radial menu: open ignored in {:?}", self.phase);
            return Vec::new();
        }

        let modes = modes.options(selected);
        if modes.is_empty() {
            log::warn!("Radial menu: no modes besides the selected one, not opening");
            return Vec::new();
        }

        let center = self.layout.center;
        self.options = modes
            .into_iter()
            .enumerate()
            .map(|(angle_index, mode)| SpawnedOption {
                mode,
                angle_index,
                center,
                opacity: 1.0,
                settled: false,
            })
            .collect();
        self.hub_shrunk = true;
        self.phase = Phase::Opening;
        log::debug!("Radial menu: opening with {} options", self.options.len());

        vec![Schedule::NextFrame(self.ticket(RadialStep::Spawned {
            frames_left: SPAWN_FRAMES - 1,
        }))]
    }

    /// Pulls the options back into the hub. They are faded and dropped once
    /// every one of them has arrived.
    pub fn close(&mut self) -> Schedules {
        if self.phase != Phase::Open {
            log::debug!("Radial menu: close ignored in {:?}", self.phase);
            return Vec::new();
        }

        let center = self.layout.center;
        for option in &mut self.options {
            option.center = center;
            option.settled = false;
        }
        self.hub_shrunk = false;
        self.phase = Phase::Closing(Teardown::Moving);
        Vec::new()
    }

    pub fn hub_gesture(&mut self, modes: &ModeSet, selected: Option<&ModeId>) -> Schedules {
        if self.inert || self.is_animating() {
            log::debug!("Radial menu: hub gesture ignored while animating");
            return Vec::new();
        }
        if self.is_open() {
            self.close()
        } else {
            self.open(modes, selected)
        }
    }

    /// Requests `mode` and collapses the menu. The hub shows the new mode
    /// right away, without waiting for the host to confirm it.
    pub fn option_gesture(&mut self, mode: &ModeId, sink: &mut impl ModeChange) -> Schedules {
        if self.inert || self.is_animating() {
            log::debug!("Radial menu: option gesture ignored while animating");
            return Vec::new();
        }
        if !self.options.iter().any(|o| &o.mode == mode) {
            return self.outside_gesture();
        }

        match sink.change_mode(mode) {
            Ok(()) => self.hub_icon = icon_for(mode),
            Err(e) => log::error!("Radial menu: cannot change mode to '{}': {}", mode, e),
        }
        self.close()
    }

    pub fn outside_gesture(&mut self) -> Schedules {
        if self.is_animating() {
            log::debug!("Radial menu: outside gesture ignored while animating");
            return Vec::new();
        }
        if self.is_open() {
            self.close()
        } else {
            Vec::new()
        }
    }

    /// Routes a gesture by what it hit. Anything other than the hub or a
    /// spawned option counts as outside.
    pub fn gesture(
        &mut self,
        target: Option<&ElementId>,
        modes: &ModeSet,
        selected: Option<&ModeId>,
        sink: &mut impl ModeChange,
    ) -> Schedules {
        match target {
            Some(ElementId::Hub) => self.hub_gesture(modes, selected),
            Some(ElementId::Option(mode)) => self.option_gesture(mode, sink),
            _ => self.outside_gesture(),
        }
    }

    pub fn on_step(&mut self, ticket: Ticket<RadialStep>) -> Schedules {
        if ticket.epoch != self.epoch {
            log::debug!("Radial menu: dropping stale {:?}", ticket.step);
            return Vec::new();
        }

        match (ticket.step, self.phase) {
            (RadialStep::Spawned { frames_left }, Phase::Opening) if frames_left > 0 => {
                vec![Schedule::NextFrame(self.ticket(RadialStep::Spawned {
                    frames_left: frames_left - 1,
                }))]
            }
            (RadialStep::Spawned { .. }, Phase::Opening) => {
                let count = self.options.len();
                for option in &mut self.options {
                    option.center = self.layout.option_center(option.angle_index, count);
                }
                Vec::new()
            }
            (RadialStep::Remove, Phase::Closing(Teardown::Fading)) => {
                self.options.clear();
                self.phase = Phase::Closed;
                log::debug!("Radial menu: closed");
                Vec::new()
            }
            (step, phase) => {
                log::debug!("Radial menu: {:?} has nothing to do in {:?}", step, phase);
                Vec::new()
            }
        }
    }

    /// Completion signal for an element's transition.
    pub fn transition_end(&mut self, id: &ElementId) -> Schedules {
        let ElementId::Option(mode) = id else {
            return Vec::new();
        };
        if !matches!(
            self.phase,
            Phase::Opening | Phase::Closing(Teardown::Moving)
        ) {
            return Vec::new();
        }

        if let Some(option) = self.options.iter_mut().find(|o| &o.mode == mode) {
            option.settled = true;
        }
        if !self.options.iter().all(|o| o.settled) {
            return Vec::new();
        }

        if self.phase == Phase::Opening {
            self.phase = Phase::Open;
            log::debug!("Radial menu: open");
            Vec::new()
        } else {
            for option in &mut self.options {
                option.opacity = 0.0;
            }
            self.phase = Phase::Closing(Teardown::Fading);
            vec![Schedule::After(
                REMOVE_DELAY,
                self.ticket(RadialStep::Remove),
            )]
        }
    }

    pub fn connect(&mut self, surface: &dyn Surface) {
        self.inert = !surface.contains(&ElementId::Hub);
        if self.inert {
            log::error!(
                "Radial menu: {}",
                CardError::MissingElement(ElementId::Hub)
            );
        }
    }

    /// Back to closed and idle. Anything still scheduled becomes stale.
    pub fn disconnect(&mut self) {
        self.epoch = self.epoch.next();
        self.options.clear();
        self.phase = Phase::Closed;
        self.hub_shrunk = false;
    }

    pub fn elements(&self) -> Vec<Element> {
        let hub = Element::new(
            ElementId::Hub,
            Shape::Circle,
            Content::Icon(self.hub_icon.clone()),
            self.hub_style(),
        )
        .with_transition(TransitionSpec {
            size: Some(HUB_RESIZE),
            ..Default::default()
        });

        let diameter = self.layout.option_diameter;
        let options = self.options.iter().map(|option| {
            Element::new(
                ElementId::Option(option.mode.clone()),
                Shape::Circle,
                Content::Icon(icon_for(&option.mode)),
                Style::circle(option.center, diameter, diameter * OPTION_ICON_RATIO)
                    .with_opacity(option.opacity),
            )
            .with_transition(TransitionSpec {
                position: Some(OPTION_MOVE),
                ..Default::default()
            })
        });

        std::iter::once(hub).chain(options).collect()
    }
}
