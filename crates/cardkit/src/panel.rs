//! Filter slide-out.
//!
//! Tapping the device image fans the cover and the three filters out of the
//! device one after another, and tucks them back in reverse order on the
//! next tap. A sequence ends when the transition of its final overlay ends.

use crate::error::CardError;
use crate::scene::{
    AssetName, Content, Easing, Element, ElementId, Point, Shape, Style, Surface, Timing,
    TransitionSpec,
};
use crate::schedule::{Epoch, Schedule, Ticket};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};

pub const STAGGER: Duration = Duration::from_millis(200);
pub const SLIDE: Timing = Timing::new(500, Easing::EaseOut);
pub const FADE: Timing = Timing::new(500, Easing::EaseInOut);
pub const COVER_CLOSED_ASSET: &str = "cover-closed.svg";

/// Overlays in reveal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum Overlay {
    CoverOpen,
    PreFilter,
    CarbonFilter,
    HepaFilter,
}

impl Overlay {
    pub const FIRST: Self = Self::CoverOpen;
    pub const LAST: Self = Self::HepaFilter;

    /// Where the overlay sits when revealed, relative to the stack origin.
    pub fn offset(self) -> (f64, f64) {
        match self {
            Self::CoverOpen => (90.0, 40.0),
            Self::PreFilter => (70.0, 30.0),
            Self::CarbonFilter => (50.0, 20.0),
            Self::HepaFilter => (30.0, 10.0),
        }
    }

    pub fn asset(self) -> AssetName {
        AssetName::new(format!("{self}.svg"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    /// Center of the overlay stack while retracted.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStep {
    Reveal(Overlay),
    Hide(Overlay),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySlot {
    pub overlay: Overlay,
    pub present: bool,
    pub offset: (f64, f64),
    pub opacity: f64,
}

impl OverlaySlot {
    fn retracted(overlay: Overlay) -> Self {
        Self {
            overlay,
            present: true,
            offset: (0.0, 0.0),
            opacity: 0.0,
        }
    }
}

type Schedules = Vec<Schedule<PanelStep>>;

#[derive(Debug, Clone)]
pub struct SlidePanel {
    layout: PanelLayout,
    slots: Vec<OverlaySlot>,
    extended: bool,
    animating: bool,
    cover_closed_visible: bool,
    awaiting: Option<Overlay>,
    epoch: Epoch,
    inert: bool,
}

impl SlidePanel {
    pub fn new(layout: PanelLayout) -> Self {
        Self {
            layout,
            slots: Overlay::iter().map(OverlaySlot::retracted).collect(),
            extended: false,
            animating: false,
            cover_closed_visible: true,
            awaiting: None,
            epoch: Epoch::default(),
            inert: false,
        }
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    pub fn cover_closed_visible(&self) -> bool {
        self.cover_closed_visible
    }

    pub fn slot(&self, overlay: Overlay) -> Option<&OverlaySlot> {
        self.slots.iter().find(|s| s.overlay == overlay)
    }

    fn slot_mut(&mut self, overlay: Overlay) -> Option<&mut OverlaySlot> {
        self.slots.iter_mut().find(|s| s.overlay == overlay)
    }

    /// Starts the reveal or hide sequence, whichever is next.
    pub fn toggle(&mut self) -> Schedules {
        if self.inert {
            log::debug!("Slide panel: inert, toggle ignored");
            return Vec::new();
        }
        if self.animating {
            log::debug!("Slide panel: toggle ignored while animating");
            return Vec::new();
        }
        self.animating = true;

        let epoch = self.epoch;
        let steps: Vec<PanelStep> = if self.extended {
            Overlay::iter().rev().map(PanelStep::Hide).collect()
        } else {
            Overlay::iter().map(PanelStep::Reveal).collect()
        };

        steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| Schedule::After(STAGGER * i as u32, Ticket::new(epoch, step)))
            .collect()
    }

    pub fn on_step(&mut self, ticket: Ticket<PanelStep>) {
        if ticket.epoch != self.epoch || !self.animating {
            log::debug!("Slide panel: dropping stale {:?}", ticket.step);
            return;
        }

        let (overlay, revealing) = match ticket.step {
            PanelStep::Reveal(overlay) => (overlay, true),
            PanelStep::Hide(overlay) => (overlay, false),
        };
        let final_step = if revealing {
            overlay == Overlay::LAST
        } else {
            overlay == Overlay::FIRST
        };

        if revealing && overlay == Overlay::FIRST {
            self.cover_closed_visible = false;
        }

        let moved = match self.slot_mut(overlay) {
            Some(slot) if slot.present => {
                if revealing {
                    slot.offset = overlay.offset();
                    slot.opacity = 1.0;
                } else {
                    slot.offset = (0.0, 0.0);
                    slot.opacity = 0.0;
                }
                true
            }
            _ => false,
        };

        if final_step {
            if moved {
                self.awaiting = Some(overlay);
            } else {
                self.finish();
            }
        }
    }

    /// Completion signal for an element's transition.
    pub fn transition_end(&mut self, id: &ElementId) {
        if let ElementId::Overlay(overlay) = id
            && self.awaiting == Some(*overlay)
        {
            self.awaiting = None;
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.animating = false;
        self.extended = !self.extended;
        if !self.extended {
            self.cover_closed_visible = true;
        }
        log::debug!(
            "Slide panel: {}",
            if self.extended { "extended" } else { "retracted" }
        );
    }

    /// Overlays the surface cannot draw are skipped. Without the device image
    /// there is nothing to tap and the panel stays inert.
    pub fn connect(&mut self, surface: &dyn Surface) {
        self.inert = !surface.contains(&ElementId::DeviceImage);
        if self.inert {
            log::error!(
                "Slide panel: {}",
                CardError::MissingElement(ElementId::DeviceImage)
            );
        }

        for slot in &mut self.slots {
            let id = ElementId::Overlay(slot.overlay);
            slot.present = surface.contains(&id);
            if !slot.present {
                log::warn!("Slide panel: {}", CardError::MissingElement(id));
            }
        }
    }

    pub fn disconnect(&mut self) {
        self.epoch = self.epoch.next();
        for slot in &mut self.slots {
            slot.offset = (0.0, 0.0);
            slot.opacity = 0.0;
        }
        self.extended = false;
        self.animating = false;
        self.awaiting = None;
        self.cover_closed_visible = true;
    }

    /// Overlays back to front, topped by the closed cover.
    pub fn elements(&self) -> Vec<Element> {
        let layout = self.layout;
        let transition = TransitionSpec {
            position: Some(SLIDE),
            opacity: Some(FADE),
            ..Default::default()
        };
        let image = |id: ElementId, asset: AssetName, center: Point, opacity: f64| {
            Element::new(
                id,
                Shape::Rect,
                Content::Image(asset),
                Style::rect(center, layout.width, layout.height).with_opacity(opacity),
            )
            .with_transition(transition)
        };

        let overlays = self.slots.iter().rev().filter(|s| s.present).map(|slot| {
            let (dx, dy) = slot.offset;
            image(
                ElementId::Overlay(slot.overlay),
                slot.overlay.asset(),
                layout.origin.offset(dx, dy),
                slot.opacity,
            )
        });
        let cover = image(
            ElementId::CoverClosed,
            AssetName::from(COVER_CLOSED_ASSET),
            layout.origin,
            if self.cover_closed_visible { 1.0 } else { 0.0 },
        );

        overlays.chain(std::iter::once(cover)).collect()
    }
}
