use cardkit::card::{Card, CardEffect, CardInput, CardStep};
use cardkit::config::CardConfig;
use cardkit::scene::{Element, Point, Style, Surface};
use cardkit::schedule::{Schedule, Ticket};
use cardkit::transition::TransitionSet;
use cardkit::{ServiceCaller, StateSnapshot};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A timeout the card asked for. The caller arms it on the main loop and
/// feeds the ticket back through [`CardModel::step`].
pub type Timer = (Duration, Ticket<CardStep>);

/// Runs one card: feeds it input, applies its effects and keeps the
/// on-screen styles moving towards the card's scene.
pub struct CardModel {
    card: Box<dyn Card>,
    host: Box<dyn ServiceCaller>,
    transitions: TransitionSet,
    frames: Vec<Ticket<CardStep>>,
}

impl CardModel {
    pub fn new(card: Box<dyn Card>, host: Box<dyn ServiceCaller>) -> Self {
        let mut model = Self {
            card,
            host,
            transitions: TransitionSet::new(),
            frames: Vec::new(),
        };
        model.sync(Instant::now());
        model
    }

    pub fn tag(&self) -> &'static str {
        self.card.tag()
    }

    /// Swaps in a fresh card, e.g. after the configured type changed.
    pub fn replace_card(&mut self, card: Box<dyn Card>) {
        self.card.disconnect();
        self.card = card;
        self.frames.clear();
        self.transitions.clear();
        self.sync(Instant::now());
    }

    pub fn set_config(&mut self, config: CardConfig) {
        self.card.set_config(config);
        self.sync(Instant::now());
    }

    pub fn set_hass(&mut self, snapshot: &StateSnapshot) {
        self.card.set_hass(snapshot);
        self.sync(Instant::now());
    }

    pub fn connect(&mut self, surface: &dyn Surface) {
        self.card.connect(surface);
        self.sync(Instant::now());
    }

    /// Resets the card and drops every animation and pending frame.
    pub fn disconnect(&mut self) {
        self.card.disconnect();
        self.frames.clear();
        self.transitions.clear();
        self.sync(Instant::now());
    }

    pub fn is_animating(&self) -> bool {
        !self.frames.is_empty() || self.transitions.is_animating()
    }

    pub fn click(&mut self, point: Point, now: Instant) -> Vec<Timer> {
        let scene = self.card.scene();
        let target = scene.hit_test(point, |element| self.style_of(element, now));
        log::debug!("{}: click at ({:.0}, {:.0}) on {:?}", self.tag(), point.x, point.y, target);
        self.dispatch(vec![CardInput::Gesture(target)], now)
    }

    /// A timer armed from an earlier [`Timer`] has fired.
    pub fn step(&mut self, ticket: Ticket<CardStep>, now: Instant) -> Vec<Timer> {
        self.dispatch(vec![CardInput::Step(ticket)], now)
    }

    /// Called once per rendered frame. Delivers the frame callbacks requested
    /// before this frame and the transitions that ended by `now`.
    pub fn frame(&mut self, now: Instant) -> Vec<Timer> {
        let steps: Vec<_> = self.frames.drain(..).map(CardInput::Step).collect();
        let mut timers = self.dispatch(steps, now);

        let ended: Vec<_> = self
            .transitions
            .advance(now)
            .into_iter()
            .map(CardInput::TransitionEnd)
            .collect();
        timers.extend(self.dispatch(ended, now));
        timers
    }

    /// Everything to draw, back to front, with the style currently on screen.
    pub fn render_list(&self, now: Instant) -> Vec<(Element, Style)> {
        self.card
            .scene()
            .elements
            .into_iter()
            .map(|element| {
                let style = self.style_of(&element, now);
                (element, style)
            })
            .collect()
    }

    fn style_of(&self, element: &Element, now: Instant) -> Style {
        self.transitions
            .style(&element.id, now)
            .unwrap_or(element.style)
    }

    fn sync(&mut self, now: Instant) {
        self.transitions.sync(&self.card.scene(), now);
    }

    fn dispatch(&mut self, inputs: Vec<CardInput>, now: Instant) -> Vec<Timer> {
        let mut queue = VecDeque::from(inputs);
        let mut timers = Vec::new();

        while let Some(input) = queue.pop_front() {
            let effects = self.card.handle(input);
            self.sync(now);

            for effect in effects {
                match effect {
                    CardEffect::Schedule(Schedule::NextFrame(ticket)) => self.frames.push(ticket),
                    CardEffect::Schedule(Schedule::After(delay, ticket)) if delay.is_zero() => {
                        queue.push_back(CardInput::Step(ticket))
                    }
                    CardEffect::Schedule(Schedule::After(delay, ticket)) => {
                        timers.push((delay, ticket))
                    }
                    CardEffect::CallService(call) => {
                        if let Err(e) = self.host.call_service(call) {
                            log::error!("{}: service call failed: {}", self.card.tag(), e);
                        }
                    }
                }
            }
        }
        timers
    }
}
