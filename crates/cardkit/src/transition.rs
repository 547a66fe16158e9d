//! Property transitions for scene elements.
//!
//! A [`TransitionSet`] follows the target styles of a [`Scene`] and
//! interpolates towards them over time. Every element whose running tweens
//! have all finished is reported once from [`TransitionSet::advance`], which
//! is what the controllers use as their completion signal.

use crate::scene::{Element, ElementId, Point, Scene, Style, Timing};
use std::collections::HashMap;
use std::time::Instant;

pub trait Lerp: Copy + PartialEq {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, to: Self, t: f64) -> Self {
        Point::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t))
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween<T> {
    from: T,
    to: T,
    start: Instant,
    timing: Timing,
}

impl<T: Lerp> Tween<T> {
    fn progress(&self, now: Instant) -> f64 {
        let total = self.timing.duration.as_secs_f64();
        if total <= 0.0 {
            return 1.0;
        }
        (now.saturating_duration_since(self.start).as_secs_f64() / total).min(1.0)
    }

    fn sample(&self, now: Instant) -> T {
        let t = self.timing.easing.apply(self.progress(now));
        self.from.lerp(self.to, t)
    }

    fn finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

#[derive(Debug, Clone, Copy)]
enum Prop<T> {
    Still(T),
    Moving(Tween<T>),
}

impl<T: Lerp> Prop<T> {
    fn target(&self) -> T {
        match self {
            Self::Still(value) => *value,
            Self::Moving(tween) => tween.to,
        }
    }

    fn value(&self, now: Instant) -> T {
        match self {
            Self::Still(value) => *value,
            Self::Moving(tween) => tween.sample(now),
        }
    }

    fn is_moving(&self) -> bool {
        matches!(self, Self::Moving(_))
    }

    /// Returns true when a tween was started.
    fn retarget(&mut self, to: T, timing: Option<Timing>, now: Instant) -> bool {
        if self.target() == to {
            return false;
        }
        match timing.filter(|t| !t.duration.is_zero()) {
            Some(timing) => {
                *self = Self::Moving(Tween {
                    from: self.value(now),
                    to,
                    start: now,
                    timing,
                });
                true
            }
            None => {
                *self = Self::Still(to);
                false
            }
        }
    }

    fn settle(&mut self, now: Instant) {
        if let Self::Moving(tween) = self
            && tween.finished(now)
        {
            let to = tween.to;
            *self = Self::Still(to);
        }
    }

    fn finish(&mut self) {
        *self = Self::Still(self.target());
    }
}

#[derive(Debug, Clone)]
struct Track {
    center: Prop<Point>,
    width: Prop<f64>,
    height: Prop<f64>,
    icon_size: Prop<f64>,
    opacity: Prop<f64>,
    pending_end: bool,
}

impl Track {
    fn still(style: Style) -> Self {
        Self {
            center: Prop::Still(style.center),
            width: Prop::Still(style.width),
            height: Prop::Still(style.height),
            icon_size: Prop::Still(style.icon_size),
            opacity: Prop::Still(style.opacity),
            pending_end: false,
        }
    }

    fn retarget(&mut self, element: &Element, now: Instant) {
        let spec = element.transition;
        let style = element.style;
        let started = [
            self.center.retarget(style.center, spec.position, now),
            self.width.retarget(style.width, spec.size, now),
            self.height.retarget(style.height, spec.size, now),
            self.icon_size.retarget(style.icon_size, spec.size, now),
            self.opacity.retarget(style.opacity, spec.opacity, now),
        ];
        if started.contains(&true) {
            self.pending_end = true;
        }
    }

    fn is_moving(&self) -> bool {
        self.center.is_moving()
            || self.width.is_moving()
            || self.height.is_moving()
            || self.icon_size.is_moving()
            || self.opacity.is_moving()
    }

    fn settle(&mut self, now: Instant) {
        self.center.settle(now);
        self.width.settle(now);
        self.height.settle(now);
        self.icon_size.settle(now);
        self.opacity.settle(now);
    }

    fn finish(&mut self) {
        self.center.finish();
        self.width.finish();
        self.height.finish();
        self.icon_size.finish();
        self.opacity.finish();
    }

    fn style(&self, now: Instant) -> Style {
        Style {
            center: self.center.value(now),
            width: self.width.value(now),
            height: self.height.value(now),
            opacity: self.opacity.value(now),
            icon_size: self.icon_size.value(now),
        }
    }

    /// Reports a completed transition exactly once.
    fn take_end(&mut self) -> bool {
        let ended = self.pending_end && !self.is_moving();
        if ended {
            self.pending_end = false;
        }
        ended
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransitionSet {
    tracks: HashMap<ElementId, Track>,
}

impl TransitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows the target styles of `scene`. Elements seen for the first time
    /// start at their target, elements no longer in the scene are dropped.
    pub fn sync(&mut self, scene: &Scene, now: Instant) {
        self.tracks
            .retain(|id, _| scene.elements.iter().any(|e| &e.id == id));

        for element in &scene.elements {
            self.tracks
                .entry(element.id.clone())
                .and_modify(|track| track.retarget(element, now))
                .or_insert_with(|| Track::still(element.style));
        }
    }

    /// Settles finished tweens and returns the elements whose transition ended.
    pub fn advance(&mut self, now: Instant) -> Vec<ElementId> {
        self.tracks
            .iter_mut()
            .filter_map(|(id, track)| {
                track.settle(now);
                track.take_end().then(|| id.clone())
            })
            .collect()
    }

    /// Jumps every tween to its end and reports the ones that were running.
    pub fn finish_all(&mut self) -> Vec<ElementId> {
        self.tracks
            .iter_mut()
            .filter_map(|(id, track)| {
                track.finish();
                track.take_end().then(|| id.clone())
            })
            .collect()
    }

    pub fn style(&self, id: &ElementId, now: Instant) -> Option<Style> {
        self.tracks.get(id).map(|track| track.style(now))
    }

    pub fn is_animating(&self) -> bool {
        self.tracks.values().any(Track::is_moving)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Content, Easing, Shape, TransitionSpec};
    use std::time::Duration;

    const MOVE: Timing = Timing::new(600, Easing::Linear);

    fn hub_at(x: f64, y: f64) -> Scene {
        Scene::new(vec![
            Element::new(
                ElementId::Hub,
                Shape::Circle,
                Content::Empty,
                Style::circle(Point::new(x, y), 50.0, 24.0),
            )
            .with_transition(TransitionSpec {
                position: Some(MOVE),
                ..Default::default()
            }),
        ])
    }

    #[test]
    fn test_new_elements_do_not_animate() {
        let now = Instant::now();
        let mut set = TransitionSet::new();
        set.sync(&hub_at(10.0, 10.0), now);

        assert!(!set.is_animating());
        assert!(set.advance(now).is_empty());
        assert_eq!(
            set.style(&ElementId::Hub, now).unwrap().center,
            Point::new(10.0, 10.0)
        );
    }

    #[test]
    fn test_position_change_ends_once() {
        let start = Instant::now();
        let mut set = TransitionSet::new();
        set.sync(&hub_at(0.0, 0.0), start);
        set.sync(&hub_at(100.0, 0.0), start);
        assert!(set.is_animating());

        let half = start + Duration::from_millis(300);
        assert!(set.advance(half).is_empty());
        let x = set.style(&ElementId::Hub, half).unwrap().center.x;
        assert!((x - 50.0).abs() < 1e-6);

        let end = start + Duration::from_millis(600);
        assert_eq!(set.advance(end), vec![ElementId::Hub]);
        assert!(set.advance(end + Duration::from_millis(16)).is_empty());
        assert!(!set.is_animating());
    }

    #[test]
    fn test_untimed_change_is_immediate() {
        let now = Instant::now();
        let mut set = TransitionSet::new();
        let mut scene = hub_at(0.0, 0.0);
        set.sync(&scene, now);

        scene.elements[0].style.opacity = 0.0;
        set.sync(&scene, now);

        assert!(!set.is_animating());
        assert!(set.advance(now).is_empty());
        assert_eq!(set.style(&ElementId::Hub, now).unwrap().opacity, 0.0);
    }

    #[test]
    fn test_finish_all_reports_running() {
        let now = Instant::now();
        let mut set = TransitionSet::new();
        set.sync(&hub_at(0.0, 0.0), now);
        set.sync(&hub_at(0.0, 80.0), now);

        assert_eq!(set.finish_all(), vec![ElementId::Hub]);
        assert_eq!(
            set.style(&ElementId::Hub, now).unwrap().center,
            Point::new(0.0, 80.0)
        );
    }

    #[test]
    fn test_removed_elements_are_dropped() {
        let now = Instant::now();
        let mut set = TransitionSet::new();
        set.sync(&hub_at(0.0, 0.0), now);
        set.sync(&Scene::default(), now);
        assert!(set.style(&ElementId::Hub, now).is_none());
    }
}
