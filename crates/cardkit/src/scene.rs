use crate::buttons::ButtonAction;
use crate::mode::{IconToken, ModeId};
use crate::panel::Overlay;
use derive_more::{AsRef, Deref, Display, From, Into};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// File name of an image the host resolves from its asset directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct AssetName(String);

crate::impl_string_newtype!(AssetName);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementId {
    Hub,
    Option(ModeId),
    DeviceImage,
    Overlay(Overlay),
    CoverClosed,
    Title,
    Button(ButtonAction),
    Notice,
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hub => write!(f, "hub"),
            Self::Option(mode) => write!(f, "option:{mode}"),
            Self::DeviceImage => write!(f, "device-image"),
            Self::Overlay(overlay) => write!(f, "overlay:{overlay}"),
            Self::CoverClosed => write!(f, "cover-closed"),
            Self::Title => write!(f, "title"),
            Self::Button(action) => write!(f, "button:{action}"),
            Self::Notice => write!(f, "notice"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Empty,
    Icon(IconToken),
    Image(AssetName),
    Text(String),
}

/// Resolved visual properties of an element. `center` is the middle of the
/// element's box; for circles `width` is the diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub icon_size: f64,
}

impl Style {
    pub fn circle(center: Point, diameter: f64, icon_size: f64) -> Self {
        Self {
            center,
            width: diameter,
            height: diameter,
            opacity: 1.0,
            icon_size,
        }
    }

    pub fn rect(center: Point, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
            opacity: 1.0,
            icon_size: 0.0,
        }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    Ease,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` onto the eased curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Ease => t * t * (3.0 - 2.0 * t),
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub duration: Duration,
    pub easing: Easing,
}

impl Timing {
    pub const fn new(millis: u64, easing: Easing) -> Self {
        Self {
            duration: Duration::from_millis(millis),
            easing,
        }
    }
}

/// Which property groups animate when they change. `None` means the change
/// applies immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionSpec {
    pub position: Option<Timing>,
    pub size: Option<Timing>,
    pub opacity: Option<Timing>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub shape: Shape,
    pub content: Content,
    pub style: Style,
    pub transition: TransitionSpec,
}

impl Element {
    pub fn new(id: ElementId, shape: Shape, content: Content, style: Style) -> Self {
        Self {
            id,
            shape,
            content,
            style,
            transition: TransitionSpec::default(),
        }
    }

    pub fn with_transition(self, transition: TransitionSpec) -> Self {
        Self { transition, ..self }
    }

    pub fn contains(&self, style: &Style, point: Point) -> bool {
        match self.shape {
            Shape::Circle => style.center.distance(point) <= style.width / 2.0,
            Shape::Rect => {
                (point.x - style.center.x).abs() <= style.width / 2.0
                    && (point.y - style.center.y).abs() <= style.height / 2.0
            }
        }
    }
}

/// Back-to-front list of everything a card wants drawn.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub elements: Vec<Element>,
}

impl Scene {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| &e.id == id)
    }

    /// Topmost visible element under `point`. `style_of` supplies the style
    /// currently on screen, which lags the target style while animating.
    pub fn hit_test<F>(&self, point: Point, style_of: F) -> Option<ElementId>
    where
        F: Fn(&Element) -> Style,
    {
        self.elements.iter().rev().find_map(|element| {
            let style = style_of(element);
            (style.opacity > 0.0 && element.contains(&style, point)).then(|| element.id.clone())
        })
    }
}

/// The elements a host is able to render for a card.
pub trait Surface {
    fn contains(&self, id: &ElementId) -> bool;
}

impl Surface for HashSet<ElementId> {
    fn contains(&self, id: &ElementId) -> bool {
        HashSet::contains(self, id)
    }
}

/// A surface that can render anything.
pub struct FullSurface;

impl Surface for FullSurface {
    fn contains(&self, _id: &ElementId) -> bool {
        true
    }
}
