pub mod buttons;
pub mod card;
pub mod config;
pub mod error;
pub mod host;
pub mod macros;
pub mod mode;
pub mod panel;
pub mod protocol;
pub mod radial;
pub mod registry;
pub mod scene;
pub mod schedule;
pub mod transition;

pub use card::{Card, CardEffect, CardInput, CardStep};
pub use error::CardError;
pub use host::{EntityId, ServiceCall, ServiceCaller, StateSnapshot};
pub use registry::ComponentRegistry;
