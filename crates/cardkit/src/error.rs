use crate::host::{EntityId, HostError};
use crate::scene::ElementId;
use thiserror::Error;

/// Everything a card can trip over. None of these ever reach the host: cards
/// log them and keep rendering in a degraded state.
#[derive(Error, Debug)]
pub enum CardError {
    #[error("Configuration missing '{0}'")]
    Configuration(&'static str),
    #[error("Entity '{0}' not found in state snapshot")]
    MissingEntity(EntityId),
    #[error("Element '{0}' not available on the rendering surface")]
    MissingElement(ElementId),
    #[error("Host not available, state has not been delivered yet")]
    HostUnavailable,
    #[error(transparent)]
    Host(#[from] HostError),
}
