use std::time::Duration;

/// Generation counter of a controller. Tickets from an older epoch are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A deferred callback handed to the host and given back when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<S> {
    pub epoch: Epoch,
    pub step: S,
}

impl<S> Ticket<S> {
    pub fn new(epoch: Epoch, step: S) -> Self {
        Self { epoch, step }
    }

    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Ticket<T> {
        Ticket {
            epoch: self.epoch,
            step: f(self.step),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule<S> {
    /// Fire on the next rendered frame.
    NextFrame(Ticket<S>),
    /// Fire once `Duration` has elapsed.
    After(Duration, Ticket<S>),
}

impl<S> Schedule<S> {
    pub fn ticket(&self) -> &Ticket<S> {
        match self {
            Self::NextFrame(ticket) | Self::After(_, ticket) => ticket,
        }
    }

    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Schedule<T> {
        match self {
            Self::NextFrame(ticket) => Schedule::NextFrame(ticket.map(f)),
            Self::After(delay, ticket) => Schedule::After(delay, ticket.map(f)),
        }
    }
}
