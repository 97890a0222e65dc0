use crate::p2p::Channel;
use crate::{Error, Result};

use std::sync::Arc;

/// The stage a single seed's pipeline has reached.
///
/// `ConnectFailed`, `HandshakeFailed` and `SeedDone` are terminal, and exactly one of them is
/// reached by every pipeline which does not stall.
pub enum SeedState {
    Idle,
    Connecting,
    ConnectFailed(Error),
    Connected(Arc<dyn Channel>),
    Handshaking(Arc<dyn Channel>),
    HandshakeFailed(Error),
    HandshakeOk(Arc<dyn Channel>),
    AddressExchanging(Arc<dyn Channel>),
    SeedDone(Result<()>),
}

pub enum SeedEvent {
    Connect,
    Connected(Arc<dyn Channel>),
    ConnectFailed(Error),
    Handshake,
    HandshakeOk,
    HandshakeFailed(Error),
    Exchange,
    ExchangeComplete(Result<()>),
}

impl std::fmt::Debug for SeedState {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl SeedState {
    pub fn name(&self) -> &'static str {
        match self {
            SeedState::Idle => "idle",
            SeedState::Connecting => "connecting",
            SeedState::ConnectFailed(_) => "connect_failed",
            SeedState::Connected(_) => "connected",
            SeedState::Handshaking(_) => "handshaking",
            SeedState::HandshakeFailed(_) => "handshake_failed",
            SeedState::HandshakeOk(_) => "handshake_ok",
            SeedState::AddressExchanging(_) => "address_exchanging",
            SeedState::SeedDone(_) => "seed_done",
        }
    }

    /// Applies `event`, returning `Error::InvalidTransition` when the event cannot occur in this
    /// state.
    pub fn on_event(self, event: SeedEvent) -> Result<SeedState> {
        match (self, event) {
            (SeedState::Idle, SeedEvent::Connect) => Ok(SeedState::Connecting),
            (SeedState::Connecting, SeedEvent::Connected(channel)) => Ok(SeedState::Connected(channel)),
            (SeedState::Connecting, SeedEvent::ConnectFailed(err)) => Ok(SeedState::ConnectFailed(err)),
            (SeedState::Connected(channel), SeedEvent::Handshake) => Ok(SeedState::Handshaking(channel)),
            (SeedState::Handshaking(channel), SeedEvent::HandshakeOk) => Ok(SeedState::HandshakeOk(channel)),
            (SeedState::Handshaking(_), SeedEvent::HandshakeFailed(err)) => Ok(SeedState::HandshakeFailed(err)),
            (SeedState::HandshakeOk(channel), SeedEvent::Exchange) => Ok(SeedState::AddressExchanging(channel)),
            (SeedState::AddressExchanging(_), SeedEvent::ExchangeComplete(result)) => Ok(SeedState::SeedDone(result)),
            _ => Err(Error::InvalidTransition),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SeedState::ConnectFailed(_) | SeedState::HandshakeFailed(_) | SeedState::SeedDone(_))
    }

    /// The channel held by the pipeline in this state, if any.
    pub fn channel(&self) -> Option<Arc<dyn Channel>> {
        match self {
            SeedState::Connected(channel)
            | SeedState::Handshaking(channel)
            | SeedState::HandshakeOk(channel)
            | SeedState::AddressExchanging(channel) => Some(channel.clone()),
            _ => None,
        }
    }

    /// The outcome to signal for a terminal state, `None` otherwise.
    pub fn into_outcome(self) -> Option<Result<()>> {
        match self {
            SeedState::ConnectFailed(err) | SeedState::HandshakeFailed(err) => Some(Err(err)),
            SeedState::SeedDone(result) => Some(result),
            _ => None,
        }
    }
}
