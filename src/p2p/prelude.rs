pub use crate::{Error, Result};

pub use super::channel::{Channel, Subscription};
pub use super::endpoint::SeedEndpoint;
pub use super::hosts::HostSet;

pub use crate::message::NetworkAddress;
pub use crate::protocol::{Message, MessageKind};

pub use actix::{Actor, Handler, Recipient, ResponseFuture};
pub use actix::{ActorFutureExt, ResponseActFuture, WrapFuture};
pub use actix::{ActorContext, Addr, AsyncContext, Context};

pub use tokio::time::{timeout, Duration};

pub use std::sync::Arc;

pub use futures::future::BoxFuture;
pub use futures::{Future, FutureExt};

pub use crate::colored::Colorize;

pub use tracing::{debug, error, info, warn};
