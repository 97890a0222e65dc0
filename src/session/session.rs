use super::pipeline::{SeedEvent, SeedState};

use crate::colored::Colorize;
use crate::join::{Join, JoinHandler, JoinPolicy};
use crate::message::NetworkAddress;
use crate::p2p::address_exchange::AddressExchange;
use crate::p2p::connector::Connector;
use crate::p2p::handshake::Handshake;
use crate::p2p::keep_alive::KeepAlive;
use crate::p2p::{Channel, HostSet, SeedEndpoint};
use crate::{Error, Result};

use tokio::time::Duration;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

/// Deadlines applied by the pipeline stages of a seeding session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Maximum time to establish a connection to one seed.
    pub connect: Duration,
    /// Maximum time for the version handshake.
    pub handshake: Duration,
    /// Interval between keep-alive pings.
    pub heartbeat: Duration,
    /// Maximum time to wait for a seed's address list.
    pub germination: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            connect: Duration::from_secs(5),
            handshake: Duration::from_secs(30),
            heartbeat: Duration::from_secs(5 * 60),
            germination: Duration::from_secs(30),
        }
    }
}

/// The pipeline stages a session drives for each seed.
#[derive(Clone)]
pub struct Stages {
    pub connector: Arc<dyn Connector>,
    pub handshake: Arc<dyn Handshake>,
    pub keep_alive: Arc<dyn KeepAlive>,
    pub address_exchange: Arc<dyn AddressExchange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    /// Completed, holding whether the session succeeded.
    Completed(bool),
}

/// A one-shot seeding session.
///
/// `start` contacts every seed concurrently and invokes the completion handler exactly once:
/// with `Ok(())` when the host set grew during the session and with `Err(Error::OperationFailed)`
/// otherwise. Individual seed failures are logged and never reported on their own. A seed whose
/// connector never resolves holds the session open indefinitely.
pub struct SeedSession {
    seeds: Vec<SeedEndpoint>,
    hosts: Arc<dyn HostSet>,
    stages: Stages,
    timeouts: Timeouts,
    self_address: NetworkAddress,
    state: Mutex<SessionState>,
    completion: Mutex<Option<JoinHandler>>,
}

impl SeedSession {
    pub fn new(
        seeds: Vec<SeedEndpoint>,
        hosts: Arc<dyn HostSet>,
        stages: Stages,
        timeouts: Timeouts,
        self_address: NetworkAddress,
    ) -> Self {
        SeedSession {
            seeds,
            hosts,
            stages,
            timeouts,
            self_address,
            state: Mutex::new(SessionState::NotStarted),
            completion: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    pub fn seeds(&self) -> &[SeedEndpoint] {
        &self.seeds
    }

    /// Starts the session.
    ///
    /// When there are no seeds or the host set has no capacity the handler is invoked with
    /// `Err(Error::OperationFailed)` before `start` returns, without any connection attempt. Called
    /// outside a tokio runtime the session completes with `Err(Error::NoRuntime)` instead of
    /// spawning its pipelines. A second call completes its own handler with
    /// `Err(Error::AlreadyStarted)`.
    pub fn start<F>(self: &Arc<Self>, completion: F)
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        {
            let mut state = lock(&self.state);
            if *state != SessionState::NotStarted {
                drop(state);
                warn!("[{}] session already started", "seed".yellow());
                completion(Err(Error::AlreadyStarted));
                return;
            }
            *state = SessionState::Running;
        }
        *lock(&self.completion) = Some(Box::new(completion));

        if self.seeds.is_empty() || self.hosts.capacity() == 0 {
            info!("[{}] no seeds and/or host capacity configured", "seed".yellow());
            self.finish(Err(Error::OperationFailed));
            return;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(err) => {
                error!("[{}] no runtime to seed on: {}", "seed".red(), err);
                self.finish(Err(Error::NoRuntime));
                return;
            }
        };

        let size_before = self.hosts.size();
        let session = self.clone();
        let all = match Join::new("seed_session", self.seeds.len(), JoinPolicy::SuppressErrors, move |_| {
            session.handle_stopped(size_before)
        }) {
            Ok(join) => join,
            Err(err) => {
                self.finish(Err(err));
                return;
            }
        };

        info!("[{}] contacting {} seeds", "seed".cyan(), self.seeds.len());
        for seed in self.seeds.iter().cloned() {
            let forward = all.clone();
            let per_seed = Join::single(seed.to_string(), JoinPolicy::FirstError, move |result| {
                if let Err(err) = forward.signal(result) {
                    error!("[{}] {:?}", "seed".red(), err);
                }
            });
            let _ = runtime.spawn(self.clone().run_pipeline(seed, per_seed));
        }
    }

    // Every seed has reported, so every insert has returned.
    fn handle_stopped(&self, size_before: usize) {
        let size = self.hosts.size();
        if size > size_before {
            info!("[{}] discovered {} hosts", "seed".green(), size - size_before);
            self.finish(Ok(()))
        } else {
            warn!("[{}] seeding discovered no new hosts", "seed".yellow());
            self.finish(Err(Error::OperationFailed))
        }
    }

    fn finish(&self, result: Result<()>) {
        *lock(&self.state) = SessionState::Completed(result.is_ok());
        let completion = lock(&self.completion).take();
        if let Some(completion) = completion {
            completion(result);
        }
    }

    async fn run_pipeline(self: Arc<Self>, seed: SeedEndpoint, join: Join) {
        let outcome = match self.drive(&seed).await {
            Ok(state) => state.into_outcome().unwrap_or(Err(Error::InvalidTransition)),
            Err(err) => Err(err),
        };
        match &outcome {
            Ok(()) => debug!("[{}] {} done", "seed".cyan(), seed),
            Err(err) => info!("[{}] failure contacting seed {}: {:?}", "seed".yellow(), seed, err),
        }
        if let Err(err) = join.signal(outcome) {
            error!("[{}] {} {:?}", "seed".red(), seed, err);
        }
    }

    /// Drives one seed to a terminal state.
    async fn drive(&self, seed: &SeedEndpoint) -> Result<SeedState> {
        let state = SeedState::Idle.on_event(SeedEvent::Connect)?;
        debug!("[{}] connecting to {}", "seed".cyan(), seed);
        let event = match self.stages.connector.connect(seed, self.timeouts.connect).await {
            Ok(channel) => SeedEvent::Connected(channel),
            Err(err) => SeedEvent::ConnectFailed(err),
        };
        let state = state.on_event(event)?;
        let channel = match state.channel() {
            Some(channel) => channel,
            None => return Ok(state),
        };
        info!("[{}] connected to seed {} at {}", "seed".cyan(), seed, channel.address());

        let state = state.on_event(SeedEvent::Handshake)?;
        // The handshake subscribes before the channel starts delivering.
        let handshake = self.stages.handshake.start(channel.clone(), self.timeouts.handshake);
        channel.start();
        let event = match handshake.await {
            Ok(()) => SeedEvent::HandshakeOk,
            Err(err) => {
                channel.stop();
                SeedEvent::HandshakeFailed(err)
            }
        };
        let state = state.on_event(event)?;
        if state.is_terminal() {
            return Ok(state);
        }

        self.stages.keep_alive.start(channel.clone(), self.timeouts.heartbeat);
        let state = state.on_event(SeedEvent::Exchange)?;
        let result = self
            .stages
            .address_exchange
            .start(channel, self.timeouts.germination, self.hosts.clone(), self.self_address.clone())
            .await;
        state.on_event(SeedEvent::ExchangeComplete(result))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
