use super::session::{SeedSession, Stages, Timeouts};

use crate::colored::Colorize;
use crate::message::NetworkAddress;
use crate::p2p::linear_backoff::Execute;
use crate::p2p::{HostSet, SeedEndpoint};

use actix::{Actor, ActorFutureExt, Context, Handler, ResponseActFuture};
use tokio::sync::oneshot;

use std::sync::Arc;

use tracing::{info, warn};

/// Runs a fresh [SeedSession] on every `Execute`, answering whether that session succeeded.
///
/// Driven by a `LinearBackoff`, the seeder retries at increasing intervals until the host set
/// grows.
pub struct Seeder {
    seeds: Vec<SeedEndpoint>,
    hosts: Arc<dyn HostSet>,
    stages: Stages,
    timeouts: Timeouts,
    self_address: NetworkAddress,
    attempts: usize,
    last_outcome: Option<bool>,
}

impl Seeder {
    pub fn new(
        seeds: Vec<SeedEndpoint>,
        hosts: Arc<dyn HostSet>,
        stages: Stages,
        timeouts: Timeouts,
        self_address: NetworkAddress,
    ) -> Self {
        Seeder { seeds, hosts, stages, timeouts, self_address, attempts: 0, last_outcome: None }
    }
}

impl Actor for Seeder {
    type Context = Context<Self>;
}

impl Handler<Execute> for Seeder {
    type Result = ResponseActFuture<Self, bool>;

    fn handle(&mut self, _msg: Execute, _ctx: &mut Context<Self>) -> Self::Result {
        self.attempts += 1;
        info!("[{}] seeding attempt {}", "seeder".cyan(), self.attempts);
        let session = Arc::new(SeedSession::new(
            self.seeds.clone(),
            self.hosts.clone(),
            self.stages.clone(),
            self.timeouts,
            self.self_address.clone(),
        ));
        let (tx, rx) = oneshot::channel();
        session.start(move |result| {
            let _ = tx.send(result);
        });
        let outcome = actix::fut::wrap_future::<_, Self>(rx);
        Box::pin(outcome.map(|result, actor, _ctx| {
            let success = matches!(result, Ok(Ok(())));
            actor.last_outcome = Some(success);
            if success {
                info!("[{}] host set holds {} addresses", "seeder".green(), actor.hosts.size());
            } else {
                warn!("[{}] attempt {} failed", "seeder".yellow(), actor.attempts);
            }
            success
        }))
    }
}

#[derive(Debug, Clone, MessageResponse)]
pub struct SeederStatus {
    pub attempts: usize,
    pub last_outcome: Option<bool>,
    pub hosts: usize,
}

#[derive(Debug, Clone, Message)]
#[rtype(result = "SeederStatus")]
pub struct GetStatus;

impl Handler<GetStatus> for Seeder {
    type Result = SeederStatus;

    fn handle(&mut self, _msg: GetStatus, _ctx: &mut Context<Self>) -> Self::Result {
        SeederStatus { attempts: self.attempts, last_outcome: self.last_outcome, hosts: self.hosts.size() }
    }
}
