use crate::inventory::{InventoryResponder, MemoryPool};
use crate::p2p::address_exchange::SeedExchange;
use crate::p2p::connector::TcpConnector;
use crate::p2p::handshake::VersionHandshake;
use crate::p2p::keep_alive::PingKeepAlive;
use crate::p2p::linear_backoff::{LinearBackoff, Start};
use crate::p2p::Hosts;
use crate::server::{Server, Settings};
use crate::session::{Seeder, Stages};
use crate::storage::ChainStore;
use crate::Result;

use actix::Actor;

use std::sync::Arc;

use tracing::{error, info};

/// Starts the node's actors and listener. Must be called from within a running actix system.
pub fn run(settings: Settings) -> Result<()> {
    let listener_ip = settings.listener()?;
    let self_address = settings.self_network_address()?;
    let seeds = settings.seed_endpoints()?;
    let timeouts = settings.timeouts.timeouts();

    info!("Node is starting on {} ({}, {} seeds)", listener_ip, settings.network, seeds.len());

    let chain = Arc::new(ChainStore::open(&settings.db_path)?);
    let pool = Arc::new(MemoryPool::new());
    let hosts = Arc::new(Hosts::new(settings.host_capacity));
    let handshake = Arc::new(VersionHandshake::new(self_address.clone(), 0, false));
    let keep_alive = Arc::new(PingKeepAlive::new());

    let stages = Stages {
        connector: Arc::new(TcpConnector::new()),
        handshake: handshake.clone(),
        keep_alive: keep_alive.clone(),
        address_exchange: Arc::new(SeedExchange::new()),
    };
    let seeder = Seeder::new(seeds, hosts.clone(), stages, timeouts, self_address).start();
    let backoff =
        LinearBackoff::new(seeder.recipient(), settings.timeouts.backoff(), settings.seeding_attempts).start();
    backoff.do_send(Start);

    let responder = InventoryResponder::new(pool, chain);
    let server = Server::new(listener_ip, hosts, handshake, keep_alive, responder, timeouts);
    actix::spawn(async move {
        if let Err(err) = server.listen().await {
            error!("server stopped: {:?}", err);
        }
    });
    Ok(())
}
