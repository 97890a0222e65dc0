use super::prelude::*;

use crate::message::{Ping, Pong};

use rand::Rng;

/// A long-lived protocol attached to a channel after the handshake. It owns its own task and its
/// lifetime is bounded by the channel's, not by whoever attached it.
pub trait KeepAlive: Send + Sync {
    fn start(&self, channel: Arc<dyn Channel>, heartbeat: Duration);
}

/// Answers pings and sends one every `heartbeat`, stopping the channel when the previous ping went
/// unanswered for a whole heartbeat.
#[derive(Debug, Clone, Default)]
pub struct PingKeepAlive;

impl PingKeepAlive {
    pub fn new() -> Self {
        PingKeepAlive
    }
}

impl KeepAlive for PingKeepAlive {
    fn start(&self, channel: Arc<dyn Channel>, heartbeat: Duration) {
        let pings = channel.subscribe(MessageKind::Ping);
        let pongs = channel.subscribe(MessageKind::Pong);
        tokio::spawn(run(channel, heartbeat.max(Duration::from_millis(1)), pings, pongs));
    }
}

async fn run(channel: Arc<dyn Channel>, heartbeat: Duration, mut pings: Subscription, mut pongs: Subscription) {
    let address = channel.address();
    let mut interval = tokio::time::interval(heartbeat);
    // The first tick completes immediately.
    interval.tick().await;
    let mut outstanding: Option<u64> = None;
    loop {
        tokio::select! {
            message = pings.recv() => match message {
                Some(Message::Ping(ping)) => {
                    if channel.send(Message::Pong(Pong::new(ping.nonce))).await.is_err() {
                        break;
                    }
                }
                _ => break,
            },
            message = pongs.recv() => match message {
                Some(Message::Pong(pong)) => {
                    if outstanding == Some(pong.nonce) {
                        outstanding = None;
                    } else {
                        debug!("[{}] {} sent an unexpected pong", "keep-alive".cyan(), address);
                    }
                }
                _ => break,
            },
            _ = interval.tick() => {
                if outstanding.is_some() {
                    warn!("[{}] {} missed its heartbeat", "keep-alive".yellow(), address);
                    channel.stop();
                    break;
                }
                let nonce: u64 = rand::thread_rng().gen();
                if channel.send(Message::Ping(Ping::new(nonce))).await.is_err() {
                    break;
                }
                outstanding = Some(nonce);
            }
        }
    }
    debug!("[{}] {} ended", "keep-alive".cyan(), address);
}
