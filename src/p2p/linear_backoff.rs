use super::prelude::*;

/// The `LinearBackoff` actor sends `Execute` to an executor at linearly increasing intervals until
/// the executor reports completion or the epoch limit is reached.
///
/// After the `n`th unsuccessful execution the next one is scheduled `delta * n` later.
pub struct LinearBackoff {
    executor: Recipient<Execute>,
    epoch: u32,
    delta: Duration,
    epoch_limit: Option<u32>,
}

impl LinearBackoff {
    /// When creating a `LinearBackoff` one may specify the `Actor` which receives `Execute`
    /// messages, the base `delta` and an optional maximum number of executions.
    pub fn new(executor: Recipient<Execute>, delta: Duration, epoch_limit: Option<u32>) -> Self {
        LinearBackoff { executor, epoch: 0, delta, epoch_limit }
    }
}

/// Begins periodically sending `Execute` messages to the executor.
#[derive(Debug, Clone, Message)]
#[rtype(result = "()")]
pub struct Start;

impl Handler<Start> for LinearBackoff {
    type Result = ResponseActFuture<Self, ()>;

    fn handle(&mut self, msg: Start, _ctx: &mut Context<Self>) -> Self::Result {
        let send_to_executor = self.executor.send(Execute);
        let send_to_executor = actix::fut::wrap_future::<_, Self>(send_to_executor);
        Box::pin(send_to_executor.map(move |done, actor, ctx| match done {
            Ok(true) => {
                debug!("[{}] executor done after {} epochs", "backoff".cyan(), actor.epoch + 1);
                ctx.stop();
            }
            Ok(false) => {
                actor.epoch += 1;
                if actor.epoch_limit.map_or(false, |limit| actor.epoch >= limit) {
                    warn!("[{}] giving up after {} epochs", "backoff".yellow(), actor.epoch);
                    ctx.stop();
                } else {
                    let delta = actor.delta * actor.epoch;
                    ctx.notify_later(msg, delta);
                }
            }
            Err(err) => {
                error!("{:?}", err);
                ctx.stop();
            }
        }))
    }
}

/// The actor handling `Execute` should return `true` when the backoff should complete and `false`
/// when it should be repeated.
#[derive(Debug, Clone, Message)]
#[rtype(result = "bool")]
pub struct Execute;

impl Actor for LinearBackoff {
    type Context = Context<Self>;

    fn stopped(&mut self, _ctx: &mut Context<Self>) {
        debug!("stopped");
    }
}
