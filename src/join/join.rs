use crate::colored::Colorize;
use crate::{Error, Result};

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error};

/// The handler invoked once every expected signal has been received.
pub type JoinHandler = Box<dyn FnOnce(Result<()>) + Send + 'static>;

/// How the outcomes delivered to a [Join] are combined into the handler's argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPolicy {
    /// The handler receives the first error signalled, or `Ok(())` when every signal succeeded.
    FirstError,
    /// Individual errors are discarded and the handler always receives `Ok(())`. The handler is
    /// expected to compute the aggregate outcome itself.
    SuppressErrors,
}

struct JoinState {
    remaining: usize,
    first_error: Option<Error>,
    handler: Option<JoinHandler>,
}

struct Inner {
    name: String,
    expected: usize,
    policy: JoinPolicy,
    state: Mutex<JoinState>,
}

/// A completion ticket shared by every signaller of one asynchronous operation.
///
/// `Join` counts down from `expected`. The signaller which drives the count to zero takes the
/// handler out of its slot and invokes it after the internal lock has been released, so the
/// handler may itself signal other joins (or this one) without deadlocking. Every other signal
/// happens-before the handler runs.
#[derive(Clone)]
pub struct Join {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Join {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Join")
            .field("name", &self.inner.name)
            .field("expected", &self.inner.expected)
            .field("remaining", &self.remaining())
            .field("policy", &self.inner.policy)
            .finish()
    }
}

impl Join {
    /// Creates a join expecting exactly `expected` signals. A join over zero signals could never
    /// fire and is rejected.
    pub fn new<F>(name: impl Into<String>, expected: usize, policy: JoinPolicy, handler: F) -> Result<Join>
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        if expected == 0 {
            return Err(Error::EmptyJoin);
        }
        Ok(Join::with_count(name.into(), expected, policy, Box::new(handler)))
    }

    /// Creates a join which fires on its first and only signal.
    pub fn single<F>(name: impl Into<String>, policy: JoinPolicy, handler: F) -> Join
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        Join::with_count(name.into(), 1, policy, Box::new(handler))
    }

    fn with_count(name: String, expected: usize, policy: JoinPolicy, handler: JoinHandler) -> Join {
        let state = JoinState { remaining: expected, first_error: None, handler: Some(handler) };
        let inner = Inner { name, expected, policy, state: Mutex::new(state) };
        Join { inner: Arc::new(inner) }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn expected(&self) -> usize {
        self.inner.expected
    }

    /// The number of signals still outstanding.
    pub fn remaining(&self) -> usize {
        self.lock().remaining
    }

    /// Whether every expected signal has been received. The handler is taken once this holds but
    /// may still be running on the thread which delivered the last signal.
    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Delivers one outcome. Returns `Err(Error::JoinOverflow)` when the join has already received
    /// all of its expected signals.
    pub fn signal(&self, outcome: Result<()>) -> Result<()> {
        let fire = {
            let mut state = self.lock();
            if state.remaining == 0 {
                error!("[{}] {} signalled beyond its expected count", "join".red(), self.inner.name);
                return Err(Error::JoinOverflow);
            }
            state.remaining -= 1;
            if let Err(err) = outcome {
                match self.inner.policy {
                    JoinPolicy::FirstError => {
                        if state.first_error.is_none() {
                            state.first_error = Some(err);
                        }
                    }
                    JoinPolicy::SuppressErrors => {
                        debug!("[{}] {} suppressed {:?}", "join".cyan(), self.inner.name, err)
                    }
                }
            }
            if state.remaining == 0 {
                let result = match state.first_error.take() {
                    Some(err) => Err(err),
                    None => Ok(()),
                };
                state.handler.take().map(|handler| (handler, result))
            } else {
                None
            }
        };
        // The lock is released before the handler runs.
        if let Some((handler, result)) = fire {
            debug!("[{}] {} complete", "join".cyan(), self.inner.name);
            handler(result);
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, JoinState> {
        // Handlers never run under the lock, so a poisoned lock still holds a consistent count.
        self.inner.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
