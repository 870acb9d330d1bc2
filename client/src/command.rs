use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use tokio::sync::{oneshot, Mutex};

use kbe_shared::Message;

use crate::error::CommandError;

struct Waiter {
    expected: Vec<u16>,
    sender: oneshot::Sender<Message>,
}

/// Requests waiting for a reply, keyed by the message ids that answer them.
///
/// A reply completes the oldest waiter expecting its id. Timed-out waiters are skipped.
#[derive(Clone, Default)]
pub struct Commands {
    waiters: Arc<Mutex<Vec<Waiter>>>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers interest before the request goes out, so a fast reply is not missed
    pub async fn register(&self, expected: &[u16]) -> PendingReply {
        let (sender, receiver) = oneshot::channel();
        self.waiters.lock().await.push(Waiter {
            expected: expected.to_vec(),
            sender,
        });
        PendingReply {
            expected: expected.to_vec(),
            receiver,
        }
    }

    /// Hands `message` to the first live waiter expecting it. Returns true if one took it.
    pub async fn complete(&self, message: &Message) -> bool {
        let mut waiters = self.waiters.lock().await;
        waiters.retain(|waiter| !waiter.sender.is_closed());
        let Some(index) = waiters
            .iter()
            .position(|waiter| waiter.expected.contains(&message.id()))
        else {
            return false;
        };
        let waiter = waiters.remove(index);
        if waiter.sender.send(message.clone()).is_err() {
            debug!("waiter for {} went away", message.name());
            return false;
        }
        true
    }

    /// Drops every waiter; each sees [`CommandError::Cancelled`]
    pub async fn cancel_all(&self) {
        let mut waiters = self.waiters.lock().await;
        if !waiters.is_empty() {
            warn!("cancelling {} pending request(s)", waiters.len());
        }
        waiters.clear();
    }

    pub async fn pending(&self) -> usize {
        let mut waiters = self.waiters.lock().await;
        waiters.retain(|waiter| !waiter.sender.is_closed());
        waiters.len()
    }
}

/// The receiving end of a registered request
pub struct PendingReply {
    expected: Vec<u16>,
    receiver: oneshot::Receiver<Message>,
}

impl PendingReply {
    pub fn expected(&self) -> &[u16] {
        &self.expected
    }

    /// Waits for the reply. A timeout reports an error and leaves the connection alone.
    pub async fn wait(self, timeout: Duration) -> Result<Message, CommandError> {
        match tokio::time::timeout(timeout, self.receiver).await {
            Ok(Ok(message)) => Ok(message),
            Ok(Err(_)) => Err(CommandError::Cancelled {
                expected: self.expected,
            }),
            Err(_) => {
                warn!("no reply among {:?} within {:?}", self.expected, timeout);
                Err(CommandError::Timeout {
                    expected: self.expected,
                    timeout,
                })
            }
        }
    }
}
