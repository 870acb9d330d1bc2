use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use tokio::{sync::oneshot, task::JoinHandle, time::MissedTickBehavior};

use kbe_shared::Message;

use crate::connection::Connection;

/// Sends an active tick at a fixed interval until stopped or the connection fails
pub struct KeepAlive {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl KeepAlive {
    pub fn start(connection: Arc<Connection>, tick: Message, interval: Duration) -> Self {
        let (stop, mut stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        if let Err(err) = connection.send(&tick).await {
                            warn!("keep-alive to {} stopped: {}", connection.addr(), err);
                            break;
                        }
                        debug!("active tick sent to {}", connection.addr());
                    }
                }
            }
        });
        Self {
            stop: Some(stop),
            task: Some(task),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .map_or(false, |task| !task.is_finished())
    }

    /// Returns once the ticking task has exited
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            // the task may already have exited on its own
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!("keep-alive task failed: {}", err);
            }
        }
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
