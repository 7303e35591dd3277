//! Single-owner task around a [`ParameterSync`].
//!
//! The reconciler lives on one tokio task. Handles send it attach, detach
//! and snapshot commands over an mpsc channel; group events are fanned out
//! to subscribers over a broadcast channel. Commands are applied strictly
//! in the order they arrive.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::layer::{LayerId, ParameterSource};
use crate::matcher::ParameterMatcher;
use crate::reconciler::{GroupEvent, GroupId, GroupView, ParameterSync};

enum Command<L> {
    Attach(Arc<L>, oneshot::Sender<Option<GroupId>>),
    Detach(LayerId, oneshot::Sender<bool>),
    Snapshot(oneshot::Sender<Vec<GroupView<L>>>),
}

/// Spawns reconciler tasks.
pub struct SyncService;

impl SyncService {
    /// Move `sync` onto a new task and return a handle to it.
    ///
    /// The task ends once every handle has been dropped.
    pub fn spawn<L, M>(
        mut sync: ParameterSync<L, M>,
        config: &SyncConfig,
    ) -> (SyncHandle<L>, JoinHandle<()>)
    where
        L: ParameterSource + Send + Sync + 'static,
        M: ParameterMatcher + Send + 'static,
    {
        let config = config.clone().validated();
        let (commands, mut rx) = mpsc::channel(config.command_buffer);
        let (events, _) = broadcast::channel(config.event_buffer);

        let forward = events.clone();
        sync.subscribe(move |event: &GroupEvent<L>| {
            // No subscribers is fine
            let _ = forward.send(event.clone());
        });

        let task = tokio::spawn(async move {
            info!("Parameter sync service started");
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Attach(layer, reply) => {
                        let _ = reply.send(sync.add_layer(layer));
                    }
                    Command::Detach(layer_id, reply) => {
                        let _ = reply.send(sync.remove_layer(&layer_id));
                    }
                    Command::Snapshot(reply) => {
                        let _ = reply.send(sync.groups());
                    }
                }
            }
            debug!(groups = sync.len(), "Parameter sync service stopped");
        });

        (SyncHandle { commands, events }, task)
    }
}

/// Cloneable handle to a running reconciler task.
pub struct SyncHandle<L> {
    commands: mpsc::Sender<Command<L>>,
    events: broadcast::Sender<GroupEvent<L>>,
}

impl<L> Clone for SyncHandle<L> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            events: self.events.clone(),
        }
    }
}

impl<L> SyncHandle<L> {
    /// Attach a layer; see [`ParameterSync::add_layer`].
    pub async fn add_layer(&self, layer: Arc<L>) -> Result<Option<GroupId>> {
        self.request(|reply| Command::Attach(layer, reply)).await
    }

    /// Detach a layer; see [`ParameterSync::remove_layer`].
    pub async fn remove_layer(&self, layer_id: LayerId) -> Result<bool> {
        self.request(|reply| Command::Detach(layer_id, reply)).await
    }

    /// Snapshot of all groups.
    pub async fn groups(&self) -> Result<Vec<GroupView<L>>> {
        self.request(Command::Snapshot).await
    }

    /// Receive group events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<GroupEvent<L>> {
        self.events.subscribe()
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command<L>) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(build(tx))
            .await
            .map_err(|_| SyncError::ServiceStopped)?;
        rx.await.map_err(|_| SyncError::ServiceStopped)
    }
}
