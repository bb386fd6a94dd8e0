//! Store worker
//!
//! Runs repository calls on one background task so the interaction loop never
//! blocks on SQL. Commands are drained one at a time, which keeps exactly one
//! store operation in flight. Each command carries a oneshot sender for its
//! result.

use crate::error::{BusinessError, BusinessResult};
use agenda_core::{Person, PersonKey};
use agenda_persistence::{ListOutcome, PersonRepo, WriteOutcome};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

pub type ReplySender<T> = oneshot::Sender<T>;

/// Commands accepted by the worker
#[derive(Debug)]
pub enum StoreCommand {
    List { s: ReplySender<ListOutcome> },
    Insert { s: ReplySender<WriteOutcome>, person: Person },
    Update { s: ReplySender<WriteOutcome>, key: PersonKey, person: Person },
    Delete { s: ReplySender<WriteOutcome>, key: PersonKey },
}

/// Cloneable sending side
#[derive(Debug, Clone)]
pub struct StoreHandle {
    sender: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    pub async fn list(&self) -> BusinessResult<ListOutcome> {
        self.send_command(|s| StoreCommand::List { s }).await
    }

    pub async fn insert(&self, person: Person) -> BusinessResult<WriteOutcome> {
        self.send_command(|s| StoreCommand::Insert { s, person }).await
    }

    pub async fn update(&self, key: PersonKey, person: Person) -> BusinessResult<WriteOutcome> {
        self.send_command(|s| StoreCommand::Update { s, key, person }).await
    }

    pub async fn delete(&self, key: PersonKey) -> BusinessResult<WriteOutcome> {
        self.send_command(|s| StoreCommand::Delete { s, key }).await
    }

    async fn send_command<T>(
        &self,
        get_command: impl FnOnce(ReplySender<T>) -> StoreCommand,
    ) -> BusinessResult<T> {
        let (result_sender, receiver) = oneshot::channel();
        self.sender
            .send(get_command(result_sender))
            .await
            .map_err(|_| BusinessError::WorkerUnavailable)?;
        receiver.await.map_err(|_| BusinessError::WorkerUnavailable)
    }
}

/// Joins the worker task once every `StoreHandle` is gone
#[derive(Debug)]
pub struct StoreWorkerQuitHandle {
    handle: JoinHandle<()>,
}

impl StoreWorkerQuitHandle {
    /// Wait for the worker to finish. Drop all handles first.
    pub async fn quit(self) -> BusinessResult<()> {
        self.handle
            .await
            .map_err(|_| BusinessError::WorkerUnavailable)
    }

    /// Stop the worker without waiting for pending commands
    pub async fn abort(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

pub struct StoreWorker {
    receiver: mpsc::Receiver<StoreCommand>,
    repo: PersonRepo,
}

impl StoreWorker {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn(repo: PersonRepo) -> (StoreHandle, StoreWorkerQuitHandle) {
        let (sender, receiver) = mpsc::channel(1);
        let worker = Self { receiver, repo };
        let handle = tokio::spawn(worker.run());

        (StoreHandle { sender }, StoreWorkerQuitHandle { handle })
    }

    /// Runs until every handle has been dropped.
    async fn run(mut self) {
        tracing::debug!("Store worker started");
        while let Some(command) = self.receiver.recv().await {
            self.handle_command(command).await;
        }
        tracing::debug!("Store worker stopped");
    }

    async fn handle_command(&self, command: StoreCommand) {
        // A dropped receiver means the caller gave up waiting; nothing to report.
        match command {
            StoreCommand::List { s } => {
                let _ = s.send(self.repo.list().await);
            }
            StoreCommand::Insert { s, person } => {
                let _ = s.send(self.repo.insert(&person).await);
            }
            StoreCommand::Update { s, key, person } => {
                let _ = s.send(self.repo.update(&key, &person).await);
            }
            StoreCommand::Delete { s, key } => {
                let _ = s.send(self.repo.delete(&key).await);
            }
        }
    }
}
