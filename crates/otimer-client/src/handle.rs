//! Actor front end for `SessionClient`
//!
//! One tokio task owns the client and works through commands in arrival
//! order, so the session identity has a single writer and racing logins are
//! applied one after the other. Every command carries a oneshot sender; its
//! outcome is delivered exactly once. Callers that prefer callbacks can use
//! the `*_with` variants, which run the callback on a runtime worker.

use otimer_core::{ConnectionConfig, SessionError, SessionIdentity, WorkItem};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::session::SessionClient;

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

enum Command {
    Login {
        config: ConnectionConfig,
        reply: Reply<SessionIdentity>,
    },
    FetchTasks {
        reply: Reply<Vec<WorkItem>>,
    },
    Identity {
        reply: oneshot::Sender<Option<SessionIdentity>>,
    },
}

#[derive(Debug, Clone)]
pub struct ClientHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl ClientHandle {
    /// Move `client` onto its own task. Must be called inside a tokio runtime.
    pub fn spawn(client: SessionClient) -> Self {
        let (commands, inbox) = mpsc::unbounded_channel();
        tokio::spawn(run(client, inbox));
        Self { commands }
    }

    pub async fn login(&self, config: ConnectionConfig) -> Result<SessionIdentity, SessionError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::Login { config, reply })?;
        outcome.await.map_err(|_| stopped())?
    }

    pub async fn fetch_tasks(&self) -> Result<Vec<WorkItem>, SessionError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::FetchTasks { reply })?;
        outcome.await.map_err(|_| stopped())?
    }

    pub async fn identity(&self) -> Option<SessionIdentity> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::Identity { reply }).ok()?;
        outcome.await.ok().flatten()
    }

    pub fn login_with<F>(&self, config: ConnectionConfig, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<SessionIdentity, SessionError>) + Send + 'static,
    {
        let handle = self.clone();
        tokio::spawn(async move { callback(handle.login(config).await) })
    }

    pub fn fetch_tasks_with<F>(&self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<Vec<WorkItem>, SessionError>) + Send + 'static,
    {
        let handle = self.clone();
        tokio::spawn(async move { callback(handle.fetch_tasks().await) })
    }

    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| stopped())
    }
}

fn stopped() -> SessionError {
    SessionError::Internal("session task has stopped".to_string())
}

async fn run(mut client: SessionClient, mut inbox: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = inbox.recv().await {
        match command {
            Command::Login { config, reply } => {
                let outcome = client.login(config).await;
                if reply.send(outcome).is_err() {
                    log::debug!("Login caller went away before the outcome arrived");
                }
            }
            Command::FetchTasks { reply } => {
                let outcome = client.fetch_tasks().await;
                if reply.send(outcome).is_err() {
                    log::debug!("Task caller went away before the outcome arrived");
                }
            }
            Command::Identity { reply } => {
                if reply.send(client.identity().cloned()).is_err() {
                    log::debug!("Identity caller went away before the answer arrived");
                }
            }
        }
    }
    log::debug!("Session task finished");
}
