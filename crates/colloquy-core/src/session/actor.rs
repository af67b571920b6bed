//! Per-session actors.
//!
//! Every session key that is in use has exactly one owning tokio task with a
//! bounded `mpsc` mailbox. All operations on that key (turns, history reads,
//! clears) are sent to the mailbox and executed one at a time, so a turn's
//! read -> generate -> append cycle never interleaves with another operation
//! on the same key. Different keys run fully in parallel.
//!
//! Commands are processed in mailbox (FIFO) order. Idle actors exit after a
//! timeout and drop out of the registry; the next command for the key spawns
//! a fresh actor. Actors only hold weak handles to the registry and to their
//! own mailbox, so dropping the registry stops every actor.

use std::sync::{Arc, Weak};
use std::time::Duration;

use colloquy_types::chat::{ChatMessage, TurnReply};
use colloquy_types::config::SessionConfig;
use colloquy_types::error::ChatError;
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::chat::turn::TurnRunner;
use crate::session::store::SessionStore;

/// How many times a command is offered to a mailbox before giving up.
const MAX_DELIVERY_ATTEMPTS: usize = 3;

/// Answer from an actor: the command's result, or the command handed back
/// unexecuted because the actor was retiring.
enum Delivery<T> {
    Done(Result<T, ChatError>),
    Bounced,
}

type Reply<T> = oneshot::Sender<Delivery<T>>;

/// Work item for a session actor.
enum SessionCommand {
    Turn {
        user_text: String,
        reply: Reply<TurnReply>,
    },
    History {
        reply: Reply<Vec<ChatMessage>>,
    },
    Clear {
        reply: Reply<()>,
    },
}

impl SessionCommand {
    /// Return the command to its sender without running it.
    fn bounce(self) {
        match self {
            SessionCommand::Turn { reply, .. } => {
                let _ = reply.send(Delivery::Bounced);
            }
            SessionCommand::History { reply } => {
                let _ = reply.send(Delivery::Bounced);
            }
            SessionCommand::Clear { reply } => {
                let _ = reply.send(Delivery::Bounced);
            }
        }
    }
}

type Mailboxes = DashMap<String, mpsc::Sender<SessionCommand>>;

/// Registry of live session actors, keyed by session key.
pub struct SessionActors<S: SessionStore + 'static> {
    runner: Arc<TurnRunner<S>>,
    mailboxes: Arc<Mailboxes>,
    idle_timeout: Duration,
    mailbox_capacity: usize,
}

impl<S: SessionStore + 'static> SessionActors<S> {
    pub fn new(runner: TurnRunner<S>, config: &SessionConfig) -> Self {
        Self {
            runner: Arc::new(runner),
            mailboxes: Arc::new(DashMap::new()),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
            mailbox_capacity: config.mailbox_capacity.max(1),
        }
    }

    /// Override the idle timeout (sub-second values are useful in tests).
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn runner(&self) -> &TurnRunner<S> {
        &self.runner
    }

    /// Number of session actors currently alive.
    pub fn active_sessions(&self) -> usize {
        self.mailboxes.len()
    }

    /// Run a full turn on the session's actor.
    pub async fn turn(&self, session_key: &str, user_text: String) -> Result<TurnReply, ChatError> {
        self.dispatch(session_key, |reply| SessionCommand::Turn {
            user_text: user_text.clone(),
            reply,
        })
        .await
    }

    /// Read the session's history through its actor.
    pub async fn history(&self, session_key: &str) -> Result<Vec<ChatMessage>, ChatError> {
        self.dispatch(session_key, |reply| SessionCommand::History { reply })
            .await
    }

    /// Clear the session's history through its actor.
    pub async fn clear(&self, session_key: &str) -> Result<(), ChatError> {
        self.dispatch(session_key, |reply| SessionCommand::Clear { reply })
            .await
    }

    /// Deliver a command to the key's actor and wait for its result.
    ///
    /// A mailbox can close between lookup and send, and a retiring actor
    /// bounces whatever was still queued. Neither ran the command, so it is
    /// offered again to a fresh actor. A command that was accepted but never
    /// answered (the actor died mid-command) is not re-sent.
    async fn dispatch<T>(
        &self,
        session_key: &str,
        build: impl Fn(Reply<T>) -> SessionCommand,
    ) -> Result<T, ChatError> {
        for _ in 0..MAX_DELIVERY_ATTEMPTS {
            let (reply_tx, reply_rx) = oneshot::channel();
            let mailbox = self.mailbox(session_key);
            if mailbox.send(build(reply_tx)).await.is_err() {
                continue;
            }
            match reply_rx.await {
                Ok(Delivery::Done(result)) => return result,
                Ok(Delivery::Bounced) => continue,
                Err(_) => {
                    return Err(ChatError::SessionUnavailable(format!(
                        "actor for session {session_key} stopped before replying"
                    )));
                }
            }
        }

        Err(ChatError::SessionUnavailable(format!(
            "no actor accepted commands for session {session_key}"
        )))
    }

    /// Get the live mailbox for a key, spawning an actor if needed.
    fn mailbox(&self, session_key: &str) -> mpsc::Sender<SessionCommand> {
        if let Some(existing) = self.mailboxes.get(session_key) {
            if !existing.is_closed() {
                return existing.clone();
            }
        }

        let mut entry = self
            .mailboxes
            .entry(session_key.to_string())
            .or_insert_with(|| self.spawn_actor(session_key));
        if entry.is_closed() {
            *entry = self.spawn_actor(session_key);
        }
        entry.clone()
    }

    fn spawn_actor(&self, session_key: &str) -> mpsc::Sender<SessionCommand> {
        let (tx, rx) = mpsc::channel(self.mailbox_capacity);
        let actor = SessionActor {
            session_key: session_key.to_string(),
            runner: Arc::clone(&self.runner),
            mailboxes: Arc::downgrade(&self.mailboxes),
            own_mailbox: tx.downgrade(),
            idle_timeout: self.idle_timeout,
        };
        tokio::spawn(actor.run(rx));
        debug!(session_id = %session_key, "Spawned session actor");
        tx
    }
}

impl<S: SessionStore + 'static> std::fmt::Debug for SessionActors<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionActors")
            .field("active_sessions", &self.mailboxes.len())
            .field("idle_timeout", &self.idle_timeout)
            .field("mailbox_capacity", &self.mailbox_capacity)
            .finish()
    }
}

/// The task owning one session key.
struct SessionActor<S: SessionStore + 'static> {
    session_key: String,
    runner: Arc<TurnRunner<S>>,
    mailboxes: Weak<Mailboxes>,
    own_mailbox: mpsc::WeakSender<SessionCommand>,
    idle_timeout: Duration,
}

impl<S: SessionStore + 'static> SessionActor<S> {
    async fn run(self, mut rx: mpsc::Receiver<SessionCommand>) {
        loop {
            match tokio::time::timeout(self.idle_timeout, rx.recv()).await {
                Ok(Some(command)) => self.execute(command).await,
                Ok(None) => break,
                Err(_) => {
                    // Deregister only if the registry still points at us.
                    // Anything that slipped into the queue meanwhile is
                    // bounced, never run, so it cannot overlap with the
                    // successor actor for this key.
                    self.deregister();
                    rx.close();
                    while let Some(command) = rx.recv().await {
                        command.bounce();
                    }
                    break;
                }
            }
        }
        debug!(session_id = %self.session_key, "Session actor retired");
    }

    fn deregister(&self) {
        let (Some(mailboxes), Some(own)) = (self.mailboxes.upgrade(), self.own_mailbox.upgrade())
        else {
            return;
        };
        mailboxes.remove_if(&self.session_key, |_, tx| tx.same_channel(&own));
    }

    async fn execute(&self, command: SessionCommand) {
        let key = self.session_key.as_str();
        // A dropped receiver means the caller went away; the work is done
        // regardless and there is nobody to tell.
        match command {
            SessionCommand::Turn { user_text, reply } => {
                let result = self.runner.run(key, &user_text).await;
                let _ = reply.send(Delivery::Done(result));
            }
            SessionCommand::History { reply } => {
                let result = self.runner.store().get_history(key).await;
                let _ = reply.send(Delivery::Done(result.map_err(ChatError::from)));
            }
            SessionCommand::Clear { reply } => {
                let result = self.runner.store().clear_history(key).await;
                let _ = reply.send(Delivery::Done(result.map_err(ChatError::from)));
            }
        }
    }
}
