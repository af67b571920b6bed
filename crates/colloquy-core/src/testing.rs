//! Test doubles shared by the core unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use colloquy_types::chat::ChatMessage;
use colloquy_types::error::RepositoryError;
use colloquy_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use crate::llm::provider::LlmProvider;
use crate::session::memory::InMemorySessionStore;
use crate::session::store::SessionStore;

/// What a [`ScriptedProvider`] answers with.
#[derive(Debug, Clone)]
pub enum Script {
    Reply(String),
    Empty,
    Fail,
}

/// Provider returning a fixed answer and recording every request it sees.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    script: Script,
    delay: Option<Duration>,
    panics_left: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            delay: None,
            panics_left: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(Script::Reply(text.to_string()))
    }

    pub fn failing() -> Self {
        Self::new(Script::Fail)
    }

    /// Sleep before answering, to widen race windows in concurrency tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Panic inside `complete` for the next `times` calls, then follow the script.
    pub fn panicking(self, times: usize) -> Self {
        self.panics_left.store(times, Ordering::SeqCst);
        self
    }

    pub fn recorded(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let panic_now = self
            .panics_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if panic_now {
            panic!("scripted provider panic");
        }
        match &self.script {
            Script::Reply(text) => Ok(CompletionResponse {
                content: Some(text.clone()),
                model: request.model.clone(),
                usage: Usage::default(),
            }),
            Script::Empty => Ok(CompletionResponse {
                content: None,
                model: request.model.clone(),
                usage: Usage::default(),
            }),
            Script::Fail => Err(LlmError::Unavailable("scripted outage".to_string())),
        }
    }
}

/// Store that can be told to fail reads or writes, counting write attempts.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: InMemorySessionStore,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub write_attempts: Mutex<usize>,
}

impl FlakyStore {
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    fn record_write(&self) -> Result<(), RepositoryError> {
        *self.write_attempts.lock().unwrap() += 1;
        if self.fail_writes {
            Err(RepositoryError::Query("disk I/O error".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SessionStore for FlakyStore {
    async fn get_history(&self, session_key: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        if self.fail_reads {
            return Err(RepositoryError::Connection);
        }
        self.inner.get_history(session_key).await
    }

    async fn add_message(
        &self,
        session_key: &str,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        self.record_write()?;
        self.inner.add_message(session_key, message).await
    }

    async fn append_messages(
        &self,
        session_key: &str,
        messages: &[ChatMessage],
    ) -> Result<(), RepositoryError> {
        self.record_write()?;
        self.inner.append_messages(session_key, messages).await
    }

    async fn clear_history(&self, session_key: &str) -> Result<(), RepositoryError> {
        self.record_write()?;
        self.inner.clear_history(session_key).await
    }

    async fn message_count(&self, session_key: &str) -> Result<u64, RepositoryError> {
        self.inner.message_count(session_key).await
    }
}
