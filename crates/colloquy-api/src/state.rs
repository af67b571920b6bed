//! Application state wiring the chat service to its concrete store and
//! provider.
//!
//! `ChatService` is generic over the store; the backend is chosen at start-up
//! from `[storage] backend`, so `SessionBackend` dispatches to whichever store
//! was configured.

use std::path::PathBuf;
use std::sync::Arc;

use colloquy_core::chat::service::ChatService;
use colloquy_core::llm::box_provider::BoxLlmProvider;
use colloquy_core::session::memory::InMemorySessionStore;
use colloquy_core::session::store::SessionStore;
use colloquy_infra::config::{load_global_config, resolve_data_dir};
use colloquy_infra::llm::create_provider;
use colloquy_infra::sqlite::pool::{DatabasePool, default_database_url};
use colloquy_infra::sqlite::session::SqliteSessionStore;
use colloquy_types::chat::ChatMessage;
use colloquy_types::config::{GlobalConfig, StorageBackend};
use colloquy_types::error::RepositoryError;

/// The session store selected by configuration.
#[derive(Debug)]
pub enum SessionBackend {
    Sqlite(SqliteSessionStore),
    Memory(InMemorySessionStore),
}

impl SessionBackend {
    pub fn kind(&self) -> StorageBackend {
        match self {
            SessionBackend::Sqlite(_) => StorageBackend::Sqlite,
            SessionBackend::Memory(_) => StorageBackend::Memory,
        }
    }
}

impl SessionStore for SessionBackend {
    async fn get_history(&self, session_key: &str) -> Result<Vec<ChatMessage>, RepositoryError> {
        match self {
            SessionBackend::Sqlite(store) => store.get_history(session_key).await,
            SessionBackend::Memory(store) => store.get_history(session_key).await,
        }
    }

    async fn add_message(
        &self,
        session_key: &str,
        message: &ChatMessage,
    ) -> Result<(), RepositoryError> {
        match self {
            SessionBackend::Sqlite(store) => store.add_message(session_key, message).await,
            SessionBackend::Memory(store) => store.add_message(session_key, message).await,
        }
    }

    async fn append_messages(
        &self,
        session_key: &str,
        messages: &[ChatMessage],
    ) -> Result<(), RepositoryError> {
        match self {
            SessionBackend::Sqlite(store) => store.append_messages(session_key, messages).await,
            SessionBackend::Memory(store) => store.append_messages(session_key, messages).await,
        }
    }

    async fn clear_history(&self, session_key: &str) -> Result<(), RepositoryError> {
        match self {
            SessionBackend::Sqlite(store) => store.clear_history(session_key).await,
            SessionBackend::Memory(store) => store.clear_history(session_key).await,
        }
    }

    async fn message_count(&self, session_key: &str) -> Result<u64, RepositoryError> {
        match self {
            SessionBackend::Sqlite(store) => store.message_count(session_key).await,
            SessionBackend::Memory(store) => store.message_count(session_key).await,
        }
    }
}

pub type ConcreteChatService = ChatService<SessionBackend>;

/// Start-up overrides taken from the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct InitOptions {
    /// Force the in-memory store regardless of config.
    pub memory: bool,
}

/// Shared application state, used by CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: Arc<GlobalConfig>,
    pub data_dir: PathBuf,
    pub storage: StorageBackend,
}

impl AppState {
    /// Load config, open the configured store, and build the provider.
    pub async fn init(options: InitOptions) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let mut config = load_global_config(&data_dir).await;
        if options.memory {
            config.storage.backend = StorageBackend::Memory;
        }

        let backend = match config.storage.backend {
            StorageBackend::Sqlite => {
                let db_url = config
                    .storage
                    .database_url
                    .clone()
                    .unwrap_or_else(|| default_database_url(&data_dir));
                let pool = DatabasePool::new(&db_url).await?;
                tracing::debug!(url = %db_url, "Opened session database");
                SessionBackend::Sqlite(SqliteSessionStore::new(pool))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using the in-memory session store; history is lost on exit");
                SessionBackend::Memory(InMemorySessionStore::new())
            }
        };

        let provider = create_provider(&config.generation);
        Ok(Self::new(backend, provider, config, data_dir))
    }

    pub fn new(
        backend: SessionBackend,
        provider: BoxLlmProvider,
        config: GlobalConfig,
        data_dir: PathBuf,
    ) -> Self {
        let storage = backend.kind();
        let chat_service = ChatService::new(
            Arc::new(backend),
            provider,
            &config.generation,
            &config.sessions,
        );
        Self {
            chat_service: Arc::new(chat_service),
            config: Arc::new(config),
            data_dir,
            storage,
        }
    }
}
