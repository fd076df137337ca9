//! Application state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use taskdesk_core::Desk;

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    desk: Desk,
    data_dir: PathBuf,
}

impl AppState {
    /// Open the JSON stores in the configured data directory
    pub async fn new(config: &ServerConfig) -> taskdesk_core::Result<Self> {
        let desk = Desk::open(&config.data_dir, config.seed_categories).await?;
        Ok(Self::with_desk(desk, config.data_dir.clone()))
    }

    pub fn with_desk(desk: Desk, data_dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(AppStateInner { desk, data_dir }),
        }
    }

    pub fn desk(&self) -> &Desk {
        &self.inner.desk
    }

    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }
}
