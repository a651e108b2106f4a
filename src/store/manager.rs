//! Store manager
//!
//! A manager owns one working directory and the named store instances
//! created inside it. Exactly one manager exists per provisioned store;
//! shutting it down closes every handle it produced and removes the working
//! directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

use super::handle::StoreHandle;
use super::registry::registry;

/// Marker file proving the working directory is writable and owned
const MARKER_FILE: &str = ".ontostore";

struct ManagerState {
    /// Owned temporary directory, dropped (removed) at shutdown
    temp: Option<TempDir>,
    initialized: bool,
    shut_down: bool,
    configs: IndexMap<String, StoreConfig>,
    stores: IndexMap<String, StoreHandle>,
}

/// Administrative handle for the stores inside one working directory
pub struct StoreManager {
    root: PathBuf,
    state: Mutex<ManagerState>,
}

impl StoreManager {
    /// Create a manager rooted at a caller-owned directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        StoreManager {
            root: root.into(),
            state: Mutex::new(ManagerState {
                temp: None,
                initialized: false,
                shut_down: false,
                configs: IndexMap::new(),
                stores: IndexMap::new(),
            }),
        }
    }

    /// Create a manager owning a temporary directory. The directory is
    /// removed at shutdown, or at process exit at the latest.
    pub fn with_temp_dir(temp: TempDir) -> Self {
        let root = temp.path().to_path_buf();
        StoreManager {
            root,
            state: Mutex::new(ManagerState {
                temp: Some(temp),
                initialized: false,
                shut_down: false,
                configs: IndexMap::new(),
                stores: IndexMap::new(),
            }),
        }
    }

    /// The working directory backing this manager
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Initialize the manager. Fails fast if the working directory cannot be
    /// created or is not writable.
    pub fn initialize(&self) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.shut_down {
            return Err(StoreError::ManagerInit {
                reason: "manager already shut down".to_string(),
            });
        }
        if state.initialized {
            return Ok(());
        }

        fs::create_dir_all(&self.root).map_err(|e| StoreError::ManagerInit {
            reason: format!("cannot create {}: {}", self.root.display(), e),
        })?;
        // Probe writability up front rather than failing on first use
        fs::write(self.root.join(MARKER_FILE), b"ontostore store manager root\n").map_err(
            |e| StoreError::ManagerInit {
                reason: format!("{} is not writable: {}", self.root.display(), e),
            },
        )?;

        state.initialized = true;
        debug!(root = %self.root.display(), "store manager initialized");
        Ok(())
    }

    /// Register a store configuration under its store id
    pub fn add_store_config(&self, config: StoreConfig) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.initialized || state.shut_down {
            return Err(StoreError::Provisioning {
                reason: "manager is not initialized".to_string(),
            });
        }
        state.configs.insert(config.id().to_string(), config);
        Ok(())
    }

    /// Open (or create) the named store, returning its handle. Opening the
    /// same name twice returns the same instance.
    pub fn open_store(&self, name: &str) -> StoreResult<StoreHandle> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.initialized || state.shut_down {
            return Err(StoreError::Provisioning {
                reason: "manager is not initialized".to_string(),
            });
        }
        if let Some(handle) = state.stores.get(name) {
            return Ok(handle.clone());
        }

        let config = state.configs.get(name).ok_or_else(|| StoreError::Provisioning {
            reason: format!("no configuration registered for store '{}'", name),
        })?;
        let engine_type = config.engine_type().to_string();
        let factory = registry()
            .get(&engine_type)
            .ok_or_else(|| StoreError::Provisioning {
                reason: format!("unknown engine type '{}'", engine_type),
            })?;
        let backend = factory.create(config)?;
        let handle = StoreHandle::new(name, backend);
        state.stores.insert(name.to_string(), handle.clone());
        info!(store = name, engine = %engine_type, "store opened");
        Ok(handle)
    }

    /// Names of all currently open stores
    pub fn store_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.stores.keys().cloned().collect()
    }

    /// Shut down the manager: close every store it owns and remove the
    /// working directory. Idempotent.
    pub fn shutdown(&self) -> StoreResult<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.shut_down {
            return Ok(());
        }
        state.shut_down = true;

        for handle in state.stores.values() {
            handle.close();
        }
        state.stores.clear();
        state.configs.clear();

        if let Some(temp) = state.temp.take() {
            let path = temp.path().to_path_buf();
            if let Err(e) = temp.close() {
                // Cleanup failure is reported but does not block shutdown
                warn!(path = %path.display(), error = %e, "working directory removal failed");
                return Err(StoreError::Shutdown {
                    reason: format!("cannot remove {}: {}", path.display(), e),
                });
            }
        } else {
            // Caller-owned root: only the marker is ours to remove
            let _ = fs::remove_file(self.root.join(MARKER_FILE));
        }
        info!(root = %self.root.display(), "store manager shut down");
        Ok(())
    }

    /// Check if shutdown has completed
    pub fn is_shut_down(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.shut_down
    }
}

impl std::fmt::Debug for StoreManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        write!(
            f,
            "StoreManager {{ root: {:?}, stores: {}, shut_down: {} }}",
            self.root,
            state.stores.len(),
            state.shut_down
        )
    }
}
