//! Runtime configuration for a device's data manager.

use std::path::{Path, PathBuf};
use std::time::Duration;
use todo_sync_core::DEFAULT_DEBOUNCE;
use todo_sync_types::DeviceRole;

/// Delay between startup and the first peer list request.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on waiting for a peer's reply to a list request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for [`crate::TodoManager`].
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Which side of the pair this device is.
    pub role: DeviceRole,
    /// Directory holding the role's list blob.
    pub data_dir: PathBuf,
    /// Debounce window after the last local mutation.
    pub debounce: Duration,
    /// Delay before the startup peer list request.
    pub startup_delay: Duration,
    /// Timeout applied to peer list requests.
    pub request_timeout: Duration,
}

impl SyncConfig {
    /// Create a configuration with default timings.
    pub fn new(role: DeviceRole, data_dir: impl AsRef<Path>) -> Self {
        Self {
            role,
            data_dir: data_dir.as_ref().to_path_buf(),
            debounce: DEFAULT_DEBOUNCE,
            startup_delay: DEFAULT_STARTUP_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the debounce window.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the startup request delay.
    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Set the peer request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full path of this role's list blob.
    pub fn blob_path(&self) -> PathBuf {
        self.data_dir.join(self.role.blob_name())
    }
}
