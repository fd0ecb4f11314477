//! Broadcast Channel Adapters
//!
//! Distributes session output using tokio broadcast channels for
//! efficient fan-out to multiple subscribers.
//!
//! # Architecture
//!
//! The `DashboardHub` provides one channel per output kind:
//! - Snapshot updates: wholesale row collections republished whenever a
//!   feed changes (tick, patch, or reload)
//! - Grid commands: fire-and-forget requests addressed to a grid by
//!   `grid_id`
//!
//! Each channel supports multiple receivers with configurable capacity.
//! Sending with no receivers is not an error; the message is dropped.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::domain::grid::GridCommand;
use crate::domain::session::SnapshotRows;
use crate::infrastructure::config::ChannelSettings;

// =============================================================================
// Broadcast Messages
// =============================================================================

/// A republished feed snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotUpdate {
    /// Named feed the snapshot belongs to.
    pub feed: String,
    /// The complete row collection after the change.
    pub rows: SnapshotRows,
}

// =============================================================================
// Dashboard Hub
// =============================================================================

/// Configuration for broadcast channel capacities.
#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    /// Capacity of the snapshot update channel.
    pub snapshots_capacity: usize,
    /// Capacity of the grid command channel.
    pub commands_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            snapshots_capacity: 256,
            commands_capacity: 64,
        }
    }
}

impl From<ChannelSettings> for HubConfig {
    fn from(settings: ChannelSettings) -> Self {
        Self {
            snapshots_capacity: settings.snapshots_capacity,
            commands_capacity: settings.commands_capacity,
        }
    }
}

/// Central hub for session output channels.
///
/// A session publishes into its hub; any number of display adapters
/// subscribe. Lagging receivers lose the oldest messages, which is
/// acceptable here because every snapshot update carries the complete
/// collection.
///
/// # Example
///
/// ```rust
/// use desk_session::{DashboardHub, HubConfig};
///
/// let hub = DashboardHub::new(HubConfig::default());
///
/// // Get a receiver for snapshot updates
/// let mut rx = hub.snapshots_rx();
///
/// // In another task, publish updates
/// // hub.send_snapshot(update);
/// ```
#[derive(Debug)]
pub struct DashboardHub {
    snapshots_tx: broadcast::Sender<SnapshotUpdate>,
    commands_tx: broadcast::Sender<GridCommand>,
}

impl DashboardHub {
    /// Create a new hub with the given configuration.
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        Self {
            snapshots_tx: broadcast::channel(config.snapshots_capacity).0,
            commands_tx: broadcast::channel(config.commands_capacity).0,
        }
    }

    /// Create a new hub with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(HubConfig::default())
    }

    // =========================================================================
    // Snapshot Channel
    // =========================================================================

    /// Send a snapshot update to all subscribers.
    ///
    /// Returns the number of receivers that received the message, or
    /// `None` if there are no active receivers.
    pub fn send_snapshot(&self, update: SnapshotUpdate) -> Option<usize> {
        self.snapshots_tx.send(update).ok()
    }

    /// Get a new receiver for snapshot updates.
    #[must_use]
    pub fn snapshots_rx(&self) -> broadcast::Receiver<SnapshotUpdate> {
        self.snapshots_tx.subscribe()
    }

    /// Get a new snapshot update stream.
    #[must_use]
    pub fn snapshots_stream(&self) -> BroadcastStream<SnapshotUpdate> {
        BroadcastStream::new(self.snapshots_rx())
    }

    /// Get the number of active snapshot receivers.
    #[must_use]
    pub fn snapshots_receiver_count(&self) -> usize {
        self.snapshots_tx.receiver_count()
    }

    // =========================================================================
    // Command Channel
    // =========================================================================

    /// Send a grid command to all subscribers.
    ///
    /// Returns the number of receivers that received the message, or
    /// `None` if there are no active receivers.
    pub fn send_command(&self, command: GridCommand) -> Option<usize> {
        self.commands_tx.send(command).ok()
    }

    /// Get a new receiver for grid commands.
    #[must_use]
    pub fn commands_rx(&self) -> broadcast::Receiver<GridCommand> {
        self.commands_tx.subscribe()
    }

    /// Get a new grid command stream.
    #[must_use]
    pub fn commands_stream(&self) -> BroadcastStream<GridCommand> {
        BroadcastStream::new(self.commands_rx())
    }

    /// Get the number of active command receivers.
    #[must_use]
    pub fn commands_receiver_count(&self) -> usize {
        self.commands_tx.receiver_count()
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Get statistics about both channels.
    #[must_use]
    pub fn stats(&self) -> HubStats {
        HubStats {
            snapshots_receivers: self.snapshots_receiver_count(),
            commands_receivers: self.commands_receiver_count(),
        }
    }
}

/// Shared hub reference.
pub type SharedHub = Arc<DashboardHub>;

/// Statistics about hub channels.
#[derive(Debug, Clone, Default)]
pub struct HubStats {
    /// Number of snapshot update receivers.
    pub snapshots_receivers: usize,
    /// Number of grid command receivers.
    pub commands_receivers: usize,
}

impl HubStats {
    /// Total number of receivers across both channels.
    #[must_use]
    pub const fn total_receivers(&self) -> usize {
        self.snapshots_receivers + self.commands_receivers
    }
}

// =============================================================================
// Tests
// =============================================================================
