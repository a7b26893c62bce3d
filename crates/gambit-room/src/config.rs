//! Room configuration.

/// Settings applied to every room actor the manager spawns.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Bound of each room's job queue. Callers wait once it is full.
    pub queue_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self { queue_capacity: 64 }
    }
}
