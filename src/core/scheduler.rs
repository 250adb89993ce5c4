//! Per-tick throttling decisions.

/// Dirty state the scheduler decides on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags {
    /// Scale/offset changed; placed tiles need new rectangles
    pub transform: bool,
    /// The needed tile set may have changed; reconcile and reload
    pub tiles: bool,
    /// Skip throttling for the next reload (set on zoom-level change)
    pub force_immediate: bool,
}

impl DirtyFlags {
    pub fn mark_tiles(&mut self) {
        self.tiles = true;
        self.transform = true;
    }

    pub fn mark_transform(&mut self) {
        self.transform = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What the controller should do this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePlan {
    /// Nothing is stale
    Idle,
    /// Only geometry changed: move existing tiles, no reload
    Reposition,
    /// Reconcile the active set and request content
    Reload,
    /// A reload is due but this tick is not on the throttle boundary
    Throttled,
}

/// Counts ticks and applies the reload throttle
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    tick: u64,
    throttle_interval: u32,
}

impl FrameScheduler {
    pub fn new(throttle_interval: u32) -> Self {
        if throttle_interval == 0 {
            log::warn!("throttle interval 0 treated as 1");
        }
        Self {
            tick: 0,
            throttle_interval: throttle_interval.max(1),
        }
    }

    /// Starts a new tick and returns its number (first tick is 1)
    pub fn advance(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn throttle_interval(&self) -> u32 {
        self.throttle_interval
    }

    /// Whether the current tick falls on a throttle boundary
    pub fn on_boundary(&self) -> bool {
        self.tick % u64::from(self.throttle_interval) == 0
    }

    pub fn plan(&self, flags: &DirtyFlags) -> FramePlan {
        if flags.tiles {
            if flags.force_immediate || self.on_boundary() {
                FramePlan::Reload
            } else {
                FramePlan::Throttled
            }
        } else if flags.transform {
            FramePlan::Reposition
        } else {
            FramePlan::Idle
        }
    }
}
