use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub refresh_interval: Duration,
    pub animation_tick: Duration,
    pub search_debounce: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_millis(1500),
            animation_tick: Duration::from_millis(16),
            search_debounce: Duration::from_millis(100),
        }
    }
}
