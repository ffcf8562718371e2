//! Engine configuration.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::search::MAX_SEARCH_DEPTH;
use crate::tt::DEFAULT_TT_MB;

/// Node budget used when the caller does not give one.
pub const DEFAULT_NODE_BUDGET: u64 = 10_000;

/// How a session runs the engine's reply search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DispatchMode {
    /// Search on the calling thread before the request returns.
    #[default]
    Inline,
    /// Search on a worker thread; the session holds its handle.
    Background,
}

/// Follow-up work the owner must do after an option changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionAction {
    /// The transposition table must be rebuilt with this many megabytes.
    ReinitHash(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Nodes per search request.
    pub node_budget: u64,
    /// Transposition table size in megabytes.
    pub tt_mb: usize,
    /// Deepest iteration the searcher will start.
    pub max_depth: u32,
    /// Wall-clock cap per search, `None` for node budget only.
    pub time_cap: Option<Duration>,
    /// Nodes between wall-clock checks.
    pub check_interval: u64,
    pub dispatch: DispatchMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            node_budget: DEFAULT_NODE_BUDGET,
            tt_mb: DEFAULT_TT_MB,
            max_depth: MAX_SEARCH_DEPTH,
            time_cap: Some(Duration::from_secs(2)),
            check_interval: 2048,
            dispatch: DispatchMode::Inline,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_node_budget(mut self, nodes: u64) -> Self {
        self.node_budget = nodes;
        self
    }

    #[must_use]
    pub fn with_tt_mb(mut self, mb: usize) -> Self {
        self.tt_mb = mb.max(1);
        self
    }

    /// Clamped to `1..=MAX_SEARCH_DEPTH`.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth.clamp(1, MAX_SEARCH_DEPTH);
        self
    }

    #[must_use]
    pub fn with_time_cap(mut self, cap: Option<Duration>) -> Self {
        self.time_cap = cap;
        self
    }

    #[must_use]
    pub fn with_check_interval(mut self, nodes: u64) -> Self {
        self.check_interval = nodes.max(1);
        self
    }

    #[must_use]
    pub fn with_dispatch(mut self, dispatch: DispatchMode) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Apply a UCI `setoption`. Unknown names and unparsable values are ignored.
    ///
    /// Recognised names (case-insensitive): `Hash` (MB), `Nodes`,
    /// `MoveTime` (ms, 0 disables the cap) and `Depth`.
    pub fn apply_option(&mut self, name: &str, value: Option<&str>) -> Option<OptionAction> {
        let normalized = name.trim().to_ascii_lowercase();
        let number = value.and_then(|v| v.trim().parse::<u64>().ok());
        match (normalized.as_str(), number) {
            ("hash", Some(mb)) => {
                let mb = usize::try_from(mb).unwrap_or(usize::MAX).max(1);
                if mb != self.tt_mb {
                    self.tt_mb = mb;
                    return Some(OptionAction::ReinitHash(mb));
                }
            }
            ("nodes", Some(nodes)) => self.node_budget = nodes,
            ("movetime", Some(0)) => self.time_cap = None,
            ("movetime", Some(ms)) => self.time_cap = Some(Duration::from_millis(ms)),
            ("depth", Some(depth)) => {
                let depth = u32::try_from(depth).unwrap_or(MAX_SEARCH_DEPTH);
                self.max_depth = depth.clamp(1, MAX_SEARCH_DEPTH);
            }
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.node_budget, 10_000);
        assert_eq!(config.tt_mb, 16);
        assert_eq!(config.time_cap, Some(Duration::from_secs(2)));
        assert_eq!(config.dispatch, DispatchMode::Inline);
    }

    #[test]
    fn builder_clamps() {
        let config = EngineConfig::default()
            .with_max_depth(500)
            .with_check_interval(0)
            .with_tt_mb(0);
        assert_eq!(config.max_depth, MAX_SEARCH_DEPTH);
        assert_eq!(config.check_interval, 1);
        assert_eq!(config.tt_mb, 1);
    }

    #[test]
    fn setoption_hash_requests_rebuild() {
        let mut config = EngineConfig::default();
        assert_eq!(
            config.apply_option("Hash", Some("32")),
            Some(OptionAction::ReinitHash(32))
        );
        assert_eq!(config.apply_option("hash", Some("32")), None);
        assert_eq!(config.tt_mb, 32);
    }

    #[test]
    fn setoption_limits() {
        let mut config = EngineConfig::default();
        config.apply_option("Nodes", Some("5000"));
        config.apply_option("MoveTime", Some("250"));
        config.apply_option("Depth", Some("6"));
        config.apply_option("Bogus", Some("1"));
        config.apply_option("Nodes", Some("lots"));
        assert_eq!(config.node_budget, 5000);
        assert_eq!(config.time_cap, Some(Duration::from_millis(250)));
        assert_eq!(config.max_depth, 6);

        config.apply_option("MoveTime", Some("0"));
        assert_eq!(config.time_cap, None);
    }
}
