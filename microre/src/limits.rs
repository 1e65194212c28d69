//! Resource bounds for a match
//!
//! The matcher backtracks by native recursion, so both the recursion depth
//! and an external interrupt are checked on every step. Tripping either one
//! abandons the search and reports "no match".

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default recursion bound.
///
/// Every level is one native stack frame holding a copy of the match context
/// (a few hundred bytes, more in unoptimized builds), so the bound has to fit
/// the smallest stack a search may run on. 200 levels stay well inside a
/// 2 MiB thread stack in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// Limits applied to every search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    /// Maximum nesting of matcher calls before the search is abandoned
    pub max_depth: usize,
}

impl MatchLimits {
    /// Limits with a custom depth bound
    pub fn with_max_depth(max_depth: usize) -> Self {
        MatchLimits { max_depth }
    }
}

impl Default for MatchLimits {
    fn default() -> Self {
        MatchLimits {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Cooperative cancellation flag shared between a running match and whoever
/// may interrupt it (a REPL's Ctrl-C handler, a watchdog thread).
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that any match polling this token stops
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Clear a previous request
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
