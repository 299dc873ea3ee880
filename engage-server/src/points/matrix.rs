//! Point Matrix
//!
//! Maps an event kind to a point rule. Rules are either a fixed value or a
//! function of the engagement (e.g. proportional to a superchat amount).
//! The matrix in effect is captured at write time: changing it never
//! rewrites previously written ledger rows.

use shared::models::{Engagement, EventKind};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Computed rule: reads the engagement (typically its raw payload) and
/// returns a signed delta.
pub type ComputeFn = Arc<dyn Fn(&Engagement) -> i64 + Send + Sync>;

/// One point rule
#[derive(Clone)]
pub enum PointRule {
    Fixed(i64),
    Computed(ComputeFn),
}

impl fmt::Debug for PointRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointRule::Fixed(n) => write!(f, "Fixed({n})"),
            PointRule::Computed(_) => write!(f, "Computed(..)"),
        }
    }
}

/// Active rule set
///
/// Injected into the accrual engine by the caller — there is no ambient
/// global configuration.
#[derive(Debug, Clone)]
pub struct PointMatrix {
    rules: HashMap<EventKind, PointRule>,
}

impl PointMatrix {
    /// Matrix with no rules: every kind resolves to 0.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Builder-style rule registration (replaces any previous rule for the kind).
    pub fn with_rule(mut self, kind: EventKind, rule: PointRule) -> Self {
        self.rules.insert(kind, rule);
        self
    }

    pub fn with_fixed(self, kind: EventKind, value: i64) -> Self {
        self.with_rule(kind, PointRule::Fixed(value))
    }

    /// Resolve the delta for one engagement.
    ///
    /// A kind absent from the matrix earns 0 — unconfigured event types are
    /// not an error.
    pub fn resolve(&self, engagement: &Engagement) -> i64 {
        match self.rules.get(&engagement.event_kind) {
            None => 0,
            Some(PointRule::Fixed(n)) => *n,
            Some(PointRule::Computed(f)) => f(engagement),
        }
    }
}

impl Default for PointMatrix {
    /// Default matrix: COMMENT=5, LIKE=2, SUPERCHAT=10, LIVESTREAM_CHAT=1.
    fn default() -> Self {
        Self::empty()
            .with_fixed(EventKind::Comment, 5)
            .with_fixed(EventKind::Like, 2)
            .with_fixed(EventKind::Superchat, 10)
            .with_fixed(EventKind::LivestreamChat, 1)
    }
}
