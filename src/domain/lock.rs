use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// What a submitter does when asked to purchase again after it locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReentryPolicy {
    /// Issue the request anyway; gating is left to `is_disabled`.
    #[default]
    Allow,
    /// Refuse without touching the network.
    Reject,
}

/// One-way guard marking that a purchase has been submitted.
///
/// Starts unlocked and can only ever move to locked. There is no way to
/// release it; a new checkout needs a new submitter.
#[derive(Debug, Default)]
pub struct SubmissionLock {
    locked: AtomicBool,
}

impl SubmissionLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks and reports whether the lock was already held before this call.
    pub fn engage(&self) -> bool {
        self.locked.swap(true, Ordering::SeqCst)
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_starts_released() {
        let lock = SubmissionLock::new();
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_lock_is_monotonic() {
        let lock = SubmissionLock::new();
        assert!(!lock.engage());
        assert!(lock.is_locked());

        // Engaging again reports the previous state and stays locked
        assert!(lock.engage());
        assert!(lock.is_locked());
    }

    #[test]
    fn test_reentry_policy_serialization() {
        assert_eq!(ReentryPolicy::default(), ReentryPolicy::Allow);
        let policy: ReentryPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, ReentryPolicy::Reject);
    }
}
