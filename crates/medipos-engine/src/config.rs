//! # Engine Configuration
//!
//! Deployment-tunable policies for the purchase engine.

use medipos_core::RemainderPolicy;

/// Configuration for [`PurchaseEngine`](crate::PurchaseEngine).
///
/// ## Example
/// ```rust
/// use medipos_engine::EngineConfig;
/// use medipos_core::RemainderPolicy;
///
/// let config = EngineConfig::default()
///     .remainder_policy(RemainderPolicy::ClampToZero)
///     .reconcile_tolerance_cents(1);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Governs the sign of a bill's remainder.
    /// Default: `AllowChangeDue` (remainder = total − received, exactly).
    pub remainder_policy: RemainderPolicy,

    /// How far the declared net total may diverge from the sum of line
    /// nets before the bill is rejected.
    /// Default: 0 (integer-cents arithmetic is exact).
    pub reconcile_tolerance_cents: i64,

    /// Capacity of each per-product reminder broadcast channel. Slow
    /// subscribers past this depth lose the oldest reminders (best-effort
    /// delivery).
    /// Default: 64
    pub reminder_capacity: usize,
}

impl EngineConfig {
    /// Sets the remainder policy.
    pub fn remainder_policy(mut self, policy: RemainderPolicy) -> Self {
        self.remainder_policy = policy;
        self
    }

    /// Sets the totals reconciliation tolerance.
    pub fn reconcile_tolerance_cents(mut self, cents: i64) -> Self {
        self.reconcile_tolerance_cents = cents;
        self
    }

    /// Sets the reminder channel capacity.
    pub fn reminder_capacity(mut self, capacity: usize) -> Self {
        self.reminder_capacity = capacity;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            remainder_policy: RemainderPolicy::default(),
            reconcile_tolerance_cents: 0,
            reminder_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.remainder_policy, RemainderPolicy::AllowChangeDue);
        assert_eq!(config.reconcile_tolerance_cents, 0);
        assert_eq!(config.reminder_capacity, 64);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::default()
            .remainder_policy(RemainderPolicy::ClampToZero)
            .reconcile_tolerance_cents(2)
            .reminder_capacity(8);

        assert_eq!(config.remainder_policy, RemainderPolicy::ClampToZero);
        assert_eq!(config.reconcile_tolerance_cents, 2);
        assert_eq!(config.reminder_capacity, 8);
    }
}
