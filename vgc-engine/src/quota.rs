//! Session quota ledger
//!
//! Tracks the cumulative point cost of provider calls within one session
//! and gates expensive calls behind operator confirmation. The ledger is
//! informational: the provider enforces the real daily ceiling server-side.
//! Never persisted; a process restart resets it.

use crate::provider::OperatorIo;
use vgc_common::{Error, Result};

/// Provider-defined daily budget, used only for session-relative display.
pub const DAILY_QUOTA: u64 = 10_000;

/// Charges above this many points require operator confirmation.
pub const CONFIRM_THRESHOLD: u64 = 100;

/// Remaining-budget level that triggers a warning after a charge.
const LOW_QUOTA_WARNING: u64 = 1_000;

/// Point costs are configuration constants, not provider protocol truth.
pub const SEARCH_COST: u64 = 100;
pub const DETAIL_COST_PER_ITEM: u64 = 1;

/// Session-scoped quota counter.
#[derive(Debug)]
pub struct QuotaLedger {
    used: u64,
    total: u64,
}

/// Snapshot of ledger state for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaStatus {
    pub used: u64,
    pub remaining: u64,
    pub total: u64,
    pub percent_used: f64,
}

impl Default for QuotaLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotaLedger {
    pub fn new() -> Self {
        Self {
            used: 0,
            total: DAILY_QUOTA,
        }
    }

    /// Add `points` to the session total, first obtaining operator
    /// confirmation when the charge exceeds [`CONFIRM_THRESHOLD`].
    ///
    /// A declined confirmation returns `Error::QuotaDeclined` and leaves
    /// the used-points counter unchanged.
    pub async fn estimate_and_charge(
        &mut self,
        points: u64,
        label: &str,
        io: &dyn OperatorIo,
    ) -> Result<()> {
        if points > CONFIRM_THRESHOLD {
            io.say(&format!(
                "\nHigh-quota operation: {} will use {} points",
                label, points
            ));
            if !io.confirm("Continue? (y/n): ").await? {
                tracing::info!(points, label, "Quota charge declined by operator");
                return Err(Error::QuotaDeclined);
            }
        }

        self.used += points;
        tracing::debug!(points, label, used = self.used, "Charged quota points");

        let remaining = self.total.saturating_sub(self.used);
        if remaining < LOW_QUOTA_WARNING {
            tracing::warn!(
                used = self.used,
                remaining,
                "Session quota running low"
            );
            io.say(&format!(
                "\nWarning: used {} quota points in this session ({} remaining)",
                self.used, remaining
            ));
        }

        Ok(())
    }

    /// Current ledger state, purely for display.
    pub fn status(&self) -> QuotaStatus {
        let remaining = self.total.saturating_sub(self.used);
        QuotaStatus {
            used: self.used,
            remaining,
            total: self.total,
            percent_used: (self.used as f64 / self.total as f64) * 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::OperatorIo;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted operator: pops answers front-to-back, records prompts.
    pub struct ScriptedIo {
        answers: Mutex<Vec<String>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedIo {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl OperatorIo for ScriptedIo {
        fn say(&self, _line: &str) {}

        async fn ask(&self, prompt: &str) -> vgc_common::Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            let mut answers = self.answers.lock().unwrap();
            if answers.is_empty() {
                Ok(String::new())
            } else {
                Ok(answers.remove(0))
            }
        }
    }

    #[tokio::test]
    async fn test_small_charge_never_prompts() {
        let mut ledger = QuotaLedger::new();
        let io = ScriptedIo::new(&[]);

        ledger.estimate_and_charge(100, "search", &io).await.unwrap();

        assert_eq!(ledger.status().used, 100);
        assert!(io.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_large_charge_prompts_and_commits_on_yes() {
        let mut ledger = QuotaLedger::new();
        let io = ScriptedIo::new(&["y"]);

        ledger
            .estimate_and_charge(150, "detailed search", &io)
            .await
            .unwrap();

        assert_eq!(ledger.status().used, 150);
        assert_eq!(io.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_declined_charge_leaves_ledger_unchanged() {
        let mut ledger = QuotaLedger::new();
        let io = ScriptedIo::new(&["n"]);

        let err = ledger
            .estimate_and_charge(150, "detailed search", &io)
            .await
            .unwrap_err();

        assert!(err.is_quota_declined());
        assert_eq!(ledger.status().used, 0);
    }

    #[tokio::test]
    async fn test_status_math() {
        let mut ledger = QuotaLedger::new();
        let io = ScriptedIo::new(&[]);
        ledger.estimate_and_charge(100, "search", &io).await.unwrap();

        let status = ledger.status();
        assert_eq!(status.used, 100);
        assert_eq!(status.remaining, DAILY_QUOTA - 100);
        assert_eq!(status.total, DAILY_QUOTA);
        assert!((status.percent_used - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_charges_accumulate() {
        let mut ledger = QuotaLedger::new();
        let io = ScriptedIo::new(&[]);
        for _ in 0..3 {
            ledger.estimate_and_charge(100, "search", &io).await.unwrap();
        }
        assert_eq!(ledger.status().used, 300);
    }
}
