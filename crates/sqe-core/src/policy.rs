// SPDX-License-Identifier: BUSL-1.1
//! Static criticality policy: tier → interval/risk mapping.
//!
//! | Tier     | Requalification | Audit     | Default risk |
//! |----------|-----------------|-----------|--------------|
//! | Critical | 12 months       | 12 months | High         |
//! | Major    | 24 months       | 36 months | Medium       |
//! | Minor    | 48 months       | none      | Low          |
//!
//! Minor-tier suppliers carry no periodic audit obligation — their audit
//! interval is `None` and the lifecycle calculator never produces a next
//! audit date for them.

use crate::supplier::{CriticalityTier, RiskClassification};

/// Interval policy for one criticality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    /// Months between qualification and the next requalification.
    pub requalification_months: u32,
    /// Months between audits, or `None` when the tier requires no
    /// periodic audit.
    pub audit_months: Option<u32>,
    /// Risk classification assigned at qualification time.
    pub risk: RiskClassification,
}

/// Look up the policy for a tier.
///
/// Total over the closed [`CriticalityTier`] enum; unrecognized tier
/// strings are rejected at the parse boundary and never reach this table.
pub fn tier_policy(tier: CriticalityTier) -> TierPolicy {
    match tier {
        CriticalityTier::Critical => TierPolicy {
            requalification_months: 12,
            audit_months: Some(12),
            risk: RiskClassification::High,
        },
        CriticalityTier::Major => TierPolicy {
            requalification_months: 24,
            audit_months: Some(36),
            risk: RiskClassification::Medium,
        },
        CriticalityTier::Minor => TierPolicy {
            requalification_months: 48,
            audit_months: None,
            risk: RiskClassification::Low,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table_matches_tier_cadence() {
        let critical = tier_policy(CriticalityTier::Critical);
        assert_eq!(critical.requalification_months, 12);
        assert_eq!(critical.audit_months, Some(12));
        assert_eq!(critical.risk, RiskClassification::High);

        let major = tier_policy(CriticalityTier::Major);
        assert_eq!(major.requalification_months, 24);
        assert_eq!(major.audit_months, Some(36));
        assert_eq!(major.risk, RiskClassification::Medium);

        let minor = tier_policy(CriticalityTier::Minor);
        assert_eq!(minor.requalification_months, 48);
        assert_eq!(minor.audit_months, None);
        assert_eq!(minor.risk, RiskClassification::Low);
    }
}
