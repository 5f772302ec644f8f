//! Lead funnel: transition table and the dashboard report.
//!
//! Funnel shape: New → Calling → Quoted → Closed/Rejected. Quoted may fall
//! back to Calling (re-negotiation) and Rejected may return to Calling
//! (re-engagement). Closed is terminal — it means the lead converted.

use serde::{Deserialize, Serialize};

use crate::models::lead::{LeadRow, LeadSource, LeadStatus};

const FUNNEL_TRANSITIONS: &[(LeadStatus, &[LeadStatus])] = &[
    (
        LeadStatus::New,
        &[LeadStatus::Calling, LeadStatus::Rejected],
    ),
    (
        LeadStatus::Calling,
        &[LeadStatus::Quoted, LeadStatus::Rejected],
    ),
    (
        LeadStatus::Quoted,
        &[LeadStatus::Closed, LeadStatus::Rejected, LeadStatus::Calling],
    ),
    (LeadStatus::Closed, &[]),
    (LeadStatus::Rejected, &[LeadStatus::Calling]),
];

pub fn allowed_transitions(from: LeadStatus) -> &'static [LeadStatus] {
    FUNNEL_TRANSITIONS
        .iter()
        .find(|(status, _)| *status == from)
        .map(|(_, targets)| *targets)
        .unwrap_or(&[])
}

pub fn can_transition(from: LeadStatus, to: LeadStatus) -> bool {
    allowed_transitions(from).contains(&to)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunnelError {
    pub from: LeadStatus,
    pub to: LeadStatus,
}

impl std::fmt::Display for FunnelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "illegal lead status transition {} -> {} (allowed: {})",
            self.from,
            self.to,
            allowed_transitions(self.from)
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

pub fn validate_transition(from: LeadStatus, to: LeadStatus) -> Result<(), FunnelError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(FunnelError { from, to })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Funnel report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: LeadStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceCount {
    pub source: LeadSource,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelReport {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub by_source: Vec<SourceCount>,
    /// Closed (converted) leads / total, 0.0 for an empty funnel.
    pub conversion_rate: f64,
}

const ALL_STATUSES: &[LeadStatus] = &[
    LeadStatus::New,
    LeadStatus::Calling,
    LeadStatus::Quoted,
    LeadStatus::Closed,
    LeadStatus::Rejected,
];

const ALL_SOURCES: &[LeadSource] = &[
    LeadSource::Referral,
    LeadSource::Website,
    LeadSource::Instagram,
    LeadSource::WalkIn,
    LeadSource::Marketplace,
    LeadSource::Other,
];

/// Aggregates leads into the dashboard funnel report. Every status appears in
/// the output even at zero; sources only when present.
pub fn funnel_report(leads: &[LeadRow]) -> FunnelReport {
    let total = leads.len();

    let by_status = ALL_STATUSES
        .iter()
        .map(|&status| StatusCount {
            status,
            count: leads.iter().filter(|l| l.status == status).count(),
        })
        .collect();

    let by_source = ALL_SOURCES
        .iter()
        .filter_map(|&source| {
            let count = leads.iter().filter(|l| l.source == source).count();
            (count > 0).then_some(SourceCount { source, count })
        })
        .collect();

    let closed = leads
        .iter()
        .filter(|l| l.status == LeadStatus::Closed)
        .count();
    let conversion_rate = if total == 0 {
        0.0
    } else {
        closed as f64 / total as f64
    };

    FunnelReport {
        total,
        by_status,
        by_source,
        conversion_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;
    use LeadStatus::*;

    fn lead(status: LeadStatus, source: LeadSource) -> LeadRow {
        LeadRow {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            company: None,
            phone: "+15550100".to_string(),
            source,
            status,
            note: None,
            assigned_to: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_forward_funnel_moves() {
        assert!(can_transition(New, Calling));
        assert!(can_transition(Calling, Quoted));
        assert!(can_transition(Quoted, Closed));
    }

    #[test]
    fn test_no_skipping_to_quoted() {
        assert!(!can_transition(New, Quoted));
        assert!(!can_transition(New, Closed));
    }

    #[test]
    fn test_rejection_from_any_open_stage() {
        assert!(can_transition(New, Rejected));
        assert!(can_transition(Calling, Rejected));
        assert!(can_transition(Quoted, Rejected));
    }

    #[test]
    fn test_closed_is_terminal() {
        assert!(allowed_transitions(Closed).is_empty());
    }

    #[test]
    fn test_rejected_can_be_reengaged() {
        assert!(can_transition(Rejected, Calling));
        assert!(!can_transition(Rejected, Quoted));
    }

    #[test]
    fn test_quoted_renegotiation() {
        assert!(can_transition(Quoted, Calling));
    }

    #[test]
    fn test_validate_error_message() {
        let err = validate_transition(Closed, Calling).unwrap_err();
        assert!(err.to_string().contains("closed -> calling"));
    }

    #[test]
    fn test_report_counts_and_rate() {
        let leads = vec![
            lead(New, LeadSource::Website),
            lead(Calling, LeadSource::Website),
            lead(Closed, LeadSource::Referral),
            lead(Closed, LeadSource::Instagram),
        ];
        let report = funnel_report(&leads);
        assert_eq!(report.total, 4);
        assert!((report.conversion_rate - 0.5).abs() < 1e-9);

        let closed = report
            .by_status
            .iter()
            .find(|c| c.status == Closed)
            .unwrap();
        assert_eq!(closed.count, 2);

        // Zero-count statuses still listed.
        assert!(report.by_status.iter().any(|c| c.status == Quoted && c.count == 0));
        // Zero-count sources omitted.
        assert!(!report.by_source.iter().any(|c| c.source == LeadSource::WalkIn));
    }

    #[test]
    fn test_report_empty_funnel() {
        let report = funnel_report(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.conversion_rate, 0.0);
        assert_eq!(report.by_status.len(), 5);
        assert!(report.by_source.is_empty());
    }
}
