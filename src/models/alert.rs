use chrono::NaiveDateTime;
use serde::Serialize;

/// Alert categories. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AlertKind {
    WorkloadRemainingExceedsEstimate,
    WorkloadSpentExceedsEstimate,
    AtRiskPriority,
    AtRiskBlowout,
}

impl AlertKind {
    pub const ALL: [AlertKind; 4] = [
        AlertKind::WorkloadRemainingExceedsEstimate,
        AlertKind::WorkloadSpentExceedsEstimate,
        AlertKind::AtRiskPriority,
        AlertKind::AtRiskBlowout,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AlertKind::WorkloadRemainingExceedsEstimate => "rem-gt-sp",
            AlertKind::WorkloadSpentExceedsEstimate => "spent-gt-sp",
            AlertKind::AtRiskPriority => "risk-priority",
            AlertKind::AtRiskBlowout => "risk-blowout",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == s)
    }

    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::WorkloadRemainingExceedsEstimate => "Rem > SP",
            AlertKind::WorkloadSpentExceedsEstimate => "Spent > SP",
            AlertKind::AtRiskPriority => "High Priority",
            AlertKind::AtRiskBlowout => "Est. Exceeded",
        }
    }

    pub fn is_workload(&self) -> bool {
        matches!(
            self,
            AlertKind::WorkloadRemainingExceedsEstimate | AlertKind::WorkloadSpentExceedsEstimate
        )
    }
}

/// Stable identifier of the condition `(kind, ticket)`.
pub fn alert_id(kind: AlertKind, ticket_key: &str) -> String {
    format!("{}:{}", kind.code(), ticket_key)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertRecord {
    pub id: String,
    pub kind: AlertKind,
    pub ticket_key: String,
    pub computed_at: NaiveDateTime,
    pub assignee: String,
    pub details: String,
}

impl AlertRecord {
    pub fn new(
        kind: AlertKind,
        ticket_key: &str,
        computed_at: NaiveDateTime,
        assignee: &str,
        details: String,
    ) -> Self {
        Self {
            id: alert_id(kind, ticket_key),
            kind,
            ticket_key: ticket_key.to_string(),
            computed_at,
            assignee: assignee.to_string(),
            details,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DismissalEntry {
    pub alert_id: String,
    pub dismissed_at: String,
    pub dismissed_by: String,
    pub remarks: String,
}

/// One raw alert as written to the daily audit trail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub eval_date: String,
    pub evaluated_at: String,
    pub sprint_key: String,
    pub alert_id: String,
    pub kind: String,
    pub ticket_key: String,
    pub assignee: String,
    pub details: String,
}
