#![forbid(unsafe_code)]

//! Purchase requests shown on company tiles.

use std::fmt;
use std::time::{Duration, SystemTime};

/// Workflow stage of a purchase request, or the reason one is held up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestStatus {
    Draft,
    CostingInputted,
    ForGmSelection,
    GmSelectedSupplier,
    ForDeptHeadApproval,
    ForScmApproval,
    ApprovedForPo,
    PoCreated,
    DeliveryScheduled,
    ReceivedPartial,
    ReceivedFull,
    IssuedPartial,
    IssuedFull,
    Closed,
    // Blockers.
    InternationalSupplier,
    DeliveryTermsNegotiation,
    PaymentProcessing,
    LowUrgencyDeprioritized,
    AwaitingApprover,
    WorkflowChanged,
    InfoGap,
    /// Any status this build does not know, kept upper-cased.
    Other(String),
}

impl RequestStatus {
    /// Parse a backend status code. Case-insensitive; never fails.
    pub fn parse(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        match code.as_str() {
            "DRAFT" => Self::Draft,
            "COSTING_INPUTTED" => Self::CostingInputted,
            "FOR_GM_SELECTION" => Self::ForGmSelection,
            "GM_SELECTED_SUPPLIER" => Self::GmSelectedSupplier,
            "FOR_DEPT_HEAD_APPROVAL" => Self::ForDeptHeadApproval,
            "FOR_SCM_APPROVAL" => Self::ForScmApproval,
            "APPROVED_FOR_PO" => Self::ApprovedForPo,
            "PO_CREATED" => Self::PoCreated,
            "DELIVERY_SCHEDULED" => Self::DeliveryScheduled,
            "RECEIVED_PARTIAL" => Self::ReceivedPartial,
            "RECEIVED_FULL" => Self::ReceivedFull,
            "ISSUED_PARTIAL" => Self::IssuedPartial,
            "ISSUED_FULL" => Self::IssuedFull,
            "CLOSED" => Self::Closed,
            "INTERNATIONAL_SUPPLIER" => Self::InternationalSupplier,
            "DELIVERY_TERMS_NEGOTIATION" => Self::DeliveryTermsNegotiation,
            "PAYMENT_PROCESSING" => Self::PaymentProcessing,
            "LOW_URGENCY_DEPRIORITIZED" => Self::LowUrgencyDeprioritized,
            "AWAITING_APPROVER" => Self::AwaitingApprover,
            "WORKFLOW_CHANGED" => Self::WorkflowChanged,
            "INFO_GAP" => Self::InfoGap,
            _ => Self::Other(code),
        }
    }

    /// Completion percentage implied by this stage.
    pub fn progress(&self) -> u8 {
        match self {
            Self::Draft => 5,
            Self::CostingInputted => 15,
            Self::ForGmSelection => 25,
            Self::GmSelectedSupplier => 35,
            Self::ForDeptHeadApproval => 45,
            Self::ForScmApproval => 60,
            Self::ApprovedForPo => 75,
            Self::PoCreated => 80,
            Self::DeliveryScheduled => 85,
            Self::ReceivedPartial => 90,
            Self::ReceivedFull => 95,
            Self::IssuedPartial => 98,
            Self::IssuedFull => 99,
            Self::Closed => 100,
            Self::InternationalSupplier
            | Self::DeliveryTermsNegotiation
            | Self::PaymentProcessing
            | Self::LowUrgencyDeprioritized
            | Self::AwaitingApprover
            | Self::WorkflowChanged => 25,
            Self::InfoGap => 20,
            Self::Other(_) => 15,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::CostingInputted => "Costing prepared",
            Self::ForGmSelection => "For GM supplier selection",
            Self::GmSelectedSupplier => "Supplier selected",
            Self::ForDeptHeadApproval => "For Dept Head approval",
            Self::ForScmApproval => "For SCM approval",
            Self::ApprovedForPo => "Approved for PO",
            Self::PoCreated => "PO created",
            Self::DeliveryScheduled => "Delivery scheduled",
            Self::ReceivedPartial => "Received (partial)",
            Self::ReceivedFull => "Received (full)",
            Self::IssuedPartial => "Issued (partial)",
            Self::IssuedFull => "Issued (full)",
            Self::Closed => "Closed",
            Self::InternationalSupplier => "International supplier",
            Self::DeliveryTermsNegotiation => "Delivery terms negotiation",
            Self::PaymentProcessing => "Payment processing",
            Self::LowUrgencyDeprioritized => "Deprioritized (low urgency)",
            Self::AwaitingApprover => "Awaiting approver",
            Self::WorkflowChanged => "Workflow changed",
            Self::InfoGap => "Info/coordination gap",
            Self::Other(_) => "In progress",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The oldest open purchase request of a company.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRequest {
    pub pr_no: String,
    pub status: RequestStatus,
    pub due_at: Option<SystemTime>,
    /// Why the request is stuck; shown instead of the deadline.
    pub blocked: Option<RequestStatus>,
    /// Who has to act next.
    pub next_actor: Option<String>,
    pub updated_at: SystemTime,
}

impl ActiveRequest {
    pub fn new(pr_no: &str, status: RequestStatus, updated_at: SystemTime) -> Self {
        Self {
            pr_no: pr_no.to_string(),
            status,
            due_at: None,
            blocked: None,
            next_actor: None,
            updated_at,
        }
    }

    #[must_use]
    pub fn with_due_at(mut self, due_at: SystemTime) -> Self {
        self.due_at = Some(due_at);
        self
    }

    #[must_use]
    pub fn blocked_by(mut self, reason: RequestStatus) -> Self {
        self.blocked = Some(reason);
        self
    }

    #[must_use]
    pub fn with_next_actor(mut self, actor: &str) -> Self {
        self.next_actor = Some(actor.to_string());
        self
    }

    /// Time since the last update as `"Nh"` below a day, `"Nd"` above.
    /// Updates stamped in the future count as just now.
    pub fn age(&self, now: SystemTime) -> String {
        let hours = now
            .duration_since(self.updated_at)
            .unwrap_or(Duration::ZERO)
            .as_secs()
            / 3600;
        if hours < 24 {
            format!("{hours}h")
        } else {
            format!("{}d", hours / 24)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_map_to_progress_and_label() {
        let cases = [
            ("DRAFT", 5, "Draft"),
            ("COSTING_INPUTTED", 15, "Costing prepared"),
            ("FOR_GM_SELECTION", 25, "For GM supplier selection"),
            ("GM_SELECTED_SUPPLIER", 35, "Supplier selected"),
            ("FOR_DEPT_HEAD_APPROVAL", 45, "For Dept Head approval"),
            ("FOR_SCM_APPROVAL", 60, "For SCM approval"),
            ("APPROVED_FOR_PO", 75, "Approved for PO"),
            ("PO_CREATED", 80, "PO created"),
            ("DELIVERY_SCHEDULED", 85, "Delivery scheduled"),
            ("RECEIVED_PARTIAL", 90, "Received (partial)"),
            ("RECEIVED_FULL", 95, "Received (full)"),
            ("ISSUED_PARTIAL", 98, "Issued (partial)"),
            ("ISSUED_FULL", 99, "Issued (full)"),
            ("CLOSED", 100, "Closed"),
        ];
        for (code, progress, label) in cases {
            let status = RequestStatus::parse(code);
            assert_eq!(status.progress(), progress, "{code}");
            assert_eq!(status.label(), label, "{code}");
        }
    }

    #[test]
    fn blockers_hold_progress_low() {
        let cases = [
            ("INTERNATIONAL_SUPPLIER", 25, "International supplier"),
            ("DELIVERY_TERMS_NEGOTIATION", 25, "Delivery terms negotiation"),
            ("PAYMENT_PROCESSING", 25, "Payment processing"),
            ("LOW_URGENCY_DEPRIORITIZED", 25, "Deprioritized (low urgency)"),
            ("AWAITING_APPROVER", 25, "Awaiting approver"),
            ("WORKFLOW_CHANGED", 25, "Workflow changed"),
            ("INFO_GAP", 20, "Info/coordination gap"),
        ];
        for (code, progress, label) in cases {
            let status = RequestStatus::parse(code);
            assert_eq!(status.progress(), progress, "{code}");
            assert_eq!(status.to_string(), label, "{code}");
        }
    }

    #[test]
    fn parse_ignores_case_and_keeps_unknown_codes() {
        assert_eq!(RequestStatus::parse("approved_for_po"), RequestStatus::ApprovedForPo);
        assert_eq!(RequestStatus::parse(" Closed "), RequestStatus::Closed);

        let unknown = RequestStatus::parse("on_hold");
        assert_eq!(unknown, RequestStatus::Other("ON_HOLD".into()));
        assert_eq!(unknown.progress(), 15);
        assert_eq!(unknown.label(), "In progress");
        assert_eq!(RequestStatus::parse("").label(), "In progress");
    }

    #[test]
    fn age_switches_to_days() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let at = |hours: u64| {
            ActiveRequest::new("PR-1", RequestStatus::Draft, now - Duration::from_secs(hours * 3600))
        };
        assert_eq!(at(0).age(now), "0h");
        assert_eq!(at(23).age(now), "23h");
        assert_eq!(at(24).age(now), "1d");
        assert_eq!(at(50).age(now), "2d");

        let future = ActiveRequest::new("PR-2", RequestStatus::Draft, now + Duration::from_secs(60));
        assert_eq!(future.age(now), "0h");
    }
}
