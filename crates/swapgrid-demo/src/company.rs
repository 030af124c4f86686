#![forbid(unsafe_code)]

//! Company tiles and deadline urgency.

use std::time::{Duration, SystemTime};

use swapgrid_core::animation::Pulse;
use swapgrid_widgets::{Keyed, TileId};

use crate::i18n::Text;
use crate::request::{ActiveRequest, RequestStatus};

/// Accent color family of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Cyan,
    Blue,
    Amber,
    Magenta,
    Green,
    Orange,
}

/// One selectable company.
#[derive(Debug, Clone, PartialEq)]
pub struct Company {
    id: TileId,
    pub name: String,
    pub subtitle: String,
    pub accent: Accent,
    pub request: Option<ActiveRequest>,
}

impl Company {
    pub fn new(id: &str, name: &str, subtitle: &str, accent: Accent) -> Self {
        Self {
            id: TileId::from(id),
            name: name.to_string(),
            subtitle: subtitle.to_string(),
            accent,
            request: None,
        }
    }

    #[must_use]
    pub fn with_request(mut self, request: ActiveRequest) -> Self {
        self.request = Some(request);
        self
    }

    /// Completion of the active request, 0 without one.
    pub fn progress(&self) -> u8 {
        self.request.as_ref().map_or(0, |r| r.status.progress())
    }

    pub fn status_label(&self, text: &Text) -> &'static str {
        self.request.as_ref().map_or(text.no_active, |r| r.status.label())
    }

    /// Deadline urgency of the active request. Blocked requests report their
    /// blocker instead and have none.
    pub fn deadline(&self, now: SystemTime) -> Option<DeadlineFx> {
        let request = self.request.as_ref()?;
        if request.blocked.is_some() {
            return None;
        }
        DeadlineFx::compute(request.due_at, now)
    }
}

impl Keyed for Company {
    fn tile_id(&self) -> &TileId {
        &self.id
    }
}

const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn ago(now: SystemTime, d: Duration) -> SystemTime {
    now.checked_sub(d).unwrap_or(now)
}

/// The stock company list with one sample request each.
///
/// The deadlines cover every urgency: steady, due soon, overdue, and a
/// blocked request with no deadline at all.
pub fn default_companies(now: SystemTime) -> Vec<Company> {
    use RequestStatus as S;

    vec![
        Company::new("synercore", "Synercore", "Primary", Accent::Cyan).with_request(
            ActiveRequest::new("PR-2025-1024", S::ForGmSelection, ago(now, 6 * HOUR))
                .with_due_at(now + 2 * DAY)
                .with_next_actor("GM - Supplier Selection"),
        ),
        Company::new("sy3", "SY3 Energy", "Energy Services", Accent::Blue).with_request(
            ActiveRequest::new("PR-2025-1025", S::ApprovedForPo, ago(now, 3 * HOUR))
                .with_due_at(now + 5 * HOUR)
                .with_next_actor("Procurement - Create PO"),
        ),
        Company::new("kes", "KES Prime", "Engineering", Accent::Amber).with_request(
            ActiveRequest::new("PR-2025-1026", S::ForDeptHeadApproval, ago(now, 12 * HOUR))
                .with_due_at(ago(now, 4 * HOUR))
                .with_next_actor("Dept Head - Review & Approve"),
        ),
        Company::new("gen3", "Gen3 Toll Packing", "Packaging", Accent::Magenta).with_request(
            ActiveRequest::new("PR-2025-1027", S::DeliveryScheduled, ago(now, 2 * DAY))
                .blocked_by(S::DeliveryTermsNegotiation)
                .with_next_actor("Supplier - Confirm Terms"),
        ),
        Company::new("philweld", "Philweld", "Manufacturing", Accent::Green).with_request(
            ActiveRequest::new("PR-2025-1028", S::PoCreated, ago(now, HOUR))
                .with_due_at(now + 8 * HOUR)
                .with_next_actor("Supplier - Acknowledge Receipt"),
        ),
        Company::new("gemotra", "Gemotra", "Electrical Services", Accent::Orange).with_request(
            ActiveRequest::new("PR-2025-1029", S::CostingInputted, ago(now, 5 * HOUR))
                .with_due_at(now + 12 * HOUR)
                .with_next_actor("GM - Supplier Selection"),
        ),
    ]
}

// ---------------------------------------------------------------------------
// Deadline urgency
// ---------------------------------------------------------------------------

/// How pressing a deadline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// More than [`DeadlineFx::SOON`] away. Shown, never blinks.
    Ok,
    /// Due within [`DeadlineFx::SOON`].
    Due,
    Overdue,
}

/// Visual urgency of a due date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeadlineFx {
    pub urgency: Urgency,
    /// Blink period in seconds, rounded to hundredths; 0 means steady.
    pub blink_secs: f32,
    /// Whole hours until (or since) the deadline.
    pub hours: u64,
}

impl DeadlineFx {
    /// Window in which an upcoming deadline starts to blink.
    pub const SOON: Duration = Duration::from_secs(12 * 60 * 60);
    /// Overdue time after which the blink stops getting faster.
    pub const OVERDUE_CAP: Duration = Duration::from_secs(72 * 60 * 60);
    /// Fastest blink period.
    pub const MIN_BLINK_SECS: f32 = 0.28;

    /// Urgency of `due_at` as seen at `now`; `None` (hidden) without a due date.
    ///
    /// Upcoming deadlines blink from 1.6 s down to 1.0 s as they approach;
    /// overdue ones from 0.9 s down to 0.28 s over three days.
    pub fn compute(due_at: Option<SystemTime>, now: SystemTime) -> Option<Self> {
        let due_at = due_at?;
        match due_at.duration_since(now) {
            Ok(remaining) if remaining > Self::SOON => Some(Self {
                urgency: Urgency::Ok,
                blink_secs: 0.0,
                hours: whole_hours(remaining),
            }),
            Ok(remaining) => {
                let t = 1.0 - ratio(remaining, Self::SOON);
                Some(Self {
                    urgency: Urgency::Due,
                    blink_secs: round_hundredths(1.6 - t * 0.6),
                    hours: whole_hours(remaining),
                })
            }
            Err(late) => {
                let overdue = late.duration();
                let t = ratio(overdue.min(Self::OVERDUE_CAP), Self::OVERDUE_CAP);
                Some(Self {
                    urgency: Urgency::Overdue,
                    blink_secs: round_hundredths((0.9 - t * 0.62).max(Self::MIN_BLINK_SECS)),
                    hours: whole_hours(overdue),
                })
            }
        }
    }

    /// A pulse at the blink period, or `None` when steady.
    pub fn pulse(&self) -> Option<Pulse> {
        (self.blink_secs > 0.0).then(|| Pulse::from_secs(self.blink_secs))
    }

    pub fn label(&self, text: &Text) -> String {
        match self.urgency {
            Urgency::Ok | Urgency::Due => format!("{} {}h", text.due, self.hours),
            Urgency::Overdue => format!("{} {}h", text.overdue, self.hours),
        }
    }
}

fn ratio(part: Duration, whole: Duration) -> f32 {
    (part.as_secs_f64() / whole.as_secs_f64()).clamp(0.0, 1.0) as f32
}

fn round_hundredths(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn whole_hours(d: Duration) -> u64 {
    d.as_secs() / 3600
}
