use chrono::{DateTime, NaiveTime, Utc};
use rotapost_core::types::{ContentType, TriggerAction};
use serde::Serialize;

/// Definition of one recurring trigger: what to do, and at which audience
/// wall-clock time to do it every day.
#[derive(Debug, Clone)]
pub struct TriggerSpec {
    /// Stable id derived from the action, so re-registration is idempotent.
    pub id: String,
    pub name: String,
    pub action: TriggerAction,
    /// Daily fire time, wall clock in the target timezone.
    pub at: NaiveTime,
}

impl TriggerSpec {
    pub fn publish(content_type: ContentType, hour: u32, minute: u32) -> Self {
        Self {
            id: format!("post:{content_type}"),
            name: content_type.label().to_string(),
            action: TriggerAction::Publish { content_type },
            at: NaiveTime::from_hms_opt(hour, minute, 0).expect("valid schedule time"),
        }
    }

    pub fn advance_day(hour: u32, minute: u32) -> Self {
        Self {
            id: "clock:advance".to_string(),
            name: "Advance rotation day".to_string(),
            action: TriggerAction::AdvanceDay,
            at: NaiveTime::from_hms_opt(hour, minute, 0).expect("valid schedule time"),
        }
    }
}

/// The static posting schedule (audience-timezone wall clock).
///
/// The day rolls over shortly after local midnight so every post of a
/// calendar day uses the new day index.
pub fn default_schedule() -> Vec<TriggerSpec> {
    vec![
        TriggerSpec::advance_day(0, 5),
        TriggerSpec::publish(ContentType::DailyRule, 8, 30),
        TriggerSpec::publish(ContentType::TechTraining, 10, 0),
        TriggerSpec::publish(ContentType::SafetyNumber, 12, 30),
        TriggerSpec::publish(ContentType::IncidentAnalysis, 14, 0),
        TriggerSpec::publish(ContentType::Psychology, 16, 0),
        TriggerSpec::publish(ContentType::AssistantDuties, 17, 30),
    ]
}

/// Listing entry for the management API.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerInfo {
    pub id: String,
    pub name: String,
    pub next_fire: DateTime<Utc>,
}
