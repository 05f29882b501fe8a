use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A category of message with its own per-day content table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    DailyRule,
    SafetyNumber,
    TechTraining,
    IncidentAnalysis,
    Psychology,
    AssistantDuties,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::DailyRule,
        ContentType::SafetyNumber,
        ContentType::TechTraining,
        ContentType::IncidentAnalysis,
        ContentType::Psychology,
        ContentType::AssistantDuties,
    ];

    /// Human-readable trigger label used in scheduler listings.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::DailyRule => "Rule of the day",
            ContentType::SafetyNumber => "Safety figure",
            ContentType::TechTraining => "Technical training",
            ContentType::IncidentAnalysis => "Incident analysis",
            ContentType::Psychology => "Safety psychology",
            ContentType::AssistantDuties => "Assistant duties",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContentType::DailyRule => "daily_rule",
            ContentType::SafetyNumber => "safety_number",
            ContentType::TechTraining => "tech_training",
            ContentType::IncidentAnalysis => "incident_analysis",
            ContentType::Psychology => "psychology",
            ContentType::AssistantDuties => "assistant_duties",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "daily_rule" => Ok(ContentType::DailyRule),
            "safety_number" => Ok(ContentType::SafetyNumber),
            "tech_training" => Ok(ContentType::TechTraining),
            "incident_analysis" => Ok(ContentType::IncidentAnalysis),
            "psychology" => Ok(ContentType::Psychology),
            "assistant_duties" => Ok(ContentType::AssistantDuties),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// How a delivery was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Scheduled,
    Manual,
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerKind::Scheduled => write!(f, "scheduled"),
            TriggerKind::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for TriggerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(TriggerKind::Scheduled),
            "manual" => Ok(TriggerKind::Manual),
            other => Err(format!("unknown trigger kind: {other}")),
        }
    }
}

/// Result of one delivery attempt as stored in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "success" => Ok(Outcome::Success),
            "failure" => Ok(Outcome::Failure),
            other => Err(format!("unknown outcome: {other}")),
        }
    }
}

/// What a trigger does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerAction {
    /// Publish the body mapped to this content type for the current day.
    Publish { content_type: ContentType },
    /// Advance the rotation clock to the next day.
    AdvanceDay,
}

/// A fired trigger handed from the scheduler engine to the delivery router.
#[derive(Debug, Clone)]
pub struct FiredTrigger {
    pub trigger_id: String,
    pub action: TriggerAction,
    pub fired_at: DateTime<Utc>,
}
