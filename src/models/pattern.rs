use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternCategory {
    Sensory,
    ExecutiveFunction,
    EnergyRegulation,
    SocialCommunication,
    RoutineChange,
    DemandAvoidance,
    PhysicalSleep,
    SpecialInterests,
    PositiveCoping,
    /// A category this build has no icon or color for.
    Other(String),
}

impl PatternCategory {
    pub const KNOWN: [PatternCategory; 9] = [
        PatternCategory::Sensory,
        PatternCategory::ExecutiveFunction,
        PatternCategory::EnergyRegulation,
        PatternCategory::SocialCommunication,
        PatternCategory::RoutineChange,
        PatternCategory::DemandAvoidance,
        PatternCategory::PhysicalSleep,
        PatternCategory::SpecialInterests,
        PatternCategory::PositiveCoping,
    ];

    pub fn display_name(&self) -> &str {
        match self {
            PatternCategory::Sensory => "Sensory",
            PatternCategory::ExecutiveFunction => "Executive Function",
            PatternCategory::EnergyRegulation => "Energy & Regulation",
            PatternCategory::SocialCommunication => "Social & Communication",
            PatternCategory::RoutineChange => "Routine & Change",
            PatternCategory::DemandAvoidance => "Demand Avoidance",
            PatternCategory::PhysicalSleep => "Physical & Sleep",
            PatternCategory::SpecialInterests => "Special Interests",
            PatternCategory::PositiveCoping => "Positive & Coping",
            PatternCategory::Other(name) => name,
        }
    }

    pub fn from_display_name(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(name.trim()))
            .cloned()
            .unwrap_or_else(|| PatternCategory::Other(name.to_string()))
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// Stored by display name so snapshots exported by the analysis layer load as-is.
impl Serialize for PatternCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

impl<'de> Deserialize<'de> for PatternCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(PatternCategory::from_display_name(&name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: Uuid,
    pub pattern_type: String,
    pub category: PatternCategory,
    pub intensity: u8,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub triggers: Option<Vec<String>>,
    #[serde(default)]
    pub time_of_day: Option<String>,
}

impl Pattern {
    pub fn new(pattern_type: &str, category: PatternCategory, intensity: u8, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pattern_type: pattern_type.to_string(),
            category,
            intensity,
            timestamp,
            details: None,
            triggers: None,
            time_of_day: None,
        }
    }
}

/// "Pattern A tends to precede pattern B". Endpoints are identifiers and may
/// point at patterns outside the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cascade {
    pub id: Uuid,
    pub from_pattern: Option<Uuid>,
    pub to_pattern: Option<Uuid>,
    pub confidence: f32,
}

impl Cascade {
    pub fn new(from: Uuid, to: Uuid, confidence: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_pattern: Some(from),
            to_pattern: Some(to),
            confidence,
        }
    }

    pub fn endpoints(&self) -> Option<(Uuid, Uuid)> {
        Some((self.from_pattern?, self.to_pattern?))
    }

    pub fn clamped_confidence(&self) -> f64 {
        if self.confidence.is_nan() {
            return 0.0;
        }
        (self.confidence as f64).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub cascades: Vec<Cascade>,
}
