use serde::{Deserialize, Serialize};

use crate::wizard::{FieldKind, FieldSchema, FieldValue, FormState, StepDefinition, Validator};

pub const FLOW_NAME: &str = "talent-profile";
pub const SUBMIT_PATH: &str = "/api/talents/profile";

pub const AVAILABILITIES: &[&str] = &["full-time", "part-time", "flexible"];

/// Three-step talent onboarding form: identity, skills, rate/availability.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TalentProfileForm {
    pub display_name: String,
    pub headline: String,
    pub location: String,
    pub skills: Vec<String>,
    pub years_experience: String,
    pub hourly_rate: String,
    pub availability: String,
}

impl FormState for TalentProfileForm {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "display_name" => FieldValue::Text(self.display_name.clone()),
            "headline" => FieldValue::Text(self.headline.clone()),
            "location" => FieldValue::Text(self.location.clone()),
            "skills" => FieldValue::List(self.skills.clone()),
            "years_experience" => FieldValue::Text(self.years_experience.clone()),
            "hourly_rate" => FieldValue::Text(self.hourly_rate.clone()),
            "availability" => FieldValue::Text(self.availability.clone()),
            _ => FieldValue::Missing,
        }
    }
}

fn known_availability(v: &FieldValue) -> bool {
    AVAILABILITIES.contains(&v.as_text().trim())
}

fn positive_number(v: &FieldValue) -> bool {
    v.as_number() > 0.0
}

pub const SCHEMA: &[FieldSchema] = &[
    FieldSchema {
        key: "display_name",
        kind: FieldKind::Text,
        required: true,
        validators: &[],
    },
    FieldSchema {
        key: "headline",
        kind: FieldKind::Text,
        required: true,
        validators: &[],
    },
    FieldSchema {
        key: "location",
        kind: FieldKind::Text,
        required: false,
        validators: &[],
    },
    FieldSchema {
        key: "skills",
        kind: FieldKind::List,
        required: true,
        validators: &[],
    },
    FieldSchema {
        key: "years_experience",
        kind: FieldKind::Number,
        required: false,
        validators: &[],
    },
    FieldSchema {
        key: "hourly_rate",
        kind: FieldKind::Number,
        required: true,
        validators: &[Validator {
            check: positive_number,
            message: "enter an hourly rate above zero",
        }],
    },
    FieldSchema {
        key: "availability",
        kind: FieldKind::Enum,
        required: true,
        validators: &[Validator {
            check: known_availability,
            message: "choose one of: full-time, part-time, flexible",
        }],
    },
];

pub const STEPS: &[StepDefinition] = &[
    StepDefinition {
        id: 0,
        title: "Identity",
        required_fields: &["display_name", "headline"],
    },
    StepDefinition {
        id: 1,
        title: "Skills",
        required_fields: &["skills"],
    },
    StepDefinition {
        id: 2,
        title: "Rate & Availability",
        required_fields: &["hourly_rate", "availability"],
    },
];

/// Wire shape of POST /api/talents/profile. `display_name` travels as `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TalentProfileWire {
    pub name: String,
    pub headline: String,
    pub location: String,
    pub skills: Vec<String>,
    pub years_experience: f64,
    pub hourly_rate: f64,
    pub availability: String,
}

impl TalentProfileForm {
    pub fn to_wire(&self) -> TalentProfileWire {
        TalentProfileWire {
            name: self.display_name.trim().to_string(),
            headline: self.headline.trim().to_string(),
            location: self.location.trim().to_string(),
            skills: self.skills.clone(),
            years_experience: self
                .years_experience
                .trim()
                .parse::<f64>()
                .unwrap_or(0.0),
            hourly_rate: self.hourly_rate.trim().parse::<f64>().unwrap_or(0.0),
            availability: self.availability.trim().to_string(),
        }
    }

    /// Filled required fields over total required fields, as a percentage.
    /// Rounding is left to the caller at display time.
    pub fn progress_percent(&self) -> f64 {
        let required: Vec<&FieldSchema> = SCHEMA.iter().filter(|f| f.required).collect();
        if required.is_empty() {
            return 100.0;
        }
        let filled = required
            .iter()
            .filter(|f| !self.field(f.key).is_empty())
            .count();
        filled as f64 / required.len() as f64 * 100.0
    }
}
