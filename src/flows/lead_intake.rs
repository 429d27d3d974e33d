use serde::{Deserialize, Serialize};

use crate::services::derive::{build_proposal, parse_budget, Proposal};
use crate::wizard::{FieldKind, FieldSchema, FieldValue, FormState, StepDefinition, Validator};

pub const FLOW_NAME: &str = "lead-intake";
pub const SUBMIT_PATH: &str = "/api/lead-intake";

pub const TEAM_SIZES: &[&str] = &["1-10", "11-50", "51-200", "200+"];

/// The four-step BPO lead form. Free-text numeric fields stay strings until
/// the wire mapping; derivation tolerates garbage by defaulting to 0.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadIntakeForm {
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub industry: String,
    pub team_size: String,
    pub current_challenges: String,
    pub monthly_budget: String,
    pub goals: Vec<String>,
    pub timeline: String,
}

impl FormState for LeadIntakeForm {
    fn field(&self, key: &str) -> FieldValue {
        match key {
            "contact_name" => FieldValue::Text(self.contact_name.clone()),
            "email" => FieldValue::Text(self.email.clone()),
            "phone" => FieldValue::Text(self.phone.clone()),
            "company_name" => FieldValue::Text(self.company_name.clone()),
            "industry" => FieldValue::Text(self.industry.clone()),
            "team_size" => FieldValue::Text(self.team_size.clone()),
            "current_challenges" => FieldValue::Text(self.current_challenges.clone()),
            "monthly_budget" => FieldValue::Text(self.monthly_budget.clone()),
            "goals" => FieldValue::List(self.goals.clone()),
            "timeline" => FieldValue::Text(self.timeline.clone()),
            _ => FieldValue::Missing,
        }
    }
}

fn looks_like_email(v: &FieldValue) -> bool {
    let s = v.as_text().trim();
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !s.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn min_twenty_chars(v: &FieldValue) -> bool {
    v.as_text().trim().chars().count() >= 20
}

fn known_team_size(v: &FieldValue) -> bool {
    TEAM_SIZES.contains(&v.as_text().trim())
}

pub const SCHEMA: &[FieldSchema] = &[
    FieldSchema {
        key: "contact_name",
        kind: FieldKind::Text,
        required: true,
        validators: &[],
    },
    FieldSchema {
        key: "email",
        kind: FieldKind::Text,
        required: true,
        validators: &[Validator {
            check: looks_like_email,
            message: "enter a valid email address",
        }],
    },
    FieldSchema {
        key: "phone",
        kind: FieldKind::Text,
        required: false,
        validators: &[],
    },
    FieldSchema {
        key: "company_name",
        kind: FieldKind::Text,
        required: true,
        validators: &[],
    },
    FieldSchema {
        key: "industry",
        kind: FieldKind::Text,
        required: true,
        validators: &[],
    },
    FieldSchema {
        key: "team_size",
        kind: FieldKind::Enum,
        required: true,
        validators: &[Validator {
            check: known_team_size,
            message: "choose one of: 1-10, 11-50, 51-200, 200+",
        }],
    },
    FieldSchema {
        key: "current_challenges",
        kind: FieldKind::Text,
        required: true,
        validators: &[Validator {
            check: min_twenty_chars,
            message: "minimum 20 characters",
        }],
    },
    FieldSchema {
        key: "monthly_budget",
        kind: FieldKind::Number,
        required: false,
        validators: &[],
    },
    FieldSchema {
        key: "goals",
        kind: FieldKind::List,
        required: true,
        validators: &[],
    },
    FieldSchema {
        key: "timeline",
        kind: FieldKind::Text,
        required: true,
        validators: &[],
    },
];

pub const STEPS: &[StepDefinition] = &[
    StepDefinition {
        id: 0,
        title: "Contact",
        required_fields: &["contact_name", "email"],
    },
    StepDefinition {
        id: 1,
        title: "Company",
        required_fields: &["company_name", "industry", "team_size"],
    },
    StepDefinition {
        id: 2,
        title: "Challenges",
        required_fields: &["current_challenges", "monthly_budget"],
    },
    StepDefinition {
        id: 3,
        title: "Goals",
        required_fields: &["goals", "timeline"],
    },
];

/// Wire shape of POST /api/lead-intake. The mapping is explicit and total:
/// every field has a named counterpart, and two are renamed outright
/// (`contact_name` -> `full_name`, `timeline` -> `start_timeline`), so a
/// generic case converter would produce the wrong payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadIntakeWire {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub industry: String,
    pub team_size: String,
    pub current_challenges: String,
    pub monthly_budget: f64,
    pub goals: Vec<String>,
    pub start_timeline: String,
}

impl LeadIntakeForm {
    pub fn to_wire(&self) -> LeadIntakeWire {
        LeadIntakeWire {
            full_name: self.contact_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            company_name: self.company_name.trim().to_string(),
            industry: self.industry.trim().to_string(),
            team_size: self.team_size.trim().to_string(),
            current_challenges: self.current_challenges.trim().to_string(),
            monthly_budget: parse_budget(&self.monthly_budget),
            goals: self.goals.clone(),
            start_timeline: self.timeline.trim().to_string(),
        }
    }

    /// Live proposal preview over the current answers.
    pub fn proposal(&self) -> Proposal {
        build_proposal(&self.current_challenges, parse_budget(&self.monthly_budget))
    }
}
