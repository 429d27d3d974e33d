use serde::Serialize;

/// Declared type of a form field. Validation and defaulting key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Enum,
    Bool,
    List,
}

/// A typed snapshot of one field's current value.
///
/// `Missing` stands in for fields the form has no value for yet; derivation
/// and validation must tolerate it without panicking.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Bool(bool),
    List(Vec<String>),
    Missing,
}

impl FieldValue {
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Numeric view of the field. Unparsable or absent input is 0, never NaN.
    pub fn as_number(&self) -> f64 {
        match self {
            FieldValue::Number(n) if n.is_finite() => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Number(n) => !n.is_finite(),
            FieldValue::Bool(_) => false,
            FieldValue::List(items) => items.is_empty(),
            FieldValue::Missing => true,
        }
    }
}

/// One predicate in a field's validator chain. The first failing validator
/// for a field supplies that field's error message.
pub struct Validator {
    pub check: fn(&FieldValue) -> bool,
    pub message: &'static str,
}

/// Declarative rules for a single field. Schemas are static per wizard.
pub struct FieldSchema {
    pub key: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub validators: &'static [Validator],
}

/// One ordered step of a wizard and the field subset it gates on.
pub struct StepDefinition {
    pub id: usize,
    pub title: &'static str,
    pub required_fields: &'static [&'static str],
}

/// Read access to a wizard's current values, addressed by schema key.
///
/// Each flow implements this over a plain struct so unknown keys are confined
/// to a single match arm instead of a stringly-typed map.
pub trait FormState {
    fn field(&self, key: &str) -> FieldValue;
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("step {step} references undeclared field: {field}")]
    UndeclaredField { step: usize, field: String },
    #[error("step {0} is out of range (1..={1})")]
    StepOutOfRange(usize, usize),
    #[error("step {step} rejected: {summary}")]
    StepRejected { step: usize, summary: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of validating one step. Failures are values, not errors; they
/// surface per-field and never abort the rest of the wizard.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepCheck {
    Ok,
    Fail { errors: Vec<FieldError> },
}

impl StepCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, StepCheck::Ok)
    }

    pub fn summary(&self) -> String {
        match self {
            StepCheck::Ok => "ok".to_string(),
            StepCheck::Fail { errors } => errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Validate only the fields the given step gates on, in schema order.
///
/// Every gated field is checked (collect, don't short-circuit the step), but
/// within one field the first failing validator wins. A step with no required
/// fields always passes.
pub fn validate_step(
    step: &StepDefinition,
    form: &dyn FormState,
    schema: &[FieldSchema],
) -> StepCheck {
    let mut errors = Vec::new();
    for field in schema {
        if !step.required_fields.contains(&field.key) {
            continue;
        }
        let value = form.field(field.key);
        if field.required && value.is_empty() {
            errors.push(FieldError {
                field: field.key.to_string(),
                message: "this field is required".to_string(),
            });
            continue;
        }
        for v in field.validators {
            if !(v.check)(&value) {
                errors.push(FieldError {
                    field: field.key.to_string(),
                    message: v.message.to_string(),
                });
                break;
            }
        }
    }
    if errors.is_empty() {
        StepCheck::Ok
    } else {
        StepCheck::Fail { errors }
    }
}

/// First step (in order) whose validation fails, if any. Used to gate
/// submission on the whole wizard.
pub fn first_invalid_step(
    steps: &[StepDefinition],
    form: &dyn FormState,
    schema: &[FieldSchema],
) -> Option<(usize, StepCheck)> {
    for step in steps {
        let check = validate_step(step, form, schema);
        if !check.is_ok() {
            return Some((step.id, check));
        }
    }
    None
}

/// Confirms every step's required fields are declared in the schema.
/// Each flow pins this with a unit test.
pub fn steps_cover_schema(
    steps: &[StepDefinition],
    schema: &[FieldSchema],
) -> Result<(), WizardError> {
    for step in steps {
        for key in step.required_fields {
            if !schema.iter().any(|f| f.key == *key) {
                return Err(WizardError::UndeclaredField {
                    step: step.id,
                    field: key.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Position within a wizard's step table, clamped at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepCursor {
    index: usize,
    step_count: usize,
}

impl StepCursor {
    pub fn new(step_count: usize) -> Self {
        Self {
            index: 0,
            step_count: step_count.max(1),
        }
    }

    /// Restore a cursor at a previously saved position, clamped into range.
    pub fn resume(index: usize, step_count: usize) -> Self {
        let step_count = step_count.max(1);
        Self {
            index: index.min(step_count - 1),
            step_count,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn at_end(&self) -> bool {
        self.index + 1 == self.step_count
    }

    /// Move forward only when the step's validation passed. Clamps at the
    /// last step; never wraps.
    pub fn advance(self, check: &StepCheck) -> Self {
        if !check.is_ok() {
            return self;
        }
        Self {
            index: (self.index + 1).min(self.step_count - 1),
            ..self
        }
    }

    /// Going back is always permitted and never validated.
    pub fn retreat(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
            ..self
        }
    }
}
