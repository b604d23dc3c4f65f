//! Draft state for the "add car" form and its client-side constraints.

use std::{fmt, sync::OnceLock};

use regex::Regex;
use shared::domain::CarDraft;
use thiserror::Error;

pub const DEFAULT_YEAR: i32 = 2021;
pub const MIN_YEAR: i32 = 1885;
pub const MAX_YEAR: i32 = 2021;
pub const MAKE_MAX_CHARS: usize = 5;
pub const PLATE_PATTERN: &str = "^[A-Z0-9]{1,6}$";
pub const DEFAULT_PLATE_MESSAGE: &str = "A valid license plate is required.";

fn plate_regex() -> &'static Regex {
    static PLATE: OnceLock<Regex> = OnceLock::new();
    PLATE.get_or_init(|| Regex::new(PLATE_PATTERN).expect("plate pattern is valid"))
}

pub fn is_valid_plate(plate: &str) -> bool {
    plate_regex().is_match(plate)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Make,
    Model,
    Year,
    Plate,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Make => "make",
            Self::Model => "model",
            Self::Year => "year",
            Self::Plate => "plate",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(FormField),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: FormField, max: usize },
    #[error("year must be between {min} and {max}")]
    YearOutOfRange { min: i32, max: i32 },
    #[error("plate must be 1-6 uppercase letters or digits")]
    PlatePattern,
}

impl ValidationError {
    pub fn field(&self) -> FormField {
        match self {
            Self::Missing(field) | Self::TooLong { field, .. } => *field,
            Self::YearOutOfRange { .. } => FormField::Year,
            Self::PlatePattern => FormField::Plate,
        }
    }
}

/// Presentation state of the plate input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlateStatus {
    #[default]
    Default,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarForm {
    pub make: String,
    pub model: String,
    /// `None` when the year input is empty or not a number.
    pub year: Option<i32>,
    pub plate: String,
    plate_message: String,
    plate_status: PlateStatus,
    was_validated: bool,
}

impl Default for CarForm {
    fn default() -> Self {
        Self {
            make: String::new(),
            model: String::new(),
            year: Some(DEFAULT_YEAR),
            plate: String::new(),
            plate_message: DEFAULT_PLATE_MESSAGE.to_string(),
            plate_status: PlateStatus::Default,
            was_validated: false,
        }
    }
}

impl CarForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the year from raw input text; unparseable text clears it.
    pub fn set_year_text(&mut self, text: &str) {
        self.year = text.trim().parse::<i32>().ok();
    }

    pub fn year_text(&self) -> String {
        self.year.map(|year| year.to_string()).unwrap_or_default()
    }

    pub fn plate_message(&self) -> &str {
        &self.plate_message
    }

    pub fn plate_status(&self) -> PlateStatus {
        self.plate_status
    }

    /// Whether inline errors should be displayed.
    pub fn was_validated(&self) -> bool {
        self.was_validated
    }

    pub fn validate(&self) -> Result<CarDraft, Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.make.is_empty() {
            errors.push(ValidationError::Missing(FormField::Make));
        } else if self.make.chars().count() > MAKE_MAX_CHARS {
            errors.push(ValidationError::TooLong {
                field: FormField::Make,
                max: MAKE_MAX_CHARS,
            });
        }
        if self.model.is_empty() {
            errors.push(ValidationError::Missing(FormField::Model));
        }
        match self.year {
            None => errors.push(ValidationError::Missing(FormField::Year)),
            Some(year) if !(MIN_YEAR..=MAX_YEAR).contains(&year) => {
                errors.push(ValidationError::YearOutOfRange {
                    min: MIN_YEAR,
                    max: MAX_YEAR,
                });
            }
            Some(_) => {}
        }
        if self.plate.is_empty() {
            errors.push(ValidationError::Missing(FormField::Plate));
        } else if !is_valid_plate(&self.plate) {
            errors.push(ValidationError::PlatePattern);
        }

        match (errors.is_empty(), self.year) {
            (true, Some(year)) => Ok(CarDraft {
                make: self.make.clone(),
                model: self.model.clone(),
                year,
                plate: self.plate.clone(),
            }),
            _ => Err(errors),
        }
    }

    /// First half of a submit: on failure the form switches to showing
    /// inline errors and no request must be sent.
    pub fn begin_submit(&mut self) -> Result<CarDraft, Vec<ValidationError>> {
        let result = self.validate();
        self.was_validated = result.is_err();
        result
    }

    /// The service accepted the draft.
    pub fn apply_created(&mut self) {
        *self = Self::default();
    }

    /// The service refused the draft. What the user typed stays.
    pub fn apply_rejected(&mut self, message: impl Into<String>) {
        self.plate_message = message.into();
        self.plate_status = PlateStatus::Invalid;
    }

    /// Inline feedback for `field`, shown once the form has been validated
    /// or the service rejected the plate.
    pub fn feedback(&self, field: FormField) -> Option<&str> {
        if field == FormField::Plate && self.plate_status == PlateStatus::Invalid {
            return Some(&self.plate_message);
        }
        if !self.was_validated {
            return None;
        }
        let failing = match self.validate() {
            Ok(_) => false,
            Err(errors) => errors.iter().any(|err| err.field() == field),
        };
        if !failing {
            return None;
        }
        Some(match field {
            FormField::Make => "A car make is required.",
            FormField::Model => "A car model is required.",
            FormField::Year => "A model year is required.",
            FormField::Plate => &self.plate_message,
        })
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
