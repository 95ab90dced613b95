//! The in-progress stack suggestion and the text it turns into.

use crate::api::models::{EntityType, SubmissionPayload};
use crate::app::outcomes::make_outcomes_draft;
use crate::app::selection::Selection;
use crate::utils::error::ValidationError;

pub const SUBMISSION_HEADER: &str = "STACK SUGGESTION";
pub const OUTCOMES_LABEL: &str = "Expected outcomes (user-intent draft):";
const NONE: &str = "(none)";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub username: String,
    pub stack_name: String,
    pub query: String,
    pub selection: Selection,
    pub description: String,
    pub include_outcomes: bool,
    pub acknowledged_no_dosing: bool,
}

impl Draft {
    /// Checks the required fields in a fixed order and reports the first one
    /// missing.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        if self.stack_name.trim().is_empty() {
            return Err(ValidationError::MissingStackName);
        }
        if self.selection.is_empty() {
            return Err(ValidationError::EmptySelection);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingDescription);
        }
        if !self.acknowledged_no_dosing {
            return Err(ValidationError::MissingAcknowledgement);
        }
        Ok(())
    }

    pub fn outcomes_draft(&self) -> String {
        make_outcomes_draft(&self.description, &self.stack_name, self.selection.as_slice())
    }

    pub fn submission_text(&self) -> String {
        let name = self.stack_name.trim();
        let description = self.description.trim();
        let peptides = if self.selection.is_empty() {
            NONE.to_string()
        } else {
            self.selection
                .iter()
                .map(|p| p.label())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut lines: Vec<String> = vec![
            SUBMISSION_HEADER.to_string(),
            String::new(),
            format!("Stack name: {}", if name.is_empty() { NONE } else { name }),
            format!("Peptides: {}", peptides),
            String::new(),
            "Description:".to_string(),
            (if description.is_empty() { NONE } else { description }).to_string(),
        ];

        if self.include_outcomes {
            lines.push(String::new());
            lines.push(OUTCOMES_LABEL.to_string());
            lines.push(self.outcomes_draft());
        }

        lines.join("\n")
    }

    pub fn to_payload(&self, ugc_slug: &str) -> SubmissionPayload {
        SubmissionPayload {
            entity_type: EntityType::Stack,
            slug: ugc_slug.to_string(),
            username: self.username.trim().to_string(),
            text: self.submission_text(),
            ack_no_dosing: self.acknowledged_no_dosing,
        }
    }
}
