use crate::api::models::RejectionCode;
use thiserror::Error;

pub const DOSING_MESSAGE_SUBMISSION: &str =
    "Looks like your submission contains dosing/protocol language. Remove it to submit.";
pub const ACK_MESSAGE: &str = "You must acknowledge the no-dosing rule to submit.";
pub const GENERIC_SUBMIT_MESSAGE: &str = "Could not submit. Check required fields.";

/// Failures of the read endpoints (compound list, community posts).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Outcome of a rejected or failed submission.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("submission rejected: {}", .0.as_str())]
    Rejected(RejectionCode),

    #[error("submission transport failed: {0}")]
    Transport(String),
}

impl SubmitError {
    /// The message shown to the user. `noun` names what was submitted
    /// ("submission", "note").
    pub fn user_message(&self, noun: &str) -> String {
        match self {
            SubmitError::Rejected(RejectionCode::ContainsDosingOrProtocol) => format!(
                "Looks like your {} contains dosing/protocol language. Remove it to submit.",
                noun
            ),
            SubmitError::Rejected(RejectionCode::AckRequired) => ACK_MESSAGE.to_string(),
            SubmitError::Rejected(RejectionCode::Other(_)) | SubmitError::Transport(_) => {
                GENERIC_SUBMIT_MESSAGE.to_string()
            }
        }
    }
}

/// Local precondition failures. `Display` is the user-visible message.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Username is required.")]
    MissingUsername,

    #[error("Stack name is required.")]
    MissingStackName,

    #[error("Please select at least one peptide.")]
    EmptySelection,

    #[error("Description is required.")]
    MissingDescription,

    #[error("Note text is required.")]
    MissingNoteText,

    #[error("You must acknowledge the no-dosing rule to submit.")]
    MissingAcknowledgement,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("endpoint must be an absolute http(s) URL, got '{0}'")]
    InvalidEndpoint(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dosing_rejection_message() {
        let err = SubmitError::Rejected(RejectionCode::ContainsDosingOrProtocol);
        assert_eq!(err.user_message("submission"), DOSING_MESSAGE_SUBMISSION);
        assert_eq!(
            err.user_message("note"),
            "Looks like your note contains dosing/protocol language. Remove it to submit."
        );
    }

    #[test]
    fn test_ack_rejection_message() {
        let err = SubmitError::Rejected(RejectionCode::AckRequired);
        assert_eq!(err.user_message("submission"), ACK_MESSAGE);
    }

    #[test]
    fn test_unknown_failures_use_generic_message() {
        let unknown = SubmitError::Rejected(RejectionCode::Other("rate_limited".to_string()));
        let transport = SubmitError::Transport("connection refused".to_string());
        assert_eq!(unknown.user_message("submission"), GENERIC_SUBMIT_MESSAGE);
        assert_eq!(transport.user_message("submission"), GENERIC_SUBMIT_MESSAGE);
    }

    #[test]
    fn test_validation_messages_match_ack_message() {
        assert_eq!(
            ValidationError::MissingAcknowledgement.to_string(),
            ACK_MESSAGE
        );
        assert_eq!(ValidationError::MissingUsername.to_string(), "Username is required.");
    }
}
