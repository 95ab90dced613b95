//! Client for the peptide site's moderated stack suggestions and community
//! notes.

pub mod api;
pub mod app;
pub mod ui;
pub mod utils;

pub use api::{CommunityPost, EntityType, Peptide, UgcBackend, UgcClient};
pub use app::{
    make_outcomes_draft, CommunityNotes, Draft, StackSuggestionForm, SubmitState,
};
pub use ui::OutputHandler;
pub use utils::config::Config;
pub use utils::error::{ApiError, ConfigError, SubmitError, ValidationError};
