//! Form state and the pure helpers behind it.

pub mod draft;
pub mod fetch;
pub mod form;
pub mod notes;
pub mod outcomes;
pub mod search;
pub mod selection;
pub mod status;

pub use draft::Draft;
pub use form::StackSuggestionForm;
pub use notes::{CommunityNotes, NoteDraft};
pub use outcomes::make_outcomes_draft;
pub use selection::Selection;
pub use status::{SubmitState, SubmitStatus};
