pub mod client;
pub mod models;

pub use client::{UgcBackend, UgcClient};
pub use models::{CommunityPost, EntityType, Peptide, RejectionCode, SubmissionPayload};
