pub mod output;
pub mod session;

pub use output::OutputHandler;
pub use session::{Session, SessionCommand};
