#![forbid(unsafe_code)]

pub mod content;
pub mod custom_store;
pub mod error;
pub mod selector;
pub mod sessions;

pub use drill_core::Clock;

pub use content::{ContentSource, StaticContent};
pub use custom_store::CustomQuestionStore;
pub use error::{CustomQuestionError, SessionError};
pub use selector::QuestionSelector;

pub use sessions::{Achievement, SessionEngine, SessionOutcome, SessionProgress};
