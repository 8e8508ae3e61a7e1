mod achievements;
mod engine;
mod progress;

pub use achievements::Achievement;
pub use engine::{SessionEngine, SessionOutcome};
pub use progress::SessionProgress;
