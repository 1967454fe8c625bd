pub mod pacing;

pub use pacing::{
    raw_feedback_delay, FeedbackSettings, PacingBounds, PacingController, PacingDecision,
    PacingState,
};
