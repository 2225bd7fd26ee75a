#![forbid(unsafe_code)]

pub mod asset;
pub mod guidance;
pub mod model;
pub mod session;
pub mod time;

pub use asset::resolve_asset_url;
pub use guidance::{
    AttemptPhase, FeedbackTone, GateFeedback, GateOutcome, GateState, GateTone, GuideCursor,
    QuestionAttempt, RegionState, StepAdvance, SubmitFeedback, SubmitOutcome,
};
pub use session::PracticeSession;
pub use time::Clock;
