mod html;
mod report_vm;
mod session_vm;
mod time_fmt;

pub use html::sanitize_html;
pub use report_vm::{CompletionRowVm, CompletionVm, map_completion};
pub use session_vm::{
    AnswerFieldVm, BannerVm, GateBodyVm, GateTicket, GateVm, GuidanceVm, IntentEffect,
    MCQ_ADVANCE_DELAY, ProblemVm, RegionVm, SELF_CHECK_ADVANCE_DELAY, SelfReportVm, SessionIntent,
    SessionSnapshot, SessionVm, SolutionVm, StepTipsVm, StepVm,
};
pub use time_fmt::{format_duration, format_elapsed};
