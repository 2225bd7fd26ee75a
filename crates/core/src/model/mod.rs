mod answer;
mod ids;
mod question;
mod report;

pub use ids::{AnswerId, QuestionId, StepId};

pub use answer::{AnswerCheck, AnswerStatus, AnswerVerdict, parse_answer_input};
pub use question::{
    FinalAnswer, Gate, McqGate, Question, QuestionSet, QuestionSetError, Region, SelfCheckGate,
    Step,
};
pub use report::{QuestionResult, SessionReport, StepInteraction};
