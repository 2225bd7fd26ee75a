use tutor_core::model::SessionReport;

use crate::vm::format_duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionVm {
    pub total_time_label: String,
    pub rows: Vec<CompletionRowVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRowVm {
    pub question: String,
    pub first_try_label: String,
    pub time_label: String,
    pub steps_fixed: usize,
}

/// Summarize a finished session for the completion screen.
#[must_use]
pub fn map_completion(report: &SessionReport) -> CompletionVm {
    CompletionVm {
        total_time_label: format_duration(report.total_time_seconds),
        rows: report
            .questions
            .iter()
            .map(|result| {
                let correct = result
                    .final_answers_status
                    .iter()
                    .filter(|status| status.is_correct)
                    .count();
                CompletionRowVm {
                    question: result.question_id.to_string(),
                    first_try_label: format!(
                        "{correct} / {} first try",
                        result.final_answers_status.len()
                    ),
                    time_label: format_duration(result.time_taken_seconds),
                    steps_fixed: result
                        .step_interactions
                        .iter()
                        .filter(|step| step.was_fixed)
                        .count(),
                }
            })
            .collect(),
    }
}
