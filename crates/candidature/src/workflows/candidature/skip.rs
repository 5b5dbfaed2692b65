use super::domain::CandidateDraft;
use super::steps::Step;

const EXPERIENCE_STEP: u8 = 2;

/// Decide whether `step` is bypassed given the answers collected before it.
///
/// Only the experience step is conditional: it is shown when the candidate ticked
/// `hasExperience` on the identity step and skipped otherwise, including when the answer is
/// still unset.
pub fn should_skip(step: Step, accumulated: &CandidateDraft) -> bool {
    match step.number() {
        EXPERIENCE_STEP => !accumulated.has_experience(),
        _ => false,
    }
}

/// Smallest step after `current` that is not skipped. The confirmation step is never skipped,
/// so the search always terminates there.
pub fn next_step(current: Step, accumulated: &CandidateDraft) -> Step {
    current
        .following()
        .find(|step| !should_skip(*step, accumulated))
        .unwrap_or(Step::CONFIRMATION)
}

/// Largest non-skipped step before `current`, if any.
pub fn previous_step(current: Step, accumulated: &CandidateDraft) -> Option<Step> {
    current
        .preceding()
        .find(|step| !should_skip(*step, accumulated))
}
