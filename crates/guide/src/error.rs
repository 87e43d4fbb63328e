use shared::StepNumber;
use thiserror::Error;

/// Rejected session actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuideError {
    #[error("step {step} is outside the guide (1..={total})")]
    StepOutOfRange { step: StepNumber, total: StepNumber },
}
