use thiserror::Error;

/// Pipeline stages, in execution order. `Aborted` is terminal and reachable
/// from every non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    InputsPrepared,
    Rendered,
    Converted,
    Done,
    Aborted,
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: Stage, to: Stage },
    #[error("cannot transition from terminal stage {stage:?}")]
    FromTerminalStage { stage: Stage },
}

pub struct StageTransition;

impl StageTransition {
    pub fn validate(from: Stage, to: Stage) -> Result<(), TransitionError> {
        if Self::is_terminal(from) {
            return Err(TransitionError::FromTerminalStage { stage: from });
        }

        let is_valid = matches!(
            (from, to),
            (Stage::Idle, Stage::InputsPrepared)
                | (Stage::InputsPrepared, Stage::Rendered)
                | (Stage::Rendered, Stage::Converted)
                | (Stage::Converted, Stage::Done)
                | (_, Stage::Aborted)
        );

        if is_valid {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }

    pub fn next(current: Stage) -> Option<Stage> {
        match current {
            Stage::Idle => Some(Stage::InputsPrepared),
            Stage::InputsPrepared => Some(Stage::Rendered),
            Stage::Rendered => Some(Stage::Converted),
            Stage::Converted => Some(Stage::Done),
            Stage::Done | Stage::Aborted => None,
        }
    }

    pub fn is_terminal(stage: Stage) -> bool {
        matches!(stage, Stage::Done | Stage::Aborted)
    }
}
