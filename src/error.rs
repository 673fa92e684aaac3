//! Error types returned by cross-validation and model selection.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Result alias used by the evaluator and the model selection utilities.
pub type Result<T> = std::result::Result<T, Error>;


/// The step of a fold's evaluation that failed.
#[derive(Serialize, Deserialize)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// The model factory failed to produce a model.
    Construct,
    /// Fitting on the training folds failed.
    Fit,
    /// Predicting the held-out fold failed.
    Predict,
    /// The scoring function rejected the predictions.
    Score,
    /// The fold ran past its time limit.
    Timeout,
}


impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Stage::Construct => "construct",
            Stage::Fit => "fit",
            Stage::Predict => "predict",
            Stage::Score => "score",
            Stage::Timeout => "timeout",
        };

        f.write_str(name)
    }
}


#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed call parameters. Nothing was evaluated.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A fold failed; the whole evaluation was abandoned.
    #[error("fold {fold} failed during {stage}: {cause}")]
    ModelFit {
        fold: usize,
        stage: Stage,
        cause: String,
    },
}


impl Error {
    pub(crate) fn invalid<S: Into<String>>(msg: S) -> Error {
        Error::InvalidParameter(msg.into())
    }

    pub(crate) fn model_fit<S: Into<String>>(fold: usize, stage: Stage, cause: S) -> Error {
        Error::ModelFit {
            fold,
            stage,
            cause: cause.into(),
        }
    }

    /// The fold that failed, if this is a fold failure.
    pub fn fold(&self) -> Option<usize> {
        match *self {
            Error::ModelFit { fold, .. } => Some(fold),
            Error::InvalidParameter(_) => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Error::model_fit(3, Stage::Fit, "Singular matrix");
        assert_eq!(err.to_string(), "fold 3 failed during fit: Singular matrix");
        assert_eq!(err.fold(), Some(3));

        let err = Error::invalid("k must be at least 2");
        assert_eq!(err.to_string(), "invalid parameter: k must be at least 2");
        assert_eq!(err.fold(), None);
    }
}
