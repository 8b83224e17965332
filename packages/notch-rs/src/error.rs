use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotchError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unstable design: pole radius {radius} is not inside the unit circle")]
    UnstableDesign { radius: f64 },

    #[error("Length mismatch: original has {original} samples, filtered has {filtered}")]
    LengthMismatch { original: usize, filtered: usize },

    #[error("Insufficient samples: got {got}, need at least {required}")]
    InsufficientSamples { got: usize, required: usize },

    #[error("Equiripple design failed to converge after {iterations} iterations, try widening the transition bands")]
    NonConvergence { iterations: usize },

    #[error("Equiripple design found {found} extremal frequencies, need {required}")]
    InsufficientExtremals { found: usize, required: usize },

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Failed to parse samples: {0}")]
    ParseError(String),

    #[error("Failed to read configuration: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl NotchError {
    /// True for errors caused by caller-supplied parameters rather than by the computation.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            NotchError::InvalidConfig(_)
                | NotchError::UnstableDesign { .. }
                | NotchError::LengthMismatch { .. }
                | NotchError::InsufficientSamples { .. }
                | NotchError::ParseError(_)
                | NotchError::ConfigError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NotchError>;
