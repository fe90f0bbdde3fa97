//! Error types for the motion core.
//!
//! Missing bones and missing expression channels are not errors: the rig reports them
//! through `bool`/`Option` returns and the layers skip them.

/// Errors surfaced to hosts of the motion engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MotionError {
    /// The rig asset could not be loaded; the previously installed rig is untouched.
    #[error("rig load failed for '{asset}': {reason}")]
    RigLoad { asset: String, reason: String },

    /// No asset references were supplied to a fallback load.
    #[error("no rig asset candidates supplied")]
    NoRigCandidates,

    /// A bone name outside the humanoid vocabulary.
    #[error("unknown bone name: {0}")]
    UnknownBone(String),

    /// An emotion name the control surface does not know.
    #[error("unknown emotion: {0}")]
    UnknownEmotion(String),

    /// Configuration or gesture-table JSON failed to parse.
    #[error("config parse error: {0}")]
    Config(String),
}

impl MotionError {
    pub fn rig_load(asset: impl Into<String>, reason: impl ToString) -> Self {
        MotionError::RigLoad {
            asset: asset.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        MotionError::Config(err.to_string())
    }
}

pub type MotionResult<T> = Result<T, MotionError>;
