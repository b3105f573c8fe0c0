use crate::{Error, error::ErrorKind, recipe::RecipeSchema};
use serde::Serialize;

/// What a client is shown about a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for ErrorDescriptor {
    fn from(error: &Error) -> Self {
        Self {
            kind: error.kind(),
            message: error.user_message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum GenerationRequestState {
    Idle,
    Loading,
    Success(RecipeSchema),
    Failed(ErrorDescriptor),
}

impl GenerationRequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn recipe(&self) -> Option<&RecipeSchema> {
        match self {
            Self::Success(recipe) => Some(recipe),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorDescriptor> {
        match self {
            Self::Failed(descriptor) => Some(descriptor),
            _ => None,
        }
    }
}
