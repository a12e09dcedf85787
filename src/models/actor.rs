//! The user on whose behalf an operation runs.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::ActorId;

/// Who is performing an operation. Recorded on generated lines and in the
/// audit history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The actor's user id.
    pub id: ActorId,
    /// The actor's display name, copied into audit entries.
    pub display_name: String,
}

impl Actor {
    /// Creates an actor.
    pub fn new(id: ActorId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }

    /// Audit entries need a name; a blank one is rejected up front.
    pub fn validate(&self) -> EngineResult<()> {
        if self.display_name.trim().is_empty() {
            return Err(EngineError::MissingActor);
        }
        Ok(())
    }
}
