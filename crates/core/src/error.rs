//! Engine error types.
//!
//! Two families share one enum: capacity exhaustion (recoverable, the caller
//! decides whether to drop the request) and contract violations (programmer
//! errors detected at the call site). [`EngineError::is_capacity`] tells them
//! apart.

use thiserror::Error;

use crate::types::{GlyphId, RenderMode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("glyph engine is not initialized")]
    NotInitialized,

    #[error("glyph engine is already initialized in {0} mode")]
    AlreadyInitialized(RenderMode),

    #[error("another glyph engine is already active in this process")]
    AlreadyActive,

    #[error("{requested} glyphs used while the engine is in {active} mode")]
    ModeMismatch {
        requested: RenderMode,
        active: RenderMode,
    },

    #[error("glyph objects need at least one glyph")]
    EmptyObject,

    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("glyph id {0} is reserved for empty slots")]
    ReservedGlyphId(GlyphId),

    #[error("stale or unknown object handle")]
    StaleHandle,

    #[error("glyph index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("arena slot {0} holds no glyph")]
    EmptySlot(usize),

    #[error("arena slot {0} is owned by a glyph object")]
    SlotOwnedByObject(usize),

    #[error("glyph arena has no free slot")]
    ArenaFull,

    #[error("object table full ({0} objects)")]
    ObjectTableFull(usize),

    #[error("page limit exceeded: {requested} bytes requested, {in_use} in use, limit {limit}")]
    PageLimitExceeded {
        requested: usize,
        in_use: usize,
        limit: usize,
    },
}

impl EngineError {
    /// Capacity exhaustion: the request was valid but did not fit.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            EngineError::ArenaFull
                | EngineError::ObjectTableFull(_)
                | EngineError::PageLimitExceeded { .. }
        )
    }

    /// Programmer error: the call itself was invalid.
    pub fn is_contract_violation(&self) -> bool {
        !self.is_capacity()
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_families() {
        assert!(EngineError::ArenaFull.is_capacity());
        assert!(EngineError::ObjectTableFull(32).is_capacity());
        assert!(EngineError::PageLimitExceeded {
            requested: 16,
            in_use: 0,
            limit: 8
        }
        .is_capacity());

        assert!(EngineError::StaleHandle.is_contract_violation());
        assert!(EngineError::ReservedGlyphId(0).is_contract_violation());
        assert!(EngineError::NotInitialized.is_contract_violation());
    }

    #[test]
    fn test_error_messages() {
        let err = EngineError::ModeMismatch {
            requested: RenderMode::ThreeD,
            active: RenderMode::TwoD,
        };
        assert_eq!(err.to_string(), "3d glyphs used while the engine is in 2d mode");
        assert_eq!(
            EngineError::ReservedGlyphId(7).to_string(),
            "glyph id 7 is reserved for empty slots"
        );
    }
}
