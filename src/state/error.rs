use super::event::SessionEvent;
use super::model::SessionState;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid session transition: from {from:?} using event {event:?}")]
    InvalidStateTransition {
        from: SessionState,
        event: SessionEvent,
    },
}
