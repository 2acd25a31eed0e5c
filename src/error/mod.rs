use crate::crop::{AspectRatioError, GeometryError};
use crate::loader::LoadError;
use crate::positioner::PositionerError;
use crate::state::StateError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Positioner(#[from] PositionerError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    AspectRatio(#[from] AspectRatioError),
}
