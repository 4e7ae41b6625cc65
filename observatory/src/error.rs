use thiserror::Error;

use crate::{Lifecycle, ObserverId};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservatoryError {
    #[error("observer is already registered as {0}")]
    AlreadyRegistered(ObserverId),
    #[error("observer was dropped before it could be registered")]
    Expired,
    #[error("registry no longer accepts observers: {0}")]
    Closed(Lifecycle),
}
