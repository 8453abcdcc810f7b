use thiserror::Error;

#[derive(Debug, Error)]
pub enum BurgerLogError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Rejections raised while assembling a record from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("venue name required")]
    VenueRequired,
}
