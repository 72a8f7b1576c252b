pub mod error;
pub mod lease_term;
pub mod types;

#[cfg(feature = "derived")]
pub mod derived;

#[cfg(feature = "cam")]
pub mod cam;

#[cfg(feature = "ti_amortization")]
pub mod ti_amortization;

#[cfg(feature = "rent_roll")]
pub mod rent_roll;

pub use error::LeaseEngineError;
pub use types::*;

/// Standard result type for all lease engine operations
pub type LeaseEngineResult<T> = Result<T, LeaseEngineError>;
