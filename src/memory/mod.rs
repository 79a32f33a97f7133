//! Runtime state of an evaluation
//!
//! - [`value`]: tagged runtime values and their truthiness
//! - [`environment`]: the scope stack that binds names to values

pub mod environment;
pub mod value;
