mod amount;
mod secret;

pub mod helpers;

pub use amount::{Amount, AmountError};
pub use secret::Secret;
