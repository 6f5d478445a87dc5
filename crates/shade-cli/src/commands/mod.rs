//! Command implementations

pub mod audit;
pub mod encode;
pub mod inspect;

pub use audit::run_audit;
pub use encode::run_encode;
pub use inspect::{run_decode, run_reveal};
