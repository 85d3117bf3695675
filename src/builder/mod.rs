//! Builder API for deploying crossing controllers.
//!
//! The three crossing constants and the operator are fixed at deployment.
//! The builder collects them, validates them in one pass and hands back a
//! ready controller.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::ControllerBuilder;
