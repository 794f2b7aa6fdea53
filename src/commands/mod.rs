//! Command frontends for the CLI

pub mod import;
pub mod validate;

pub use import::import;
pub use validate::validate;
