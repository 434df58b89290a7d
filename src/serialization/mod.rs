pub mod error;
mod script;

pub use script::*;
