pub mod error;
pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;

pub use error::{CoreError, TranslationError};
