pub mod language;
pub mod record;
pub mod target;
