pub mod ai;
pub mod batch;
pub mod encoding;
pub mod google;
pub mod pipeline;
pub mod progress;
pub mod settings;
pub mod translator;
pub mod writer;
