pub mod feedback_export;
pub mod file_validator;
pub mod normalizer;

pub use feedback_export::{FeedbackReport, DEFAULT_EXPORT_FILE};
pub use file_validator::FileValidator;
pub use normalizer::normalize;
