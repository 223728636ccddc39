pub mod analysis;
pub mod state;
pub mod upload;

pub use analysis::{display_score, AnalysisResult, FeatureValue, RawAnalysisPayload, ScoreBand};
pub use state::{ErrorInfo, ErrorKind, SubmissionState};
pub use upload::{FileData, ResumeFile, UploadSpec, ValidatedUpload};
