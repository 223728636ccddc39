pub mod analyze_client;

pub use analyze_client::{AnalysisBackend, AnalyzeClient, FILE_FIELD};
