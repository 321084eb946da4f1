//! Client for the remote colorimetric analysis service.

pub mod http;
pub mod image_prep;

pub use http::{AnalysisClient, BackendHealth};
pub use image_prep::prepare_upload;
