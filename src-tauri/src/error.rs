use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Could not reach the analysis server: {0}")]
    Network(String),

    #[error("The analysis server did not respond within {0} seconds")]
    Timeout(u64),

    /// `message` is the server-supplied `error` field when present.
    #[error("{message}")]
    Server { status: Option<u16>, message: String },

    #[error("Image error: {0}")]
    Image(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl AnalyzerError {
    /// Network and timeout failures are connectivity problems; everything
    /// else means the request reached something that rejected it.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, AnalyzerError::Network(_) | AnalyzerError::Timeout(_))
    }
}

impl From<AnalyzerError> for String {
    fn from(err: AnalyzerError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_displays_server_message() {
        let err = AnalyzerError::Server {
            status: Some(400),
            message: "Failed to decode image".to_string(),
        };
        let msg: String = err.into();
        assert_eq!(msg, "Failed to decode image");
    }

    #[test]
    fn test_connectivity_classification() {
        assert!(AnalyzerError::Timeout(30).is_connectivity());
        assert!(AnalyzerError::Network("refused".into()).is_connectivity());
        assert!(!AnalyzerError::Image("empty".into()).is_connectivity());
    }
}
