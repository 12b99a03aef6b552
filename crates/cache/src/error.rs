use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Cache operation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Maps Redis errors to CacheError.
pub(crate) fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display() {
        let error = CacheError::ConnectionFailed("refused".to_string());
        assert_eq!(error.to_string(), "Cache connection failed: refused");
    }

    #[test]
    fn test_timeout_display() {
        let error = CacheError::Timeout(std::time::Duration::from_secs(5));
        assert_eq!(error.to_string(), "Cache operation timed out after 5s");
    }
}
