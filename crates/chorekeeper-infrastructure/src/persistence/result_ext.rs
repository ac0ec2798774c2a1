use chorekeeper_domain::shared::DomainError;

/// Extension trait for mapping storage errors into DomainError
pub trait ResultExt<T> {
    /// Convert the error to `DomainError::Repository` with context
    fn map_repo_error(self, context: &str) -> Result<T, DomainError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn map_repo_error(self, context: &str) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Repository(format!("{}: {}", context, e)))
    }
}
