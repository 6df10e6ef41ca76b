/// Unified error handler for centralized error management

use bookmark_manager_core::errors::*;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, warn, info};

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// Critical error requiring immediate attention
    Critical,
    /// Error that affects functionality
    Error,
    /// Warning about potential issues
    Warning,
    /// Informational message
    Info,
}

/// Error entry for tracking
#[derive(Debug, Clone)]
pub struct ErrorEntry {
    pub error: String,
    pub severity: ErrorSeverity,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub context: String,
}

/// Unified error handler
pub struct UnifiedErrorHandler {
    /// Recent errors for reporting
    recent_errors: Arc<RwLock<Vec<ErrorEntry>>>,
    /// Maximum number of errors to keep
    max_errors: usize,
}

impl UnifiedErrorHandler {
    /// Create a new error handler
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Create an error handler keeping at most `max_errors` entries
    pub fn with_capacity(max_errors: usize) -> Self {
        Self {
            recent_errors: Arc::new(RwLock::new(Vec::new())),
            max_errors,
        }
    }

    /// Handle an error with automatic logging
    pub async fn handle_error(
        &self,
        error: &BookmarkManagerError,
        context: &str,
    ) {
        let severity = Self::classify_error(error);

        // Log based on severity
        match severity {
            ErrorSeverity::Critical => {
                error!("CRITICAL ERROR in {}: {}", context, error);
            }
            ErrorSeverity::Error => {
                error!("ERROR in {}: {}", context, error);
            }
            ErrorSeverity::Warning => {
                warn!("WARNING in {}: {}", context, error);
            }
            ErrorSeverity::Info => {
                info!("INFO in {}: {}", context, error);
            }
        }

        // Record error
        let entry = ErrorEntry {
            error: error.to_string(),
            severity,
            timestamp: chrono::Utc::now(),
            context: context.to_string(),
        };

        self.add_error_entry(entry).await;
    }

    /// Classify error severity
    pub fn classify_error(error: &BookmarkManagerError) -> ErrorSeverity {
        use BookmarkManagerError::*;

        match error {
            Validation { .. } => ErrorSeverity::Info,
            Fetch { .. } => ErrorSeverity::Warning,
            Persistence { source: PersistenceError::NotFound { .. } } => ErrorSeverity::Info,
            Persistence { source: PersistenceError::DuplicateUrl { .. } } => ErrorSeverity::Warning,
            Persistence { source: PersistenceError::Database { .. } } => ErrorSeverity::Critical,
            System { source: SystemError::Configuration { .. } } => ErrorSeverity::Error,
            System { .. } => ErrorSeverity::Critical,
        }
    }

    /// Add an error entry to the history
    async fn add_error_entry(&self, entry: ErrorEntry) {
        let mut errors = self.recent_errors.write().await;
        errors.push(entry);

        // Keep only recent errors
        if errors.len() > self.max_errors {
            let excess = errors.len() - self.max_errors;
            errors.drain(0..excess);
        }
    }

    /// Get recent errors
    pub async fn get_recent_errors(&self) -> Vec<ErrorEntry> {
        self.recent_errors.read().await.clone()
    }

    /// Get error statistics
    pub async fn get_error_stats(&self) -> ErrorStatistics {
        let errors = self.recent_errors.read().await;

        let mut stats = ErrorStatistics {
            total: errors.len(),
            critical: 0,
            errors: 0,
            warnings: 0,
            info: 0,
        };

        for error in errors.iter() {
            match error.severity {
                ErrorSeverity::Critical => stats.critical += 1,
                ErrorSeverity::Error => stats.errors += 1,
                ErrorSeverity::Warning => stats.warnings += 1,
                ErrorSeverity::Info => stats.info += 1,
            }
        }

        stats
    }

    /// Clear error history
    pub async fn clear_errors(&self) {
        self.recent_errors.write().await.clear();
    }
}

impl Default for UnifiedErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Error statistics
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ErrorStatistics {
    pub total: usize,
    pub critical: usize,
    pub errors: usize,
    pub warnings: usize,
    pub info: usize,
}
