//! Ordered progress and error logs for one crawl
//!
//! Each line is also emitted through `tracing` so a CLI run shows progress
//! live while the result still carries the full history.

/// Status and error logs accumulated during a crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlLog {
    status: Vec<String>,
    errors: Vec<String>,
}

impl CrawlLog {
    /// Creates empty logs
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a progress message
    pub fn status(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!("{}", message);
        self.status.push(message);
    }

    /// Records a warning; warnings do not count as errors
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = format!("Warning: {}", message.into());
        tracing::warn!("{}", message);
        self.status.push(message);
    }

    /// Records a recoverable failure in both the error and status logs
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{}", message);
        self.errors.push(message.clone());
        self.status.push(message);
    }

    /// Progress messages so far
    pub fn status_lines(&self) -> &[String] {
        &self.status
    }

    /// Errors so far
    pub fn error_lines(&self) -> &[String] {
        &self.errors
    }

    /// Consumes the log, returning `(status, errors)`
    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.status, self.errors)
    }
}
