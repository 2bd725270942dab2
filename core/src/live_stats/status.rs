use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state reported by the backend for one processing job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Case-insensitive parse. Unknown labels fold to `Processing` so a new
    /// backend status string degrades to "still working" instead of erroring.
    pub fn parse(label: Option<&str>) -> Self {
        match label.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("completed") | Some("done") => JobStatus::Completed,
            Some("failed") | Some("error") => JobStatus::Failed,
            _ => JobStatus::Processing,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Processing)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(JobStatus::parse(Some("PROCESSING")), JobStatus::Processing);
        assert_eq!(JobStatus::parse(Some("Completed")), JobStatus::Completed);
        assert_eq!(JobStatus::parse(Some(" done ")), JobStatus::Completed);
        assert_eq!(JobStatus::parse(Some("ERROR")), JobStatus::Failed);
        assert_eq!(JobStatus::parse(Some("failed")), JobStatus::Failed);
    }

    #[test]
    fn missing_or_unknown_labels_default_to_processing() {
        assert_eq!(JobStatus::parse(None), JobStatus::Processing);
        assert_eq!(JobStatus::parse(Some("queued")), JobStatus::Processing);
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
