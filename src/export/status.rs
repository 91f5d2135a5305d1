//! Export status record shared between the worker and its observers.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

/// Point-in-time snapshot of an export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatus {
    pub is_running: bool,
    /// Completion in `[0, 1]`.
    pub progress: f64,
    pub message: String,
    pub output_path: Option<String>,
    /// Set on terminal failure; `"cancelled"` for a cooperative cancel.
    pub error: Option<String>,
    pub started_at_ms: Option<u64>,
    pub finished_at_ms: Option<u64>,
}

impl Default for ExportStatus {
    fn default() -> Self {
        ExportStatus {
            is_running: false,
            progress: 0.0,
            message: "Idle".to_string(),
            output_path: None,
            error: None,
            started_at_ms: None,
            finished_at_ms: None,
        }
    }
}

/// Shared, cloneable handle to the status record.
#[derive(Clone, Default)]
pub struct SharedExportStatus(Arc<Mutex<ExportStatus>>);

impl SharedExportStatus {
    pub fn snapshot(&self) -> ExportStatus {
        self.0.lock().clone()
    }

    pub fn update(&self, mutate: impl FnOnce(&mut ExportStatus)) {
        let mut status = self.0.lock();
        mutate(&mut status);
    }

    pub fn is_running(&self) -> bool {
        self.0.lock().is_running
    }
}

/// Current wall clock, ms since the Unix epoch.
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_idle() {
        let status = ExportStatus::default();
        assert!(!status.is_running);
        assert_eq!(status.progress, 0.0);
        assert_eq!(status.message, "Idle");
        assert!(status.error.is_none());
    }

    #[test]
    fn serializes_camel_case() {
        let status = ExportStatus {
            is_running: true,
            progress: 0.5,
            message: "Exporting... 50%".to_string(),
            output_path: Some("out.mp4".to_string()),
            error: None,
            started_at_ms: Some(1),
            finished_at_ms: None,
        };
        let json = serde_json::to_string(&status).unwrap();
        assert!(json.contains("\"isRunning\":true"));
        assert!(json.contains("\"outputPath\""));
        assert!(json.contains("\"startedAtMs\""));
    }

    #[test]
    fn shared_status_updates_are_visible_to_clones() {
        let shared = SharedExportStatus::default();
        let other = shared.clone();
        shared.update(|status| status.progress = 0.75);
        assert_eq!(other.snapshot().progress, 0.75);
    }
}
