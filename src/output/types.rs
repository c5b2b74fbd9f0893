// src/output/types.rs
//! Plan and report types for output delivery.

use std::path::PathBuf;

/// Ordered list of deliveries for one result.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub operations: Vec<DeliveryTarget>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: DeliveryTarget) -> Self {
        self.operations.push(operation);
        self
    }

    /// Plan for `content`: the requested file and clipboard targets, or stdout
    /// when neither is requested.
    pub fn for_content(content: &str, path: Option<PathBuf>, clipboard: bool) -> Self {
        let mut plan = Self::new();
        if let Some(path) = path {
            plan = plan.with_operation(DeliveryTarget::WriteFile {
                path,
                content: content.to_string(),
            });
        }
        if clipboard {
            plan = plan.with_operation(DeliveryTarget::CopyToClipboard {
                content: content.to_string(),
            });
        }
        if plan.operations.is_empty() {
            plan = plan.with_operation(DeliveryTarget::PrintToStdout {
                content: content.to_string(),
            });
        }
        plan
    }
}

/// A single delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    WriteFile { path: PathBuf, content: String },
    CopyToClipboard { content: String },
    PrintToStdout { content: String },
}

impl DeliveryTarget {
    pub fn describe(&self) -> String {
        match self {
            DeliveryTarget::WriteFile { path, .. } => format!("file {}", path.display()),
            DeliveryTarget::CopyToClipboard { .. } => "clipboard".to_string(),
            DeliveryTarget::PrintToStdout { .. } => "stdout".to_string(),
        }
    }
}

/// Outcome of delivering a plan.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub completed: Vec<CompletedOperation>,
    pub failed: Vec<FailedOperation>,
    pub bytes_written: usize,
    pub total_duration_ms: u64,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completed(mut self, operation: CompletedOperation) -> Self {
        self.bytes_written += operation.bytes_written;
        self.completed.push(operation);
        self
    }

    pub fn with_failed(mut self, operation: FailedOperation) -> Self {
        self.failed.push(operation);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// One line per failure, for error reporting.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failed
            .iter()
            .map(|f| format!("{}: {}", f.operation.describe(), f.error))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct CompletedOperation {
    pub operation: DeliveryTarget,
    pub bytes_written: usize,
}

#[derive(Debug, Clone)]
pub struct FailedOperation {
    pub operation: DeliveryTarget,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plan_defaults_to_stdout() {
        let plan = OutputPlan::for_content("guide", None, false);
        assert_eq!(
            plan.operations,
            vec![DeliveryTarget::PrintToStdout {
                content: "guide".into()
            }]
        );
    }

    #[test]
    fn plan_with_file_and_clipboard_skips_stdout() {
        let plan = OutputPlan::for_content("guide", Some(PathBuf::from("out.md")), true);
        assert_eq!(plan.operations.len(), 2);
        assert!(matches!(
            plan.operations[0],
            DeliveryTarget::WriteFile { .. }
        ));
        assert!(matches!(
            plan.operations[1],
            DeliveryTarget::CopyToClipboard { .. }
        ));
    }
}
