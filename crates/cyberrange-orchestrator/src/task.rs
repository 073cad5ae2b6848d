//! In-memory task modeling for external callers.
//!
//! HTTP hosting is out of scope for this crate; a thin host that does own
//! sockets can wrap [`Orchestrator::evaluate`][crate::Orchestrator::evaluate]
//! in the `pending → running → completed|failed` progression this type
//! models, without this crate ever touching a socket itself.

use cyberrange_types::EvaluationResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeTask {
    pub id: String,
    pub status: TaskStatus,
    pub output: Option<EvaluationResult>,
    pub error: Option<String>,
}

impl RangeTask {
    pub fn pending(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: TaskStatus::Pending,
            output: None,
            error: None,
        }
    }

    pub fn start(&mut self) {
        self.status = TaskStatus::Running;
    }

    pub fn complete(&mut self, result: EvaluationResult) {
        self.status = TaskStatus::Completed;
        self.output = Some(result);
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_transitions_as_expected() {
        let mut task = RangeTask::pending("t1");
        assert_eq!(task.status, TaskStatus::Pending);
        task.start();
        assert_eq!(task.status, TaskStatus::Running);
        task.fail("subject unreachable");
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.error.is_some());
    }
}
