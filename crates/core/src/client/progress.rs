use serde::Serialize;
use std::fmt;

/// Stages shown to the submitting user, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Upload,
    Music,
    Video,
    Merge,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Upload, Stage::Music, Stage::Video, Stage::Merge];

    /// 1-based position in the indicator.
    pub fn id(self) -> u8 {
        match self {
            Stage::Upload => 1,
            Stage::Music => 2,
            Stage::Video => 3,
            Stage::Merge => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Upload => "Upload",
            Stage::Music => "Music",
            Stage::Video => "Video",
            Stage::Merge => "Merge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Processing => "processing",
            StepStatus::Completed => "completed",
            StepStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressStep {
    pub id: u8,
    pub label: &'static str,
    pub status: StepStatus,
}

/// Four-stage progress indicator.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    steps: Vec<ProgressStep>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    /// All stages pending.
    pub fn new() -> Self {
        Self {
            steps: Stage::ALL
                .iter()
                .map(|stage| ProgressStep {
                    id: stage.id(),
                    label: stage.label(),
                    status: StepStatus::Pending,
                })
                .collect(),
        }
    }

    pub fn start(&mut self, stage: Stage) {
        self.set(stage, StepStatus::Processing);
    }

    pub fn complete(&mut self, stage: Stage) {
        self.set(stage, StepStatus::Completed);
    }

    /// Move every `processing` step to `error`. Other steps keep their state.
    pub fn fail_in_flight(&mut self) {
        for step in &mut self.steps {
            if step.status == StepStatus::Processing {
                step.status = StepStatus::Error;
            }
        }
    }

    pub fn status(&self, stage: Stage) -> StepStatus {
        self.steps[usize::from(stage.id() - 1)].status
    }

    pub fn steps(&self) -> &[ProgressStep] {
        &self.steps
    }

    fn set(&mut self, stage: Stage, status: StepStatus) {
        self.steps[usize::from(stage.id() - 1)].status = status;
    }
}
