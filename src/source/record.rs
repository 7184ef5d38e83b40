//! JSONL notification records.
//!
//! One JSON object per line:
//!
//! ```json
//! {"severity":"error","message":"Build failed","source":"cargo",
//!  "expanded":false,"can_collapse":true,
//!  "primary":[{"id":"retry","label":"Retry"}],
//!  "progress":{"kind":"determinate","total":10,"worked":3}}
//! ```

use crate::model::{Action, NotificationItem, ParseError, ProgressState, Severity};
use serde::Deserialize;

/// Wire shape of one notification.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NotificationRecord {
    /// Severity, `info` when absent.
    #[serde(default)]
    pub severity: Severity,
    /// Markdown message.
    pub message: String,
    /// Origin label.
    #[serde(default)]
    pub source: Option<String>,
    /// Start expanded.
    #[serde(default)]
    pub expanded: bool,
    /// Whether the row may be expanded and collapsed.
    #[serde(default = "default_can_collapse")]
    pub can_collapse: bool,
    /// Buttons shown when expanded.
    #[serde(default)]
    pub primary: Vec<ActionRecord>,
    /// Entries behind the configure menu.
    #[serde(default)]
    pub secondary: Vec<ActionRecord>,
    /// Progress reporting.
    #[serde(default)]
    pub progress: Option<ProgressRecord>,
}

fn default_can_collapse() -> bool {
    true
}

/// Wire shape of an action.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ActionRecord {
    /// Action identifier.
    pub id: String,
    /// Button or menu label.
    pub label: String,
}

/// Wire shape of a progress state.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum ProgressRecord {
    /// Indeterminate.
    Infinite,
    /// Known total and/or worked units.
    Determinate {
        /// Total units.
        #[serde(default)]
        total: Option<u64>,
        /// Worked units.
        #[serde(default)]
        worked: Option<u64>,
    },
    /// Completed.
    Done,
}

impl From<ProgressRecord> for ProgressState {
    fn from(record: ProgressRecord) -> Self {
        match record {
            ProgressRecord::Infinite => ProgressState::Infinite,
            ProgressRecord::Determinate { total, worked } => {
                ProgressState::Determinate { total, worked }
            }
            ProgressRecord::Done => ProgressState::Done,
        }
    }
}

impl NotificationRecord {
    /// Validate the record and build a notification. `line` is 1-based.
    pub fn into_item(self, line: usize) -> Result<NotificationItem, ParseError> {
        if let Some(ProgressRecord::Determinate {
            total: Some(total),
            worked: Some(worked),
        }) = self.progress
        {
            if worked > total {
                return Err(ParseError::InvalidField {
                    line,
                    field: "progress",
                    reason: format!("worked {worked} exceeds total {total}"),
                });
            }
        }

        let mut builder = NotificationItem::builder(self.message)
            .severity(self.severity)
            .expanded(self.expanded)
            .can_collapse(self.can_collapse);
        if let Some(source) = self.source {
            builder = builder.source(source);
        }
        for action in self.primary {
            builder = builder.primary(action.into_action(line, "primary")?);
        }
        for action in self.secondary {
            builder = builder.secondary(action.into_action(line, "secondary")?);
        }
        if let Some(progress) = self.progress {
            builder = builder.progress(progress.into());
        }
        Ok(builder.build())
    }
}

impl ActionRecord {
    fn into_action(self, line: usize, field: &'static str) -> Result<Action, ParseError> {
        if self.id.trim().is_empty() || self.label.trim().is_empty() {
            return Err(ParseError::InvalidField {
                line,
                field,
                reason: "action id and label must not be empty".to_string(),
            });
        }
        Ok(Action::plain(self.id, self.label))
    }
}

/// Parse one JSONL line into a notification. `line` is 1-based.
pub fn parse_line(line: usize, text: &str) -> Result<NotificationItem, ParseError> {
    let record: NotificationRecord =
        serde_json::from_str(text).map_err(|e| ParseError::InvalidJson {
            line,
            message: e.to_string(),
        })?;
    record.into_item(line)
}
