use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fmt::{format_duration, now_rfc3339, parse_rfc3339};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Pending,
    Success,
    Failure,
}

/// One tool invocation within a session. Records are append-only;
/// completion mutates the matching pending record in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub tool: String,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    pub status: ToolStatus,
    #[serde(default)]
    pub summary: String,
}

impl ToolRecord {
    /// Wall-clock seconds from start to end, when both parse.
    pub fn elapsed_secs(&self) -> Option<u64> {
        let start = parse_rfc3339(&self.started_at)?;
        let end = parse_rfc3339(self.ended_at.as_deref()?)?;
        Some((end - start).whole_seconds().max(0) as u64)
    }
}

/// State of the most recent Claude Code session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: String,
    pub project: String,
    pub started_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub tool_invocations: Vec<ToolRecord>,
    #[serde(default)]
    pub error_count: u32,
    #[serde(default)]
    pub last_update: String,
}

impl SessionState {
    pub fn new(id: &str, cwd: &str) -> Self {
        SessionState {
            id: id.to_string(),
            project: project_label(cwd),
            started_at: now_rfc3339(),
            ended_at: None,
            tool_invocations: Vec::new(),
            error_count: 0,
            last_update: String::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// First eight characters of the session id, for display. The id
    /// is opaque text, so the clip lands on a char boundary.
    pub fn short_id(&self) -> &str {
        self.id
            .char_indices()
            .nth(8)
            .map_or(self.id.as_str(), |(i, _)| &self.id[..i])
    }

    pub fn total_tools(&self) -> usize {
        self.tool_invocations.len()
    }

    pub fn successful_tools(&self) -> usize {
        self.tool_invocations
            .iter()
            .filter(|r| r.status == ToolStatus::Success)
            .count()
    }

    pub fn failed_tools(&self) -> usize {
        self.tool_invocations
            .iter()
            .filter(|r| r.status == ToolStatus::Failure)
            .count()
    }

    /// Most recently started invocation that has not completed yet.
    pub fn pending_tool(&self) -> Option<&ToolRecord> {
        self.tool_invocations
            .iter()
            .rev()
            .find(|r| r.status == ToolStatus::Pending)
    }

    /// Append a pending record for a tool that just started.
    pub fn start_tool(&mut self, tool: &str, summary: String) {
        self.tool_invocations.push(ToolRecord {
            tool: tool.to_string(),
            started_at: now_rfc3339(),
            ended_at: None,
            status: ToolStatus::Pending,
            summary,
        });
    }

    /// Complete the newest pending record for `tool`. Failures bump
    /// `error_count`. Completion without a recorded start (matcher
    /// mismatch) still counts: a record is synthesized on the spot.
    pub fn end_tool(&mut self, tool: &str, success: bool, summary: String) -> &ToolRecord {
        let idx = match self
            .tool_invocations
            .iter()
            .rposition(|r| r.status == ToolStatus::Pending && r.tool == tool)
        {
            Some(idx) => idx,
            None => {
                self.tool_invocations.push(ToolRecord {
                    tool: tool.to_string(),
                    started_at: now_rfc3339(),
                    ended_at: None,
                    status: ToolStatus::Pending,
                    summary: String::new(),
                });
                self.tool_invocations.len() - 1
            }
        };
        if !success {
            self.error_count += 1;
        }
        let record = &mut self.tool_invocations[idx];
        record.ended_at = Some(now_rfc3339());
        record.status = if success {
            ToolStatus::Success
        } else {
            ToolStatus::Failure
        };
        record.summary = summary;
        &self.tool_invocations[idx]
    }

    /// Mark the session over. A second call keeps the original end time.
    pub fn end_session(&mut self) {
        if self.ended_at.is_none() {
            self.ended_at = Some(now_rfc3339());
        }
    }

    /// Elapsed session time, against the end timestamp for finished
    /// sessions and against the current clock otherwise.
    pub fn duration_str(&self) -> String {
        let Some(start) = parse_rfc3339(&self.started_at) else {
            return "N/A".to_string();
        };
        let end = self
            .ended_at
            .as_deref()
            .and_then(parse_rfc3339)
            .unwrap_or_else(time::OffsetDateTime::now_utc);
        format_duration((end - start).whole_seconds().max(0) as u64)
    }
}

/// Display label for the working directory: its basename, or
/// "Unknown" when no usable name exists.
fn project_label(cwd: &str) -> String {
    if cwd.is_empty() {
        return "Unknown".to_string();
    }
    Path::new(cwd)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Unknown".to_string())
}
