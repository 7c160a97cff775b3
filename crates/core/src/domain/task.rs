// Task Domain Model

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;

/// Task ID (opaque, provided by the feed)
pub type TaskId = String;

/// Priority (0 = "none", otherwise the feed's integer priority)
pub type Priority = i32;

/// Snapshot of all tasks known from one feed document, in feed order
pub type Snapshot = IndexMap<TaskId, Task>;

/// Task Entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub published: Option<DateTime<Utc>>,
    pub link: String,

    // Extracted from the entry's rendered content; any of these may be absent
    pub tags: Option<Vec<String>>,
    pub due: Option<NaiveDateTime>,
    pub priority: Option<Priority>,
}

impl Task {
    /// Create a task with only the structured feed fields set
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        published: Option<DateTime<Utc>>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            published,
            link: link.into(),
            tags: None,
            due: None,
            priority: None,
        }
    }

    /// Tags as a slice (empty when the feed carried none)
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }

    /// Short job reference used in delivery logs (last 8 characters of the link)
    pub fn job_ref(&self) -> &str {
        let start = self
            .link
            .char_indices()
            .rev()
            .nth(7)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        &self.link[start..]
    }
}
