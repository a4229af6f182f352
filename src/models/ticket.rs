use serde::Serialize;

/// One row of a tracker export, exactly as read.
///
/// Columns are kept as ordered pairs because exports repeat some headers
/// (a ticket carried over several sprints has one `Sprint` column per sprint).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTicketRow {
    cells: Vec<(String, String)>,
}

impl RawTicketRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.push((column.into(), value.into()));
    }

    /// First non-empty value of the column with this exact name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .filter(|(c, _)| c.trim() == column)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// First non-empty value of any column whose name contains `fragment`.
    pub fn get_containing(&self, fragment: &str) -> Option<&str> {
        self.values_containing(fragment).into_iter().next()
    }

    /// All non-empty values of columns whose name contains `fragment`.
    pub fn values_containing(&self, fragment: &str) -> Vec<&str> {
        self.cells
            .iter()
            .filter(|(c, _)| c.contains(fragment))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TicketStatus {
    ToDo,
    InProgress,
    DoneLike,
    Other,
}

impl TicketStatus {
    /// Map tracker status text onto a category. `None` means unknown.
    pub fn from_raw(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "to do" | "todo" | "open" | "backlog" => Some(Self::ToDo),
            "in progress" | "in review" | "review" | "testing" | "in testing" => {
                Some(Self::InProgress)
            }
            "done" | "resolved" | "closed" | "cancelled" | "canceled" => Some(Self::DoneLike),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, TicketStatus::DoneLike)
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TicketStatus::ToDo => "todo",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::DoneLike => "done",
            TicketStatus::Other => "other",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(TicketStatus::ToDo),
            "in_progress" => Some(TicketStatus::InProgress),
            "done" => Some(TicketStatus::DoneLike),
            "other" => Some(TicketStatus::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Priority {
    Critical,
    Blocker,
    Other,
}

impl Priority {
    pub fn from_raw(s: &str) -> Self {
        let p = s.to_lowercase();
        if p.contains("critical") {
            Priority::Critical
        } else if p.contains("blocker") {
            Priority::Blocker
        } else {
            Priority::Other
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(self, Priority::Critical | Priority::Blocker)
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::Blocker => "blocker",
            Priority::Other => "other",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "critical" => Some(Priority::Critical),
            "blocker" => Some(Priority::Blocker),
            "other" => Some(Priority::Other),
            _ => None,
        }
    }
}

/// Canonical, strongly typed view of one ticket. Built only by the
/// normalizer; `remaining_days` and `spent_days` follow from `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub key: String,
    pub status: TicketStatus,
    pub raw_status: String,
    pub story_points_days: f64,
    pub remaining_days: f64,
    pub spent_days: f64,
    pub priority: Priority,
    pub assignee_first_name: String,
    pub excluded: bool,
    pub summary: String,
    pub issue_type: String,
    /// Window inferred from this row's own sprint label, if any.
    pub sprint_key: Option<String>,
    /// Key of the parent story, set on sub-tasks.
    pub parent_key: Option<String>,
}

impl NormalizedRecord {
    pub fn is_story(&self) -> bool {
        self.issue_type.eq_ignore_ascii_case("story")
    }

    pub fn is_subtask(&self) -> bool {
        self.issue_type.eq_ignore_ascii_case("sub-task")
    }

    /// Epics and sub-tasks do not count as sprint work items.
    pub fn is_work_item(&self) -> bool {
        !(self.is_subtask() || self.issue_type.eq_ignore_ascii_case("epic"))
    }
}
