// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Store-assigned task identifier. Never reused once assigned.
pub type TaskId = u64;

/// Employee identifier carried as an optional assignee reference.
pub type EmployeeId = u64;

/// Workflow status of a task.
///
/// The scheduling engine ignores status entirely; it is carried so that
/// observers (boards, Gantt views) can render it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(format!(
                "invalid task status: {other} (expected \"todo\", \"in-progress\" or \"done\")"
            )),
        }
    }
}

/// Normalized dependency id set of a task.
///
/// Accepts either a structured list of ids or a comma-separated string.
/// Blank and non-numeric tokens are ignored. Ids are kept sorted and
/// unique, so `"2, x,1,,2"`, `[2, 1]` and `"1,2"` are all equal.
///
/// Serializes as an ascending list of ids; [`Dependencies::to_delimited`]
/// produces the textual encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Dependencies(Vec<TaskId>);

impl Dependencies {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parse the comma-separated encoding.
    pub fn parse(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| token.parse::<TaskId>().ok())
            .collect()
    }

    /// Comma-separated encoding, e.g. `"1,2"`. Empty list gives `""`.
    pub fn to_delimited(&self) -> String {
        self.0
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn ids(&self) -> &[TaskId] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl FromIterator<TaskId> for Dependencies {
    fn from_iter<I: IntoIterator<Item = TaskId>>(iter: I) -> Self {
        let mut ids: Vec<TaskId> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }
}

impl From<Vec<TaskId>> for Dependencies {
    fn from(ids: Vec<TaskId>) -> Self {
        ids.into_iter().collect()
    }
}

impl fmt::Display for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_delimited())
    }
}

impl Serialize for Dependencies {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Wire forms accepted for a dependency list.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDependencies {
    List(Vec<RawDependencyId>),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDependencyId {
    Id(TaskId),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl<'de> Deserialize<'de> for Dependencies {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<RawDependencies>::deserialize(deserializer)?;
        Ok(match raw {
            None => Dependencies::new(),
            Some(RawDependencies::Text(text)) => Dependencies::parse(&text),
            Some(RawDependencies::List(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    RawDependencyId::Id(id) => Some(id),
                    RawDependencyId::Text(text) => text.trim().parse::<TaskId>().ok(),
                    RawDependencyId::Other(_) => None,
                })
                .collect(),
        })
    }
}
