#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use cpmflow::task::{Task, TaskDraft};
use cpmflow::types::{Dependencies, EmployeeId, TaskId, TaskStatus};

/// Day 0 of every test timeline.
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

/// `epoch() + offset` days.
pub fn day(offset: u64) -> NaiveDate {
    epoch()
        .checked_add_days(Days::new(offset))
        .expect("date in range")
}

/// Builder for `Task` to simplify test setup.
///
/// Defaults: status `todo`, one-day span starting at the epoch, no
/// dependencies, no assignee.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: TaskId) -> Self {
        Self {
            task: Task {
                id,
                title: format!("task {id}"),
                status: TaskStatus::Todo,
                start_date: epoch(),
                end_date: day(1),
                dependencies: Dependencies::new(),
                assignee: None,
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.task.title = title.to_string();
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    /// Span of `days` calendar days starting at the current start date.
    pub fn lasting(mut self, days: u64) -> Self {
        self.task.end_date = self
            .task
            .start_date
            .checked_add_days(Days::new(days))
            .expect("date in range");
        self
    }

    pub fn starting(mut self, offset: u64) -> Self {
        let span = self.task.end_date - self.task.start_date;
        self.task.start_date = day(offset);
        self.task.end_date = self.task.start_date + span;
        self
    }

    pub fn dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.task.start_date = start;
        self.task.end_date = end;
        self
    }

    pub fn after(mut self, dep: TaskId) -> Self {
        let mut ids = self.task.dependencies.ids().to_vec();
        ids.push(dep);
        self.task.dependencies = ids.into();
        self
    }

    pub fn dependencies(mut self, raw: &str) -> Self {
        self.task.dependencies = Dependencies::parse(raw);
        self
    }

    pub fn assignee(mut self, employee: EmployeeId) -> Self {
        self.task.assignee = Some(employee);
        self
    }

    pub fn build(self) -> Task {
        self.task
    }

    pub fn draft(self) -> TaskDraft {
        self.task.into()
    }
}

/// The diamond A -> {B, C} -> D used across tests.
///
/// A lasts 2 days, B 2 days, C 5 days, D 1 day; the critical path is
/// A -> C -> D (ids 1, 3, 4) with a project duration of 8.
pub fn diamond() -> Vec<Task> {
    vec![
        TaskBuilder::new(1).title("A").lasting(2).build(),
        TaskBuilder::new(2).title("B").lasting(2).after(1).build(),
        TaskBuilder::new(3).title("C").lasting(5).after(1).build(),
        TaskBuilder::new(4).title("D").lasting(1).after(2).after(3).build(),
    ]
}
