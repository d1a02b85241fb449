// src/config/validate.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::warn;

use crate::config::model::{ConfigSection, ProjectFile, RawProjectFile};
use crate::errors::{CpmflowError, Result};
use crate::task::{Task, TaskDraft};
use crate::types::TaskId;

impl TryFrom<RawProjectFile> for ProjectFile {
    type Error = CpmflowError;

    fn try_from(raw: RawProjectFile) -> std::result::Result<Self, Self::Error> {
        validate_global_config(&raw.config)?;
        let drafts = parse_task_ids(&raw)?;
        validate_task_fields(&drafts)?;

        let strict = raw.config.strict_dependencies;
        check_dependency_references(&drafts, strict)?;
        check_cycles(&drafts, strict)?;

        let tasks = drafts
            .into_iter()
            .map(|(id, draft)| Task::from_draft(id, draft.clone()))
            .collect();
        Ok(ProjectFile::new_unchecked(raw.config, tasks))
    }
}

fn validate_global_config(cfg: &ConfigSection) -> Result<()> {
    if cfg.observer_buffer == 0 {
        return Err(CpmflowError::ConfigError(
            "[config].observer_buffer must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.engine_queue == 0 {
        return Err(CpmflowError::ConfigError(
            "[config].engine_queue must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn parse_task_ids(raw: &RawProjectFile) -> Result<BTreeMap<TaskId, &TaskDraft>> {
    let mut drafts = BTreeMap::new();
    for (key, draft) in raw.task.iter() {
        let id = match key.trim().parse::<TaskId>() {
            Ok(id) if id > 0 => id,
            _ => {
                return Err(CpmflowError::ConfigError(format!(
                    "task key '{key}' is not a positive integer id"
                )));
            }
        };
        if drafts.insert(id, draft).is_some() {
            return Err(CpmflowError::ConfigError(format!(
                "task id {id} is defined more than once"
            )));
        }
    }
    Ok(drafts)
}

fn validate_task_fields(drafts: &BTreeMap<TaskId, &TaskDraft>) -> Result<()> {
    for (id, draft) in drafts.iter() {
        draft
            .validate()
            .map_err(|e| CpmflowError::ConfigError(format!("task {id}: {e}")))?;
    }
    Ok(())
}

/// The engine silently drops dangling and self references. Surface them here
/// so a malformed project file does not go unnoticed.
fn check_dependency_references(
    drafts: &BTreeMap<TaskId, &TaskDraft>,
    strict: bool,
) -> Result<()> {
    for (&id, draft) in drafts.iter() {
        for dep in draft.dependencies.iter() {
            let problem = if dep == id {
                "depends on itself"
            } else if !drafts.contains_key(&dep) {
                "depends on unknown task"
            } else {
                continue;
            };

            if strict {
                return Err(CpmflowError::ConfigError(format!(
                    "task {id} {problem} {dep}"
                )));
            }
            warn!(task = id, dependency = dep, "{problem}; reference will be ignored");
        }
    }
    Ok(())
}

fn check_cycles(drafts: &BTreeMap<TaskId, &TaskDraft>, strict: bool) -> Result<()> {
    // Edge direction: dependency -> dependent, valid references only.
    let mut graph: DiGraphMap<TaskId, ()> = DiGraphMap::new();

    for &id in drafts.keys() {
        graph.add_node(id);
    }

    for (&id, draft) in drafts.iter() {
        for dep in draft.dependencies.iter() {
            if dep != id && drafts.contains_key(&dep) {
                graph.add_edge(dep, id, ());
            }
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            if strict {
                return Err(CpmflowError::ConfigError(format!(
                    "dependency cycle involving task {node}"
                )));
            }
            warn!(task = node, "dependency cycle detected; the project has no valid schedule");
            Ok(())
        }
    }
}
