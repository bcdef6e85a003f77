use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::FgResult;
use crate::forces::DrawnForce;

/// Saved drawing state for one task: the force snapshot plus the feedback
/// lines shown at save time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskState {
    pub forces: Vec<DrawnForce>,
    pub feedback: Vec<String>,
}

/// On-disk state, keyed by task id.
pub type SavedState = BTreeMap<String, TaskState>;

pub fn load_state<P: AsRef<Path>>(path: P) -> FgResult<SavedState> {
    let content = fs::read_to_string(&path)?;
    let state: SavedState = serde_json::from_str(&content)?;
    info!(path = %path.as_ref().display(), tasks = state.len(), "loaded state");
    Ok(state)
}

pub fn save_state<P: AsRef<Path>>(path: P, state: &SavedState) -> FgResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&path, content)?;
    info!(path = %path.as_ref().display(), tasks = state.len(), "saved state");
    Ok(())
}

/// Load a bare force list. Accepts either a JSON array of forces or a full
/// state file, in which case the snapshot for `task_id` is returned.
pub fn load_forces<P: AsRef<Path>>(path: P, task_id: &str) -> FgResult<Vec<DrawnForce>> {
    let content = fs::read_to_string(&path)?;
    if let Ok(forces) = serde_json::from_str::<Vec<DrawnForce>>(&content) {
        return Ok(forces);
    }
    let state: SavedState = serde_json::from_str(&content)?;
    Ok(state.get(task_id).map(|s| s.forces.clone()).unwrap_or_default())
}
