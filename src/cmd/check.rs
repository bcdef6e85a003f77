use crate::reports;
use clap::Args;
use forcegrade::config::{Config, Tolerances};
use forcegrade::error::{FgResult, ForceGradeError};
use forcegrade::persist;
use forcegrade::scorer::engine;
use forcegrade::tasks::task_by_id;

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: Config,

    /// Task id to grade against (see `tasks` for the list).
    #[arg(short, long)]
    pub task: String,

    /// JSON file with the drawn forces, or a saved state file.
    #[arg(short, long)]
    pub forces: String,

    /// Tolerance profile (JSON); overrides the task's tolerances.
    #[arg(long)]
    pub profile: Option<String>,

    /// Write the snapshot and feedback back to this state file.
    #[arg(long)]
    pub state: Option<String>,
}

pub fn run(args: CheckArgs) -> FgResult<()> {
    let mut task = task_by_id(&args.task)
        .ok_or_else(|| ForceGradeError::Config(format!("unknown task '{}'", args.task)))?;
    task.validate()?;

    // Tolerance flags replace the task's profile; an explicit file wins.
    task.tol = args.config.tol.clone();
    if let Some(profile) = &args.profile {
        println!("\u{2696}\u{fe0f}  Loading tolerances from: {}", profile);
        task.tol = Tolerances::load_from_file(profile)?;
    }

    let forces = persist::load_forces(&args.forces, &task.id)?;
    let result = engine::evaluate_with(&task, &forces, &args.config);

    reports::print_evaluation(&task, &result);

    if let Some(state_path) = &args.state {
        let mut state = persist::load_state(state_path).unwrap_or_default();
        state.insert(
            task.id.clone(),
            persist::TaskState {
                forces,
                feedback: result.feedback.clone(),
            },
        );
        persist::save_state(state_path, &state)?;
        println!("\u{1F4BE} State saved to: {}", state_path);
    }

    Ok(())
}
