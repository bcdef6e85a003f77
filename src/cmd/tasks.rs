use crate::reports;
use clap::Args;
use forcegrade::error::{FgResult, ForceGradeError};
use forcegrade::tasks::{all_tasks, task_by_id};

#[derive(Args, Debug, Clone)]
pub struct TasksArgs {
    /// Show full detail for one task instead of the overview list.
    #[arg(short, long)]
    pub task: Option<String>,
}

pub fn run(args: TasksArgs) -> FgResult<()> {
    match &args.task {
        Some(id) => {
            let task = task_by_id(id).ok_or_else(|| {
                ForceGradeError::Config(format!("unknown task '{}'", id))
            })?;
            reports::print_task_detail(&task);
        }
        None => reports::print_task_list(&all_tasks()),
    }
    Ok(())
}
