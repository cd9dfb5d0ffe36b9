use anyhow::Result;

use workflow::{Registry, Task, TaskId};

use crate::{Error, Span, Step, Traversal, MAX_DEPTH};

/// Append the steps of `id` to `traversal`, recursing into composite members.
/// `parents` holds the composites we are currently inside of.
pub fn expand(
    reg: &Registry,
    id: TaskId,
    parents: &mut Vec<TaskId>,
    traversal: &mut Traversal,
) -> Result<()> {
    if parents.len() >= MAX_DEPTH {
        return Err(Error::TooDeep(reg.name(id).to_owned()).into());
    }

    match &reg.get(id).task {
        Task::Atomic(action) => {
            log::trace!("step {}: {}", traversal.steps.len(), reg.name(id));
            traversal.steps.push(Step {
                task: id,
                action: *action,
                parents: parents.clone(),
            });
        }
        Task::Composite(members) => {
            let span_idx = traversal.spans.len();
            let start = traversal.steps.len();
            traversal.spans.push(Span {
                task: id,
                steps: start..start,
            });
            parents.push(id);
            for member in members {
                expand(reg, *member, parents, traversal)?;
            }
            parents.pop();
            traversal.spans[span_idx].steps.end = traversal.steps.len();
        }
    }
    Ok(())
}
