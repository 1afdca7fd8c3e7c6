use super::pipeline_step::{PipelineStep, StepAction};
use crate::error::Error;

/// Executes a series of steps in sequence over a shared context.
///
/// Each step can continue, end the pipeline early with success (`Skip`) or
/// abort it with an error.
pub struct Pipeline<T> {
    pub steps: Vec<Box<dyn PipelineStep<T>>>,
}

impl<T> Pipeline<T> {
    pub fn with_steps(steps: Vec<Box<dyn PipelineStep<T>>>) -> Self {
        Self { steps }
    }

    /// Returns `Ok(())` when all steps complete or one of them returns `Skip`,
    /// and the error of the first step returning `Abort`.
    pub async fn execute(&self, context: &mut T) -> Result<(), Error> {
        for step in &self.steps {
            if !step.should_execute(context) {
                tracing::debug!("Step {} will be skipped based on context", step.name());
                continue;
            }

            tracing::debug!("Executing step: {}", step.name());

            match step.execute(context).await {
                StepAction::Continue => continue,
                StepAction::Skip => {
                    tracing::debug!("Step {} requested skip - stopping pipeline", step.name());
                    return Ok(());
                }
                StepAction::Abort(error) => {
                    tracing::error!("Step {} aborted the pipeline: {}", step.name(), error);
                    return Err(error);
                }
            }
        }

        Ok(())
    }
}
