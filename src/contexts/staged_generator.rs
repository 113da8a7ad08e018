//! Staged generation pipeline.
//!
//! One large generation request routinely blows past per-call response
//! limits, so generation runs as a fixed chain of three smaller calls:
//! scaffold, expansion, completion. Each stage's prompt embeds the previous
//! stage's full output verbatim; only the final stage's text is returned.

use log::info;

use super::model_invoker::{CallExhausted, GenerationCall, ModelInvoker, ModelResponse, Sleeper};

const SCAFFOLD_INSTRUCTION: &str =
    "\n\nStart by generating the overall structure of the project with the main file organization and essential imports.";
const EXPAND_INSTRUCTION: &str =
    "\n\nBased on the following initial code structure, please expand it with detailed model definitions and utility functions:\n\n";
const COMPLETE_INSTRUCTION: &str =
    "\n\nBased on the following code with models and utilities, please complete the implementation with detailed handlers and remaining logic:\n\n";

/// The three stages of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Scaffold,
    Expansion,
    Completion,
}

impl GenerationStage {
    pub fn label(&self) -> &'static str {
        match self {
            GenerationStage::Scaffold => "structure and scaffolding",
            GenerationStage::Expansion => "models and utility functions",
            GenerationStage::Completion => "handlers and remaining logic",
        }
    }
}

/// Observer for per-stage progress. Purely an observable side effect; the
/// data contract of the pipeline is the final stage's text alone.
pub trait StageObserver {
    fn stage_complete(&self, stage: GenerationStage, response: &ModelResponse);
}

/// Observer that ignores all progress.
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn stage_complete(&self, _stage: GenerationStage, _response: &ModelResponse) {}
}

/// Runs the fixed three-stage generation chain over a [`ModelInvoker`].
pub struct StagedGenerator<C, S>
where
    C: GenerationCall,
    S: Sleeper,
{
    invoker: ModelInvoker<C, S>,
}

impl<C, S> StagedGenerator<C, S>
where
    C: GenerationCall,
    S: Sleeper,
{
    pub fn new(invoker: ModelInvoker<C, S>) -> Self {
        Self { invoker }
    }

    /// Executes the chain and returns stage 3's text unconditionally.
    ///
    /// Stages run strictly sequentially: each prompt depends on the
    /// previous stage's full output. A [`CallExhausted`] from any stage
    /// propagates immediately and aborts the remaining stages; there is no
    /// partial-result recovery.
    pub fn generate(
        &self,
        system_prompt: &str,
        base_prompt: &str,
        observer: &dyn StageObserver,
    ) -> Result<String, CallExhausted> {
        info!("Starting staged generation process");

        let stage1_prompt = format!("{}{}", base_prompt, SCAFFOLD_INSTRUCTION);
        let stage1 = self.invoker.invoke(system_prompt, &stage1_prompt)?;
        info!("Stage 1 complete: scaffold generated");
        observer.stage_complete(GenerationStage::Scaffold, &stage1);

        let stage2_prompt = format!("{}{}{}", base_prompt, EXPAND_INSTRUCTION, stage1.text);
        let stage2 = self.invoker.invoke(system_prompt, &stage2_prompt)?;
        info!("Stage 2 complete: models and utilities generated");
        observer.stage_complete(GenerationStage::Expansion, &stage2);

        let stage3_prompt = format!("{}{}{}", base_prompt, COMPLETE_INSTRUCTION, stage2.text);
        let stage3 = self.invoker.invoke(system_prompt, &stage3_prompt)?;
        info!("Stage 3 complete: full generation finished");
        observer.stage_complete(GenerationStage::Completion, &stage3);

        Ok(stage3.text)
    }
}
