use std::cell::Cell;
use std::time::Instant;

use codesmith::contexts::{GenerationStage, ModelResponse, StageObserver};

/// Prints a checkmark line as each generation stage completes, and a
/// summary block once the pipeline is done.
pub struct StageProgress {
    verbose: bool,
    completed: Cell<usize>,
    truncated: Cell<usize>,
    start_time: Instant,
}

impl StageProgress {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            completed: Cell::new(0),
            truncated: Cell::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn finish(&self, files_written: usize) {
        let elapsed = self.start_time.elapsed();
        println!("\n{}", "=".repeat(60));
        println!("Summary:");
        println!("  Stages:    {}", self.completed.get());
        println!("  Truncated: {}", self.truncated.get());
        println!("  Files:     {}", files_written);
        println!("  Duration:  {:.2}s", elapsed.as_secs_f64());
        println!("{}", "=".repeat(60));
    }
}

impl StageObserver for StageProgress {
    fn stage_complete(&self, stage: GenerationStage, response: &ModelResponse) {
        self.completed.set(self.completed.get() + 1);
        println!("✓ Generated {}", stage.label());

        if response.truncated {
            self.truncated.set(self.truncated.get() + 1);
            if self.verbose {
                println!("  (response reached the token ceiling; text may be partial)");
            }
        }
    }
}
