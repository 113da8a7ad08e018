//! File-backed source for the system prompt.

use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Errors that can occur while loading prompts
#[derive(Debug)]
pub enum PromptError {
    NotFound(PathBuf),
    Unreadable(PathBuf, String),
}

impl fmt::Display for PromptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PromptError::NotFound(path) => {
                write!(f, "System prompt file not found: {}", path.display())
            }
            PromptError::Unreadable(path, details) => {
                write!(
                    f,
                    "Failed to read system prompt {}: {}",
                    path.display(),
                    details
                )
            }
        }
    }
}

impl std::error::Error for PromptError {}

/// Trait for loading the system prompt used by every generation call
pub trait PromptRegistry {
    fn get_system_prompt(&self) -> Result<String, PromptError>;
}

/// File-based implementation of PromptRegistry
#[derive(Clone)]
pub struct FilePromptRegistry {
    prompt_path: PathBuf,
}

impl FilePromptRegistry {
    /// Creates a new FilePromptRegistry
    ///
    /// # Arguments
    /// * `prompt_path` - Optional path to the prompt file (defaults to
    ///   "prompts/system_prompt.md")
    pub fn new(prompt_path: Option<PathBuf>) -> Self {
        Self {
            prompt_path: prompt_path
                .unwrap_or_else(|| PathBuf::from("prompts/system_prompt.md")),
        }
    }
}

impl PromptRegistry for FilePromptRegistry {
    fn get_system_prompt(&self) -> Result<String, PromptError> {
        if !self.prompt_path.exists() {
            return Err(PromptError::NotFound(self.prompt_path.clone()));
        }

        fs::read_to_string(&self.prompt_path)
            .map_err(|e| PromptError::Unreadable(self.prompt_path.clone(), e.to_string()))
    }
}
