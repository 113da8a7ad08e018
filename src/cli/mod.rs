use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

mod progress;

use codesmith::contexts::{extract_files, HttpGenerationClient, ModelInvoker, StagedGenerator};
use codesmith::registries::{FilePromptRegistry, ModelSettings, PromptRegistry};
use codesmith::workspace;
use progress::StageProgress;

#[derive(Clone, Copy)]
pub struct Config {
    pub verbose: bool,
    pub dry_run: bool,
}

const OUTPUT_ROOT: &str = "generated";
const DEFAULT_FILE_NAME: &str = "index.js";

/// Runs the full pipeline: staged generation, extraction, persistence.
pub fn generate(
    requirement: Option<String>,
    requirement_file: Option<PathBuf>,
    folder_name: Option<String>,
    file_name: Option<String>,
    config: &Config,
) -> Result<()> {
    let requirement = resolve_requirement(requirement, requirement_file)?;
    let folder_name = folder_name.unwrap_or_else(default_folder_name);
    let file_name = file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

    let settings = ModelSettings::load(None)?;

    let system_prompt = FilePromptRegistry::new(None)
        .get_system_prompt()
        .map_err(|e| anyhow::anyhow!("Failed to load system prompt: {}", e))?;
    let base_prompt = build_base_prompt(&requirement);

    if config.dry_run {
        println!("Dry run: no model calls will be made.");
        println!("\nModel: {}", settings.model);
        println!("\nSystem prompt:\n{}", system_prompt);
        println!("\nBase prompt:\n{}", base_prompt);
        return Ok(());
    }

    let client = HttpGenerationClient::from_env(
        settings.model.clone(),
        settings.sampling(),
        settings.connect_timeout_secs,
        settings.read_timeout_secs,
    )
    .map_err(|e| anyhow::anyhow!("Failed to configure model client: {}", e))?;
    let invoker = ModelInvoker::new(client, settings.max_retries, settings.max_tokens_per_call);
    let generator = StagedGenerator::new(invoker);

    println!("Generating code in stages to avoid timeouts...");
    let progress = StageProgress::new(config.verbose);

    let response = generator
        .generate(&system_prompt, &base_prompt, &progress)
        .map_err(|e| anyhow::anyhow!("Code generation failed: {}", e))?;

    let files = extract_files(&response);
    let representative = workspace::save_files(
        Path::new(OUTPUT_ROOT),
        &folder_name,
        &file_name,
        &response,
        &files,
    )?;

    progress.finish(files.len().max(1));
    println!("✓ Code generated and saved to {}", representative.display());

    if config.verbose {
        for file in &files {
            println!("  {}/{}/{}", OUTPUT_ROOT, folder_name, file.path);
        }
    }

    Ok(())
}

/// Re-runs extraction over a saved response file, without any model calls.
pub fn extract(
    response_file: PathBuf,
    folder_name: Option<String>,
    file_name: Option<String>,
    config: &Config,
) -> Result<()> {
    let response = fs::read_to_string(&response_file).with_context(|| {
        format!("Failed to read response file {}", response_file.display())
    })?;

    let files = extract_files(&response);
    println!("Extracted {} file(s)", files.len());

    if config.verbose {
        for file in &files {
            println!("  {} ({} bytes)", file.path, file.content.len());
        }
    }

    if config.dry_run {
        return Ok(());
    }

    let folder_name = folder_name.unwrap_or_else(default_folder_name);
    let file_name = file_name.unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

    let representative = workspace::save_files(
        Path::new(OUTPUT_ROOT),
        &folder_name,
        &file_name,
        &response,
        &files,
    )?;

    println!("✓ Saved to {}", representative.display());
    Ok(())
}

fn resolve_requirement(
    requirement: Option<String>,
    requirement_file: Option<PathBuf>,
) -> Result<String> {
    match (requirement, requirement_file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => fs::read_to_string(&path)
            .with_context(|| format!("Failed to read requirement file {}", path.display())),
        (None, None) => {
            anyhow::bail!("No requirement given. Pass it as an argument or via --file.")
        }
    }
}

fn default_folder_name() -> String {
    format!("project_{}", Utc::now().format("%Y%m%d_%H%M%S"))
}

/// Wraps the user requirement in the fixed instructional template sent as
/// the base prompt of every stage.
fn build_base_prompt(requirement: &str) -> String {
    format!(
        r#"
Based on the following requirement, please generate complete, production-ready code:

REQUIREMENT:
{}

Please follow all the architecture patterns, coding standards, and implementation guidelines as specified in the system prompt.
Ensure the code is:
- Well-structured with clear separation of concerns
- Thoroughly documented
- Consistent with established patterns
- Optimized for performance and reliability
- Free from security vulnerabilities
- Ready for production use without significant modifications

Please provide the complete code implementation.
"#,
        requirement
    )
}
