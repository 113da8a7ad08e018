use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "codesmith")]
#[command(about = "Staged LLM code generation with multi-file extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "Enable verbose debug output")]
    verbose: bool,

    #[arg(long, global = true, help = "Compose prompts without calling the model or writing files")]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Generate a project from a requirement via the staged pipeline")]
    Generate {
        #[arg(help = "The requirement text")]
        requirement: Option<String>,

        #[arg(long, help = "Read the requirement from a file instead")]
        file: Option<PathBuf>,

        #[arg(long, help = "Output folder name (defaults to project_<timestamp>)")]
        folder_name: Option<String>,

        #[arg(long, help = "File name used when no structured files are detected")]
        file_name: Option<String>,
    },

    #[command(about = "Extract files from a saved model response without calling the model")]
    Extract {
        #[arg(help = "Path to the saved response text")]
        response_file: PathBuf,

        #[arg(long, help = "Output folder name (defaults to project_<timestamp>)")]
        folder_name: Option<String>,

        #[arg(long, help = "File name used when no structured files are detected")]
        file_name: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let config = cli::Config {
        verbose: cli.verbose,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Generate {
            requirement,
            file,
            folder_name,
            file_name,
        } => {
            cli::generate(requirement, file, folder_name, file_name, &config)?;
        }
        Commands::Extract {
            response_file,
            folder_name,
            file_name,
        } => {
            cli::extract(response_file, folder_name, file_name, &config)?;
        }
    }

    Ok(())
}
