use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{debug, info};

use super::menu::{ask_line, MenuChoice, MENU};
use crate::{
    app::{Assistant, TaskKind},
    config::Config,
    session::{InteractiveSession, FAILURE_PREFIX},
    utils::text::string::single_line,
};

/// Repo Advisor - LLM-backed reviews and audits for the project in front of you
#[derive(Parser, Debug)]
#[command(
    name = "repo-advisor",
    version,
    about = "LLM-backed code analysis, audits and reviews for a local project",
    long_about = r#"Repo Advisor scans a local project, packs the relevant files into a prompt
and asks an OpenAI-compatible chat-completions endpoint for an analysis.

Examples:
  repo-advisor                          # Numbered menu
  repo-advisor security                 # Security audit
  repo-advisor review src/main.js       # Review one file
  repo-advisor ask how is routing done  # One question
  repo-advisor --cwd /path/to/project   # Analyze another directory"#
)]
pub struct Cli {
    /// Project directory to analyze
    #[arg(short = 'c', long = "cwd", global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Model override for this run
    #[arg(short = 'm', long = "model", global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Full codebase analysis
    Analyze,
    /// Security audit
    Security,
    /// Performance optimization suggestions
    Performance,
    /// Feature suggestions
    Features,
    /// Code review of a single file
    Review {
        /// File path, relative to the project directory
        path: String,
    },
    /// Ask one question about the project
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Start interactive mode
    Chat,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        if let Some(cwd) = &self.cwd {
            std::env::set_current_dir(cwd)
                .map_err(|e| anyhow::anyhow!("Failed to change directory to {}: {}", cwd.display(), e))?;
            info!("Changed working directory to: {}", cwd.display());
        }

        let mut config = Config::init(None)?;
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        debug!("Configuration initialized for {}", config.project_root.display());

        let mut assistant = Assistant::new(config)?;
        let mut stdout = io::stdout();

        match self.command {
            Some(Commands::Analyze) => run_task(&mut assistant, TaskKind::FullAnalysis, None, &mut stdout).await,
            Some(Commands::Security) => run_task(&mut assistant, TaskKind::SecurityAudit, None, &mut stdout).await,
            Some(Commands::Performance) => {
                run_task(&mut assistant, TaskKind::PerformanceAudit, None, &mut stdout).await
            }
            Some(Commands::Features) => {
                run_task(&mut assistant, TaskKind::FeatureSuggestions, None, &mut stdout).await
            }
            Some(Commands::Review { path }) => {
                run_task(&mut assistant, TaskKind::CodeReview, Some(&path), &mut stdout).await
            }
            Some(Commands::Ask { question }) => {
                let question = question.join(" ");
                run_task(&mut assistant, TaskKind::GenericChat, Some(&question), &mut stdout).await
            }
            Some(Commands::Chat) => {
                let mut stdin = BufReader::new(tokio::io::stdin());
                start_interactive_mode(&mut assistant, &mut stdin, &mut stdout).await
            }
            None => {
                let mut stdin = BufReader::new(tokio::io::stdin());
                run_menu(&mut assistant, &mut stdin, &mut stdout).await
            }
        }
    }
}

async fn run_menu<R, W>(assistant: &mut Assistant, input: &mut R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(output, "🤖 Repo Advisor for {}", assistant.project_name())?;
    writeln!(output, "{}", MENU)?;

    let Some(answer) = ask_line(input, output, "\nEnter choice (1-6): ").await? else {
        return Ok(());
    };

    let choice = MenuChoice::parse(&answer);
    debug!("Menu choice {:?}", choice);

    if let Some(kind) = choice.task() {
        return run_task(assistant, kind, None, output).await;
    }

    match choice {
        MenuChoice::Review => match ask_line(input, output, "📁 Enter file path: ").await? {
            Some(path) if !path.is_empty() => {
                run_task(assistant, TaskKind::CodeReview, Some(&path), output).await
            }
            _ => {
                writeln!(output, "{} No file path given", FAILURE_PREFIX)?;
                Ok(())
            }
        },
        _ => start_interactive_mode(assistant, input, output).await,
    }
}

async fn start_interactive_mode<R, W>(assistant: &mut Assistant, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let end = InteractiveSession::new(assistant).run(input, output).await?;
    info!("Interactive session ended: {:?}", end);
    Ok(())
}

/// Run one task and print its result, or a single failure line.
///
/// Only fatal (configuration) errors are returned.
async fn run_task<W: Write>(
    assistant: &mut Assistant,
    kind: TaskKind,
    argument: Option<&str>,
    output: &mut W,
) -> Result<()> {
    writeln!(output, "⏳ {} of {}...", kind, assistant.project_name())?;
    output.flush()?;

    match assistant.run(kind, argument).await {
        Ok(text) => writeln!(output, "\n{}", text)?,
        Err(e) if e.is_fatal() => return Err(e.into()),
        Err(e) => writeln!(output, "{} {}", FAILURE_PREFIX, single_line(&e.to_string()))?,
    }
    output.flush()?;
    Ok(())
}
