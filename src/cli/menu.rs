//! Numbered menu shown when no subcommand is given

use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::app::TaskKind;

pub const MENU: &str = "\
What would you like to do?
  1. Full codebase analysis
  2. Security audit
  3. Performance optimization
  4. Feature suggestions
  5. Interactive mode
  6. Code review (specific file)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Analyze,
    Security,
    Performance,
    Features,
    Interactive,
    Review,
}

impl MenuChoice {
    /// Anything that is not a listed number falls back to interactive mode
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => MenuChoice::Analyze,
            "2" => MenuChoice::Security,
            "3" => MenuChoice::Performance,
            "4" => MenuChoice::Features,
            "6" => MenuChoice::Review,
            _ => MenuChoice::Interactive,
        }
    }

    /// Task run directly for the choice, if it needs no further input
    pub fn task(self) -> Option<TaskKind> {
        match self {
            MenuChoice::Analyze => Some(TaskKind::FullAnalysis),
            MenuChoice::Security => Some(TaskKind::SecurityAudit),
            MenuChoice::Performance => Some(TaskKind::PerformanceAudit),
            MenuChoice::Features => Some(TaskKind::FeatureSuggestions),
            MenuChoice::Interactive | MenuChoice::Review => None,
        }
    }
}

/// Print `prompt` and read one trimmed line; `None` at end of input
pub async fn ask_line<R, W>(input: &mut R, output: &mut W, prompt: &str) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
