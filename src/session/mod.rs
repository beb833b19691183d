//! Interactive read-eval-print session over an assistant

mod command;

pub use command::{Command, COMMAND_HELP};

use futures::FutureExt;
use std::{
    any::Any,
    io::{self, Write},
    panic::AssertUnwindSafe,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, error, info};

use crate::{
    app::{Assistant, AssistantResult},
    utils::text::string::single_line,
};

pub const PROMPT: &str = "💬 Ask me anything: ";
pub const FAILURE_PREFIX: &str = "❌";
const GOODBYE: &str = "👋 Goodbye!";

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
    Interrupted,
}

enum Outcome {
    Finished(std::thread::Result<AssistantResult<String>>),
    Interrupted,
}

pub struct InteractiveSession<'a> {
    assistant: &'a mut Assistant,
}

impl<'a> InteractiveSession<'a> {
    pub fn new(assistant: &'a mut Assistant) -> Self {
        Self { assistant }
    }

    /// Drive the session until quit, end of input, or Ctrl-C.
    ///
    /// A failing or panicking command prints one failure line and the loop
    /// goes on. Only output errors end the session early.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> io::Result<SessionEnd>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        info!("Starting interactive session for {}", self.assistant.project_name());
        writeln!(
            output,
            "🤖 Interactive mode for {}. Type /help for commands.",
            self.assistant.project_name()
        )?;
        writeln!(output, "{}", COMMAND_HELP)?;

        let mut lines = input.lines();
        loop {
            write!(output, "\n{}", PROMPT)?;
            output.flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = interrupted() => {
                    writeln!(output, "\n{}", GOODBYE)?;
                    return Ok(SessionEnd::Interrupted);
                }
            };

            let Some(line) = line else {
                writeln!(output, "\n{}", GOODBYE)?;
                return Ok(SessionEnd::EndOfInput);
            };

            let command = Command::parse(&line);
            debug!("Parsed command: {:?}", command);

            match command {
                Command::Empty => continue,
                Command::Quit => {
                    writeln!(output, "{}", GOODBYE)?;
                    return Ok(SessionEnd::Quit);
                }
                Command::Help => writeln!(output, "{}", COMMAND_HELP)?,
                Command::Review(None) => {
                    writeln!(output, "{} Usage: /review <path>", FAILURE_PREFIX)?;
                }
                command => {
                    writeln!(output, "{}", status_line(&command))?;
                    output.flush()?;

                    let outcome = {
                        let pending = AssertUnwindSafe(self.execute(command)).catch_unwind();
                        tokio::select! {
                            result = pending => Outcome::Finished(result),
                            _ = interrupted() => Outcome::Interrupted,
                        }
                    };

                    match outcome {
                        Outcome::Finished(Ok(Ok(text))) => writeln!(output, "\n{}", text)?,
                        Outcome::Finished(Ok(Err(e))) => {
                            writeln!(output, "{} {}", FAILURE_PREFIX, single_line(&e.to_string()))?;
                        }
                        Outcome::Finished(Err(payload)) => {
                            error!("Command panicked: {}", panic_message(payload.as_ref()));
                            writeln!(
                                output,
                                "{} Internal error: {}",
                                FAILURE_PREFIX,
                                single_line(&panic_message(payload.as_ref()))
                            )?;
                        }
                        Outcome::Interrupted => {
                            writeln!(output, "\n{}", GOODBYE)?;
                            return Ok(SessionEnd::Interrupted);
                        }
                    }
                }
            }
        }
    }

    async fn execute(&mut self, command: Command) -> AssistantResult<String> {
        match command {
            Command::Analyze => self.assistant.analyze().await,
            Command::Security => self.assistant.security_audit().await,
            Command::Performance => self.assistant.performance_audit().await,
            Command::Features => self.assistant.suggest_features().await,
            Command::Review(Some(path)) => self.assistant.code_review(&path).await,
            Command::Chat(question) => self
                .assistant
                .chat(&question)
                .await
                .map(|answer| format!("🤖 {}", answer)),
            Command::Review(None) | Command::Help | Command::Quit | Command::Empty => Ok(String::new()),
        }
    }
}

fn status_line(command: &Command) -> String {
    match command {
        Command::Analyze => "🔍 Analyzing codebase...".to_string(),
        Command::Security => "🔒 Running security audit...".to_string(),
        Command::Performance => "⚡ Analyzing performance...".to_string(),
        Command::Features => "💡 Generating feature suggestions...".to_string(),
        Command::Review(Some(path)) => format!("📝 Reviewing {}...", path),
        _ => "🤔 Thinking...".to_string(),
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        debug!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
