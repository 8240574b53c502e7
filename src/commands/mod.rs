//! Built-in REPL commands prefixed with `/`.
//!
//! Commands implement the [`Command`] trait and are registered in a
//! [`CommandRegistry`]. The registry splits the command word from its
//! arguments, resolves aliases, and generates `/help`.

mod chat;
mod forget;
mod help;
mod key;
mod lang;
mod model;
mod plan;
mod quit;
mod status;

use async_trait::async_trait;
use std::sync::Arc;

use crate::guide::Progress;
use crate::keys::KeyStore;
use crate::language::Language;

/// Session info available to commands during execution.
pub struct SessionInfo<'a> {
    pub language: Language,
    pub model: &'a str,
    pub keys: Option<&'a KeyStore>,
    /// Guided-planning progress; `None` in free chat.
    pub progress: Option<Progress>,
    pub plans_completed: usize,
    pub db_path: &'a str,
}

/// A state change the REPL needs to apply after a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// Begin (or restart) guided planning.
    StartGuide,
    /// Drop back to free chat.
    ExitGuide,
    /// Switch display language.
    Language(Language),
    /// Switch the generator model.
    Model(String),
}

/// What the REPL should do after a command runs.
#[derive(Debug)]
pub enum CommandResult {
    /// Not a command, pass input on.
    NotACommand,
    /// Command handled, continue the REPL loop.
    Handled,
    /// Command produced a state change the REPL must apply.
    StateChanged(StateChange),
    /// Exit the REPL.
    Quit,
}

/// A REPL command. Implement this trait to add new commands.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, e.g. `"/status"`.
    fn name(&self) -> &str;

    /// Alternative names, e.g. `&["/h", "/?"]`.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Argument synopsis for `/help`, e.g. `"<provider>"`.
    fn usage(&self) -> &str {
        ""
    }

    /// One-line description for `/help`.
    fn description(&self) -> &str;

    /// Run the command. `args` is everything after the command word,
    /// trimmed.
    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult;
}

/// Holds registered commands.
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with all built-in commands.
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(plan::PlanCommand),
            Arc::new(chat::ChatCommand),
            Arc::new(lang::LangCommand),
            Arc::new(model::ModelCommand),
            Arc::new(key::KeyCommand),
            Arc::new(forget::ForgetCommand),
            Arc::new(status::StatusCommand),
            Arc::new(quit::QuitCommand),
        ];
        Self { commands }
    }

    /// Register an additional command.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    /// Dispatch input to a matching command, or return `NotACommand`.
    ///
    /// Bare-word aliases (`quit`, `exit`) only match on their own, so a
    /// chat message that happens to start with one still goes through.
    pub async fn dispatch(&self, input: &str, info: &SessionInfo<'_>) -> CommandResult {
        let input = input.trim();
        let (word, args) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };
        let is_slash = word.starts_with('/');

        for command in &self.commands {
            if word != command.name() && !command.aliases().contains(&word) {
                continue;
            }
            if !is_slash && !args.is_empty() {
                break;
            }
            // /help needs the registry to list all commands
            if command.name() == "/help" {
                print!("{}", self.help_text());
                return CommandResult::Handled;
            }
            tracing::debug!(command = command.name(), "dispatching command");
            return command.execute(args, info).await;
        }

        if is_slash {
            println!("unknown command: {word}");
            println!("type /help for available commands");
            return CommandResult::Handled;
        }

        CommandResult::NotACommand
    }

    /// Generate help text from all registered commands.
    pub fn help_text(&self) -> String {
        let entries: Vec<(String, &str)> = self
            .commands
            .iter()
            .map(|c| (format_label(c.name(), c.usage(), c.aliases()), c.description()))
            .collect();

        let max_width = entries
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(10);

        let mut out = String::new();
        for (label, desc) in &entries {
            out.push_str(&format!("  {label:<max_width$}  {desc}\n"));
        }
        out
    }

    /// All registered command names.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// All registered names and aliases.
    pub fn all_triggers(&self) -> Vec<&str> {
        let mut triggers = Vec::new();
        for cmd in &self.commands {
            triggers.push(cmd.name());
            triggers.extend_from_slice(cmd.aliases());
        }
        triggers
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn format_label(name: &str, usage: &str, aliases: &[&str]) -> String {
    let mut label = name.to_string();
    if !usage.is_empty() {
        label.push(' ');
        label.push_str(usage);
    }
    if !aliases.is_empty() {
        label.push_str(&format!(" ({})", aliases.join(", ")));
    }
    label
}
