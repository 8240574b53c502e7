use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::guide::Progress;

pub struct QuitCommand;

/// Note printed when leaving with a half-answered plan.
fn unfinished_note(progress: Option<&Progress>) -> Option<String> {
    let progress = progress.filter(|p| !p.is_complete())?;
    Some(format!(
        "  leaving an unfinished plan ({}/{} answered)",
        progress.cursor, progress.total
    ))
}

#[async_trait]
impl Command for QuitCommand {
    fn name(&self) -> &str {
        "/quit"
    }

    fn aliases(&self) -> &[&str] {
        &["quit", "exit", "/exit"]
    }

    fn description(&self) -> &str {
        "exit moodtrip"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if let Some(note) = unfinished_note(info.progress.as_ref()) {
            println!("{note}");
        }
        CommandResult::Quit
    }
}
