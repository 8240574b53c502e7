use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};

pub struct ChatCommand;

#[async_trait]
impl Command for ChatCommand {
    fn name(&self) -> &str {
        "/chat"
    }

    fn description(&self) -> &str {
        "leave guided planning and chat freely"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if info.progress.is_none() {
            println!("  already in free chat");
            return CommandResult::Handled;
        }
        CommandResult::StateChanged(StateChange::ExitGuide)
    }
}
