use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};

pub struct PlanCommand;

#[async_trait]
impl Command for PlanCommand {
    fn name(&self) -> &str {
        "/plan"
    }

    fn aliases(&self) -> &[&str] {
        &["/start"]
    }

    fn description(&self) -> &str {
        "start guided trip planning (restarts if already planning)"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if let Some(progress) = &info.progress
            && progress.cursor > 0
        {
            println!("  starting over, {} answers discarded", progress.cursor);
        }
        CommandResult::StateChanged(StateChange::StartGuide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{guided_info, test_info};

    #[tokio::test]
    async fn starts_guide_from_chat() {
        assert!(matches!(
            PlanCommand.execute("", &test_info()).await,
            CommandResult::StateChanged(StateChange::StartGuide)
        ));
    }

    #[tokio::test]
    async fn restarts_mid_plan() {
        assert!(matches!(
            PlanCommand.execute("", &guided_info()).await,
            CommandResult::StateChanged(StateChange::StartGuide)
        ));
    }
}
