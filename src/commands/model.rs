use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};

pub struct ModelCommand;

#[async_trait]
impl Command for ModelCommand {
    fn name(&self) -> &str {
        "/model"
    }

    fn usage(&self) -> &str {
        "[name]"
    }

    fn description(&self) -> &str {
        "show or switch the Gemini model (saved for next time)"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if args.is_empty() {
            println!("  model: {}", info.model);
            return CommandResult::Handled;
        }

        if args.contains(char::is_whitespace) || args.contains('/') {
            eprintln!("  ✗ not a model name: {args}");
            return CommandResult::Handled;
        }

        if args == info.model {
            println!("  already using {args}");
            return CommandResult::Handled;
        }

        println!("  ✓ model changed to {args}");
        CommandResult::StateChanged(StateChange::Model(args.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_info;

    #[tokio::test]
    async fn no_args_shows_current() {
        assert!(matches!(
            ModelCommand.execute("", &test_info()).await,
            CommandResult::Handled
        ));
    }

    #[tokio::test]
    async fn switch_returns_model_change() {
        match ModelCommand.execute("gemini-1.5-pro", &test_info()).await {
            CommandResult::StateChanged(StateChange::Model(name)) => {
                assert_eq!(name, "gemini-1.5-pro")
            }
            other => panic!("expected model change, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn current_model_is_noop() {
        assert!(matches!(
            ModelCommand.execute("gemini-2.0-flash", &test_info()).await,
            CommandResult::Handled
        ));
    }

    #[tokio::test]
    async fn rejects_names_that_would_break_the_endpoint() {
        for bad in ["two words", "models/../x"] {
            assert!(matches!(
                ModelCommand.execute(bad, &test_info()).await,
                CommandResult::Handled
            ));
        }
    }
}
