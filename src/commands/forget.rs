use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::keys::Provider;

pub struct ForgetCommand;

#[async_trait]
impl Command for ForgetCommand {
    fn name(&self) -> &str {
        "/forget"
    }

    fn usage(&self) -> &str {
        "<provider>"
    }

    fn description(&self) -> &str {
        "remove a saved API key"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let Some(keys) = info.keys else {
            eprintln!("  ✗ key storage not available");
            return CommandResult::Handled;
        };

        let provider: Provider = match args.parse() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("  ✗ {e}");
                return CommandResult::Handled;
            }
        };

        match keys.remove(provider) {
            Ok(()) => {
                println!("  ✓ {provider} key removed");
                if std::env::var(provider.env_var()).is_ok_and(|v| !v.is_empty()) {
                    println!("  note: {} is still set in the environment", provider.env_var());
                }
            }
            Err(e) => eprintln!("  ✗ failed to remove key: {e}"),
        }
        CommandResult::Handled
    }
}
