use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::keys::Provider;

pub struct KeyCommand;

#[async_trait]
impl Command for KeyCommand {
    fn name(&self) -> &str {
        "/key"
    }

    fn usage(&self) -> &str {
        "<gemini|youtube> <value>"
    }

    fn description(&self) -> &str {
        "save an API key"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        let Some(keys) = info.keys else {
            eprintln!("  ✗ key storage not available");
            return CommandResult::Handled;
        };

        let Some((provider, value)) = args.split_once(char::is_whitespace) else {
            eprintln!("  usage: /key {}", self.usage());
            return CommandResult::Handled;
        };

        let provider: Provider = match provider.parse() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("  ✗ {e}");
                return CommandResult::Handled;
            }
        };

        match keys.set(provider, value.trim()) {
            Ok(()) => println!("  ✓ {provider} key saved ({})", mask(value.trim())),
            Err(e) => eprintln!("  ✗ failed to save key: {e}"),
        }
        CommandResult::Handled
    }
}

/// `AIza…9xYz`: enough to recognise a key, not enough to use it.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "…".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
