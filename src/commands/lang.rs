use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};
use crate::language::Language;

pub struct LangCommand;

#[async_trait]
impl Command for LangCommand {
    fn name(&self) -> &str {
        "/lang"
    }

    fn usage(&self) -> &str {
        "[language]"
    }

    fn description(&self) -> &str {
        "show or switch the display language"
    }

    async fn execute(&self, args: &str, info: &SessionInfo<'_>) -> CommandResult {
        if args.is_empty() {
            for language in Language::ALL {
                let marker = if language == info.language {
                    " ← current"
                } else {
                    ""
                };
                println!("  {} ({}){marker}", language.name(), language.code());
            }
            return CommandResult::Handled;
        }

        let language: Language = match args.parse() {
            Ok(l) => l,
            Err(e) => {
                eprintln!("  ✗ {e}");
                return CommandResult::Handled;
            }
        };

        if language == info.language {
            println!("  already using {language}");
            return CommandResult::Handled;
        }

        println!("  ✓ language changed to {language}");
        CommandResult::StateChanged(StateChange::Language(language))
    }
}
