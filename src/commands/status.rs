use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::keys::{KeySource, Provider};

pub struct StatusCommand;

#[async_trait]
impl Command for StatusCommand {
    fn name(&self) -> &str {
        "/status"
    }

    fn aliases(&self) -> &[&str] {
        &["/whoami"]
    }

    fn description(&self) -> &str {
        "show language, model, keys, and planning progress"
    }

    async fn execute(&self, _args: &str, info: &SessionInfo<'_>) -> CommandResult {
        for line in status_lines(info) {
            println!("{line}");
        }
        CommandResult::Handled
    }
}

fn status_lines(info: &SessionInfo<'_>) -> Vec<String> {
    let mut lines = vec![
        format!("  language  {}", info.language),
        format!("  model     {}", info.model),
    ];

    for provider in Provider::ALL {
        let source = match info.keys {
            Some(keys) => keys.source(provider).unwrap_or(KeySource::Missing),
            None => KeySource::Missing,
        };
        lines.push(format!("  {:<9} {source}", provider.id()));
    }

    lines.push(match &info.progress {
        Some(p) => format!("  planning  question {} of {}", p.cursor + 1, p.total),
        None => "  planning  free chat (/plan to start)".to_string(),
    });
    lines.push(format!("  plans     {}", info.plans_completed));
    lines.push(format!("  db        {}", info.db_path));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{guided_info, test_info};
    use crate::keys::KeyStore;

    #[tokio::test]
    async fn returns_handled() {
        assert!(matches!(
            StatusCommand.execute("", &test_info()).await,
            CommandResult::Handled
        ));
    }

    #[test]
    fn shows_guide_progress() {
        let lines = status_lines(&guided_info());
        assert!(lines.iter().any(|l| l.contains("question 3 of 5")));
    }

    #[test]
    fn shows_free_chat() {
        let lines = status_lines(&test_info());
        assert!(lines.iter().any(|l| l.contains("free chat")));
        assert!(lines.iter().any(|l| l.contains("gemini-2.0-flash")));
    }

    #[test]
    fn shows_stored_key() {
        let store = KeyStore::open(":memory:").unwrap();
        store.set(Provider::YouTube, "y").unwrap();
        let info = SessionInfo {
            keys: Some(&store),
            ..test_info()
        };
        let lines = status_lines(&info);
        assert!(lines.iter().any(|l| l.contains("youtube") && l.contains("stored ✓")));
    }

    #[test]
    fn metadata() {
        assert_eq!(StatusCommand.name(), "/status");
        assert_eq!(StatusCommand.aliases(), ["/whoami"]);
    }
}
