//! The interactive terminal host.
//!
//! Free chat goes straight to the generator. `/plan` switches to guided
//! mode, where the REPL owns a [`ConversationState`] and feeds it one
//! answer per line.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::{CommandRegistry, CommandResult, SessionInfo, StateChange};
use crate::config::Config;
use crate::enrich::gemini::GeminiGenerator;
use crate::enrich::{Enricher, Translator, localize, localize_step};
use crate::guide::{Answer, ConversationSpec, ConversationState, GuideError, Progress, Step, StepResult};
use crate::keys::KeyStore;
use crate::language::Language;
use crate::prompts::travel::{CHAT_HINT, THINKING, WELCOME};
use crate::spinner::Spinner;

const PLANNING: &str = "Planning your trip...";

/// Map what the user typed to a canonical choice: a 1-based number, or the
/// choice text in any case. `None` when neither matches.
pub fn resolve_choice(step: &Step, input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| step.choices.get(i))
            .cloned();
    }
    step.choices
        .iter()
        .find(|choice| choice.eq_ignore_ascii_case(input))
        .cloned()
}

/// A question with numbered choices, as printed.
pub fn format_step(prompt: &str, labels: &[String]) -> String {
    let mut out = format!("\n{prompt}\n");
    for (i, label) in labels.iter().enumerate() {
        out.push_str(&format!("  {}. {label}\n", i + 1));
    }
    out
}

/// Terminal session state. One conversant, so no store is needed.
pub struct Repl {
    spec: ConversationSpec,
    enricher: Arc<Enricher>,
    translator: Arc<dyn Translator>,
    keys: Arc<KeyStore>,
    config: Config,
    registry: CommandRegistry,
    language: Language,
    model: String,
    db_path: String,
    guide: Option<ConversationState>,
    plans_completed: usize,
}

impl Repl {
    pub fn new(
        enricher: Arc<Enricher>,
        translator: Arc<dyn Translator>,
        keys: Arc<KeyStore>,
        config: Config,
        language: Language,
        model: String,
        db_path: String,
    ) -> Self {
        Self {
            spec: ConversationSpec::travel_planner(),
            enricher,
            translator,
            keys,
            config,
            registry: CommandRegistry::new(),
            language,
            model,
            db_path,
            guide: None,
            plans_completed: 0,
        }
    }

    pub fn plans_completed(&self) -> usize {
        self.plans_completed
    }

    fn progress(&self) -> Option<Progress> {
        self.guide.as_ref().map(|state| Progress {
            cursor: state.cursor(),
            total: self.spec.len(),
            answers: state.answers().to_vec(),
        })
    }

    fn prompt_label(&self) -> String {
        match &self.guide {
            Some(state) => format!("plan {}/{}> ", state.cursor() + 1, self.spec.len()),
            None => "moodtrip> ".to_string(),
        }
    }

    async fn say(&self, text: &str) -> String {
        localize(self.translator.as_ref(), text, self.language).await
    }

    async fn show_step(&self, step: &Step) {
        let shown = localize_step(self.translator.as_ref(), step, self.language).await;
        print!("{}", format_step(&shown.prompt, &shown.labels));
    }

    /// Read lines until EOF, Ctrl+C at the prompt, or `/quit`.
    pub async fn run(&mut self) -> Result<()> {
        println!("{}", self.say(WELCOME).await);
        println!("{}  (/plan for guided planning, /help for commands)", self.say(CHAT_HINT).await);

        let stdin = BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            print!("\n{}", self.prompt_label());
            io::stdout().flush()?;

            let line = tokio::select! {
                result = lines.next_line() => {
                    match result {
                        Ok(Some(line)) => line,
                        Ok(None) => {
                            println!();
                            break;
                        }
                        Err(e) => {
                            eprintln!("input error: {e}");
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    break;
                }
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let result = {
                let info = SessionInfo {
                    language: self.language,
                    model: &self.model,
                    keys: Some(self.keys.as_ref()),
                    progress: self.progress(),
                    plans_completed: self.plans_completed,
                    db_path: &self.db_path,
                };
                self.registry.dispatch(input, &info).await
            };
            match result {
                CommandResult::Quit => break,
                CommandResult::Handled => continue,
                CommandResult::StateChanged(change) => {
                    self.apply(change).await;
                    continue;
                }
                CommandResult::NotACommand => {}
            }

            if self.guide.is_some() {
                self.answer(input).await;
            } else {
                self.chat(input).await;
            }
        }

        Ok(())
    }

    async fn apply(&mut self, change: StateChange) {
        match change {
            StateChange::StartGuide => {
                self.guide = Some(ConversationState::new());
                let first = self.spec.first().clone();
                self.show_step(&first).await;
            }
            StateChange::ExitGuide => {
                self.guide = None;
                println!("  back to free chat");
            }
            StateChange::Language(language) => {
                self.language = language;
                if let Err(e) = self.config.set_language(language) {
                    eprintln!("  ✗ failed to save language: {e}");
                }
                if let Some(step) = self.guide.as_ref().and_then(|s| s.current_step(&self.spec)) {
                    let step = step.clone();
                    self.show_step(&step).await;
                }
            }
            StateChange::Model(model) => {
                if let Err(e) = self.switch_model(model) {
                    eprintln!("  ✗ {e}");
                }
            }
        }
    }

    /// Rebuild the generator for `model` and save it as the default.
    fn switch_model(&mut self, model: String) -> Result<()> {
        let generator = GeminiGenerator::new(Some(model.clone()), self.keys.clone())?;
        self.enricher = Arc::new(self.enricher.with_generator(Arc::new(generator)));
        self.config.set_model(&model)?;
        tracing::info!(%model, "model switched");
        self.model = model;
        Ok(())
    }

    /// Feed one line to the guided conversation.
    async fn answer(&mut self, input: &str) {
        let Some(state) = self.guide.as_mut() else {
            return;
        };
        let Some(step) = state.current_step(&self.spec) else {
            self.guide = None;
            return;
        };

        let answer = resolve_choice(step, input).unwrap_or_else(|| input.to_string());
        let result = state.submit(&self.spec, Answer::new(answer));

        match result {
            Ok(StepResult::NextQuestion(next)) => self.show_step(&next).await,
            Ok(StepResult::Complete(plan)) => {
                self.guide = None;
                self.plans_completed += 1;
                tracing::info!(mood = %plan.mood, "plan complete");

                let spinner = Spinner::start(&self.say(PLANNING).await);
                let enriched = tokio::select! {
                    enriched = self.enricher.enrich(&plan) => Some(enriched),
                    _ = tokio::signal::ctrl_c() => None,
                };
                spinner.stop().await;

                let text = match enriched {
                    Some(enriched) => enriched.to_markdown(),
                    None => {
                        println!("\n\ninterrupted, here is your plan so far:");
                        plan.to_string()
                    }
                };
                println!("\n{}", self.say(&text).await);
                println!("\n  /plan to plan another trip");
            }
            Err(GuideError::InvalidChoice { choices, .. }) => {
                eprintln!(
                    "  ✗ pick a number from 1 to {} or type one of: {}",
                    choices.len(),
                    choices.join(", ")
                );
            }
            Err(e) => {
                eprintln!("  ✗ {e}");
                self.guide = None;
            }
        }
    }

    async fn chat(&self, input: &str) {
        let spinner = Spinner::start(&self.say(THINKING).await);
        let reply = tokio::select! {
            reply = self.enricher.chat(input) => Some(reply),
            _ = tokio::signal::ctrl_c() => None,
        };
        spinner.stop().await;

        match reply {
            Some(Ok(text)) => println!("\n{}", self.say(&text).await),
            Some(Err(e)) => eprintln!("\nerror: {e}"),
            None => println!("\n\ninterrupted"),
        }
    }
}
