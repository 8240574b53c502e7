use std::sync::Arc;

use serde::Serialize;

use super::{Answer, ConversationSpec, GuideError, Step, StepResult};
use crate::session::SessionStore;
use crate::session::memory::lock;

/// What to do when `submit` arrives for a conversant with no state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FirstContact {
    /// Open a conversation and reply with the first question. The message
    /// itself answers nothing and is not recorded.
    #[default]
    Greet,
    /// Refuse with [`GuideError::UnknownConversant`]; `start` is required.
    Reject,
}

/// A read-only snapshot of one conversant's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub cursor: usize,
    pub total: usize,
    pub answers: Vec<String>,
}

impl Progress {
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.total
    }
}

/// Drives every conversant through the same [`ConversationSpec`].
///
/// State is kept in the injected store, one lock per conversant. All
/// operations are synchronous and never block on anything but that lock.
pub struct GuideEngine<K> {
    spec: Arc<ConversationSpec>,
    store: Arc<dyn SessionStore<K>>,
    first_contact: FirstContact,
}

impl<K> GuideEngine<K> {
    pub fn new(spec: ConversationSpec, store: Arc<dyn SessionStore<K>>) -> Self {
        Self {
            spec: Arc::new(spec),
            store,
            first_contact: FirstContact::default(),
        }
    }

    pub fn with_first_contact(mut self, policy: FirstContact) -> Self {
        self.first_contact = policy;
        self
    }

    pub fn spec(&self) -> &ConversationSpec {
        &self.spec
    }

    pub fn first_contact(&self) -> FirstContact {
        self.first_contact
    }

    pub fn store(&self) -> &Arc<dyn SessionStore<K>> {
        &self.store
    }

    /// Begin (or begin again) a conversation. Any progress is discarded.
    pub fn start(&self, id: &K) -> Step {
        loop {
            let (slot, created) = self.store.get_or_create(id);
            let mut session = lock(&slot);
            if session.evicted {
                continue;
            }
            session.state.restart();
            session.touch();
            tracing::debug!(created, "conversation started");
            return self.spec.first().clone();
        }
    }

    /// Answer the current question.
    ///
    /// On error nothing is recorded, so the caller can simply retry.
    pub fn submit(&self, id: &K, answer: Answer) -> Result<StepResult, GuideError> {
        loop {
            let slot = match self.store.get(id) {
                Some(slot) => slot,
                None => match self.first_contact {
                    FirstContact::Reject => return Err(GuideError::UnknownConversant),
                    FirstContact::Greet => {
                        let (slot, created) = self.store.get_or_create(id);
                        if created {
                            tracing::debug!("first contact, sending opening question");
                            return Ok(StepResult::NextQuestion(self.spec.first().clone()));
                        }
                        // lost a race with another first message; answer normally
                        slot
                    }
                },
            };

            let mut session = lock(&slot);
            if session.evicted {
                // forgotten between lookup and lock
                tracing::debug!("session evicted mid-turn, looking up again");
                continue;
            }
            session.touch();
            return session.state.submit(&self.spec, answer);
        }
    }

    /// The question waiting to be answered, if any.
    pub fn current_step(&self, id: &K) -> Option<Step> {
        let slot = self.store.get(id)?;
        let session = lock(&slot);
        session.state.current_step(&self.spec).cloned()
    }

    pub fn progress(&self, id: &K) -> Option<Progress> {
        let slot = self.store.get(id)?;
        let session = lock(&slot);
        Some(Progress {
            cursor: session.state.cursor(),
            total: self.spec.len(),
            answers: session.state.answers().to_vec(),
        })
    }

    /// Drop a conversant's state entirely.
    pub fn forget(&self, id: &K) -> bool {
        self.store.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    fn engine(policy: FirstContact) -> GuideEngine<String> {
        GuideEngine::<String>::new(
            ConversationSpec::travel_planner(),
            Arc::new(MemoryStore::<String>::new()),
        )
        .with_first_contact(policy)
    }

    fn id(name: &str) -> String {
        name.to_string()
    }

    #[test]
    fn default_policy_is_greet() {
        assert_eq!(FirstContact::default(), FirstContact::Greet);
    }

    #[test]
    fn start_returns_first_step() {
        let engine = engine(FirstContact::Reject);
        let step = engine.start(&id("a"));
        assert_eq!(step.prompt, "What is your mood for this trip?");
        assert_eq!(engine.current_step(&id("a")), Some(step));
    }

    #[test]
    fn greet_does_not_record_first_message() {
        let engine = engine(FirstContact::Greet);
        let result = engine.submit(&id("a"), "hi there".into()).unwrap();
        assert_eq!(
            result,
            StepResult::NextQuestion(engine.spec().first().clone())
        );
        let progress = engine.progress(&id("a")).unwrap();
        assert_eq!(progress.cursor, 0);
        assert!(progress.answers.is_empty());
    }

    #[test]
    fn greet_only_applies_once() {
        let engine = engine(FirstContact::Greet);
        engine.submit(&id("a"), "hello".into()).unwrap();
        let err = engine.submit(&id("a"), "hello again".into()).unwrap_err();
        assert!(matches!(err, GuideError::InvalidChoice { .. }));
    }

    #[test]
    fn reject_requires_start() {
        let engine = engine(FirstContact::Reject);
        assert_eq!(
            engine.submit(&id("a"), "Happy".into()),
            Err(GuideError::UnknownConversant)
        );
        assert!(engine.progress(&id("a")).is_none());
        assert!(engine.store().is_empty());
    }

    #[test]
    fn current_step_unknown_is_none() {
        let engine = engine(FirstContact::Greet);
        assert!(engine.current_step(&id("ghost")).is_none());
    }

    #[test]
    fn progress_reports_completion() {
        let engine = engine(FirstContact::Reject);
        engine.start(&id("a"));
        for answer in ["Happy", "4-7 days", "Medium", "Solo", "Mountains"] {
            engine.submit(&id("a"), answer.into()).unwrap();
        }
        let progress = engine.progress(&id("a")).unwrap();
        assert!(progress.is_complete());
        assert_eq!(progress.total, 5);
        assert!(engine.current_step(&id("a")).is_none());
    }

    #[test]
    fn forget_removes_state() {
        let engine = engine(FirstContact::Reject);
        engine.start(&id("a"));
        assert!(engine.forget(&id("a")));
        assert!(engine.current_step(&id("a")).is_none());
        assert!(!engine.forget(&id("a")));
    }

    /// Hands out a slot and then drops it before the caller can lock it,
    /// the way a concurrent DELETE or the reaper would.
    struct ForgetfulStore {
        inner: MemoryStore<String>,
        armed: std::sync::atomic::AtomicBool,
    }

    impl SessionStore<String> for ForgetfulStore {
        fn get(&self, id: &String) -> Option<crate::session::Slot> {
            let slot = self.inner.get(id)?;
            if self.armed.swap(false, std::sync::atomic::Ordering::SeqCst) {
                self.inner.remove(id);
            }
            Some(slot)
        }
        fn get_or_create(&self, id: &String) -> (crate::session::Slot, bool) {
            self.inner.get_or_create(id)
        }
        fn remove(&self, id: &String) -> bool {
            self.inner.remove(id)
        }
        fn evict_idle(&self, max_idle: std::time::Duration) -> usize {
            self.inner.evict_idle(max_idle)
        }
        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    fn forgetful_engine(policy: FirstContact) -> (GuideEngine<String>, Arc<ForgetfulStore>) {
        let store = Arc::new(ForgetfulStore {
            inner: MemoryStore::new(),
            armed: std::sync::atomic::AtomicBool::new(false),
        });
        let engine = GuideEngine::<String>::new(ConversationSpec::travel_planner(), store.clone())
            .with_first_contact(policy);
        (engine, store)
    }

    #[test]
    fn answer_racing_a_forget_is_not_recorded() {
        let (engine, store) = forgetful_engine(FirstContact::Greet);
        engine.start(&id("a"));
        engine.submit(&id("a"), "Happy".into()).unwrap();
        store.armed.store(true, std::sync::atomic::Ordering::SeqCst);

        // the old session is gone, so this is a first contact again
        let result = engine.submit(&id("a"), "4-7 days".into()).unwrap();
        assert_eq!(result, StepResult::NextQuestion(engine.spec().first().clone()));
        let progress = engine.progress(&id("a")).unwrap();
        assert_eq!(progress.cursor, 0);
        assert!(progress.answers.is_empty());
    }

    #[test]
    fn answer_racing_a_forget_is_rejected_when_strict() {
        let (engine, store) = forgetful_engine(FirstContact::Reject);
        engine.start(&id("a"));
        store.armed.store(true, std::sync::atomic::Ordering::SeqCst);

        assert_eq!(
            engine.submit(&id("a"), "Happy".into()),
            Err(GuideError::UnknownConversant)
        );
        assert!(engine.store().is_empty());
    }
}
