//! The guided trip-planning conversation.
//!
//! A [`ConversationSpec`] is a fixed, ordered list of questions. Each
//! conversant walks it one answer at a time; a [`ConversationState`] tracks
//! how far they got. When every step is answered the answers are assembled
//! into a [`TravelPlan`].
//!
//! Hosts that keep the state object themselves (the terminal REPL) call
//! [`ConversationState::submit`] directly. Hosts that serve many conversants
//! (the HTTP server) go through [`GuideEngine`], which looks state up in an
//! injected [`SessionStore`](crate::session::SessionStore).

pub mod engine;
pub mod error;
pub mod plan;
pub mod spec;
pub mod state;

pub use engine::{FirstContact, GuideEngine, Progress};
pub use error::GuideError;
pub use plan::{TravelPlan, assemble};
pub use spec::{ConversationSpec, Step};
pub use state::{Answer, ConversationState, StepResult, replay};
