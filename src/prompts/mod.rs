pub mod travel;

pub use travel::{build_plan_prompt, build_travel_system_prompt};
