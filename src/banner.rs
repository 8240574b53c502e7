//! Startup banner and farewell.

use crate::consts::{AUTHOR, HOMEPAGE, REPO};
use crate::keys::KeySource;
use crate::language::Language;

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub model: &'a str,
    pub language: Language,
    pub gemini: KeySource,
    pub youtube: KeySource,
    pub db: &'a str,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ┌───────────────────────────────────────┐
   │          M O O D T R I P              │
   │    tell it how you feel, get a trip   │
   └───────────────────────────────────────┘

   version   {}
   by        {}
   home      {}
   repo      {}
   model     {}
   language  {}
   gemini    {}
   youtube   {}
   db        {}
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.model,
        info.language,
        info.gemini,
        info.youtube,
        info.db,
    );
    if info.gemini == KeySource::Missing {
        println!("   no Gemini key: run /key gemini <key> or set GOOGLE_API_KEY\n");
    }
}

/// Farewell line, with a tally when any plans were made.
pub fn farewell(plans_completed: usize) -> String {
    match plans_completed {
        0 => "bon voyage.".to_string(),
        1 => "1 trip planned. bon voyage.".to_string(),
        n => format!("{n} trips planned. bon voyage."),
    }
}

pub fn print_session_summary(plans_completed: usize) {
    println!("{}", farewell(plans_completed));
}
