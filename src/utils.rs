use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use ureq::{Agent, AgentBuilder};

pub const USER_AGENT: &str = concat!("proximity/", env!("CARGO_PKG_VERSION"));

pub fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {human_pos}/{human_len} {percent}% ({per_sec})")
        .expect("hardcoded")
}

pub fn progress_bar(len: u64) -> ProgressBar {
    ProgressBar::new(len).with_style(progress_style())
}

pub fn agent() -> Agent {
    AgentBuilder::new()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
}
