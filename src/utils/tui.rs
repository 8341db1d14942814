use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;

const TICK: Duration = Duration::from_millis(80);

/// Spinner drawn on stderr so piped stdout stays clean.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("  {spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.dimmed().to_string());
    spinner.enable_steady_tick(TICK);
    spinner
}

/// Await `task` behind a spinner, clearing it once the task settles.
pub async fn spin_while<F: Future>(message: &str, task: F) -> F::Output {
    let spinner = create_spinner(message);
    let output = task.await;
    spinner.finish_and_clear();
    output
}
