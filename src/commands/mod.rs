pub mod add;
pub mod day;
pub mod delete;
pub mod edit;
pub mod export;
pub mod list;
pub mod login;
pub mod month;
pub mod token;

use anyhow::Result;
use clap::Args;
use owo_colors::OwoColorize;
use parishcal_core::EventDraft;
use parishcal_core::store::{EventStore, SaveReport};

use crate::render::Render;

/// Event fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct EventArgs {
    /// Event title
    #[arg(long)]
    pub title: Option<String>,

    /// Date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// Start time (HH:MM); pass "" to clear
    #[arg(long)]
    pub time: Option<String>,

    /// Where it happens; pass "" to clear
    #[arg(long)]
    pub location: Option<String>,

    /// service, fellowship, parishgroups, parishweek or special
    #[arg(long = "type")]
    pub event_type: Option<String>,

    /// Longer description; pass "" to clear
    #[arg(long)]
    pub description: Option<String>,
}

impl EventArgs {
    /// Overlay the given flags onto `base`.
    pub fn apply_to(self, base: EventDraft) -> EventDraft {
        EventDraft {
            title: self.title.or(base.title),
            date: self.date.or(base.date),
            time: self.time.or(base.time),
            location: self.location.or(base.location),
            event_type: self.event_type.or(base.event_type),
            description: self.description.or(base.description),
        }
    }
}

/// Push the store's changes to the remote tier and report the outcome.
///
/// A degraded save writes `events.json` into the current directory for a
/// manual upload.
pub async fn finish_save(store: &mut EventStore) -> Result<()> {
    match store.sync_remote().await {
        SaveReport::Remote => {
            println!("{}", "  Saved to the website repository".dimmed());
        }
        SaveReport::LocalOnly => {
            println!(
                "{}",
                "  Saved locally. Run `parishcal token set` to sync with the website repository."
                    .dimmed()
            );
        }
        SaveReport::Degraded { warning, artifact } => {
            eprintln!("{}", warning.render());
            let dir = std::env::current_dir()?;
            let path = artifact.write_into(&dir)?;
            eprintln!(
                "  {} {}",
                "Wrote".yellow(),
                path.display().to_string().yellow().bold()
            );
            eprintln!(
                "{}",
                "  Commit this file to the website repository to publish the change.".yellow()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_to_keeps_unset_fields() {
        let base = EventDraft::new("Vespers", "2025-03-09")
            .with_time("18:00")
            .with_location("Nave");
        let args = EventArgs {
            title: Some("Great Vespers".into()),
            location: Some(String::new()),
            ..Default::default()
        };

        let draft = args.apply_to(base);

        assert_eq!(draft.title.as_deref(), Some("Great Vespers"));
        assert_eq!(draft.date.as_deref(), Some("2025-03-09"));
        assert_eq!(draft.time.as_deref(), Some("18:00"));
        assert_eq!(draft.location.as_deref(), Some(""));
    }
}
