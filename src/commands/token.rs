use anyhow::{Context as _, Result};
use chrono::Utc;
use owo_colors::OwoColorize;
use parishcal_core::session::Credential;

use crate::context::Context;

/// Prompt for a repository token, check it, and keep it for this session.
pub async fn set(ctx: &mut Context) -> Result<()> {
    ctx.require_admin()?;

    let token = rpassword::prompt_password("  GitHub token: ")?;
    let credential = Credential::new(token);
    if credential.expose().is_empty() {
        anyhow::bail!("No token entered");
    }

    let mut store = ctx.base_store();
    ctx.connect(&mut store, credential.clone())
        .await
        .with_context(|| {
            format!(
                "Token was not accepted for {}/{}",
                ctx.config.remote.owner, ctx.config.remote.repo
            )
        })?;

    let ttl = ctx.config.session_ttl()?;
    ctx.session.set_credential(credential, Utc::now(), ttl);
    ctx.save_session()?;

    println!(
        "{}",
        format!(
            "  Token is valid. Changes will sync to {}/{} until you log out.",
            ctx.config.remote.owner, ctx.config.remote.repo
        )
        .green()
    );
    Ok(())
}

pub fn clear(ctx: &mut Context) -> Result<()> {
    ctx.session.clear_credential();
    ctx.save_session()?;
    println!("{}", "  Token cleared".dimmed());
    Ok(())
}
