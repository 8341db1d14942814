use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use parishcal_core::auth::{AuthGate, SharedSecretGate};

use crate::context::Context;

pub fn login(ctx: &mut Context) -> Result<()> {
    if ctx.session.is_admin() {
        println!("{}", "  Already logged in as admin".dimmed());
        return Ok(());
    }

    let gate = SharedSecretGate::new(ctx.config.admin_secret.clone());
    let password = rpassword::prompt_password("  Admin password: ")?;

    if !gate.verify(&password)? {
        anyhow::bail!("Incorrect password");
    }

    let ttl = ctx.config.session_ttl()?;
    ctx.session.grant_admin(Utc::now(), ttl);
    ctx.save_session()?;

    println!("{}", "  Logged in as admin".green());
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    ctx.session_file.clear()?;
    println!("{}", "  Logged out".dimmed());
    Ok(())
}
