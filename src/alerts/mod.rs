use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use log::{debug, info};
use ureq::Response;

use crate::utils::{agent, progress_bar};

use self::{asana::NewTask, env::SyncSettings, github::Alert};

mod asana;
mod cursor;
mod env;
mod github;

#[derive(Debug, Clone, Args)]
pub struct SyncArgs {
    /// File holding the time of the last successful sync
    #[arg(short, long, default_value = "last_run.txt")]
    pub cursor: PathBuf,
    /// How far back to look when there is no cursor file yet
    #[arg(long, default_value_t = 24)]
    pub lookback_hours: i64,
    /// List the tickets that would be created without creating them
    #[arg(long)]
    pub dry_run: bool,
}

pub fn main(args: SyncArgs) -> Result<()> {
    let started = Utc::now();
    let settings = SyncSettings::from_env()?;
    let since = cursor::load(&args.cursor, started, args.lookback_hours)?;
    info!(
        "Checking {} for alerts created after {since}",
        settings.github.repo
    );

    let agent = agent();
    let alerts = github::open_alerts(&agent, &settings.github)?;
    let total = alerts.len();
    let new = created_after(alerts, since);
    debug!("{} open alerts, {} new", total, new.len());

    if new.is_empty() {
        info!("No new alerts found");
    } else if args.dry_run {
        for alert in &new {
            let task = NewTask::from_alert(alert, &settings.asana);
            info!("Would create: {}", task.name);
        }
    } else {
        info!("Found {} new alerts, creating tickets...", new.len());
        let pb = progress_bar(new.len() as u64);
        for alert in &new {
            let task = NewTask::from_alert(alert, &settings.asana);
            let created = asana::create_task(&agent, &settings.asana, &task).with_context(|| {
                format!(
                    "Failed to create ticket for alert {}",
                    alert.number.map(|x| x.to_string()).unwrap_or_default()
                )
            })?;
            debug!(
                "Created task {} {}",
                created.gid,
                created.permalink_url.as_deref().unwrap_or_default()
            );
            pb.inc(1);
        }
        pb.finish();
        info!("Ticket creation completed successfully");
    }

    if !args.dry_run {
        cursor::save(&args.cursor, started)?;
    }

    Ok(())
}

/// Alerts created strictly after `since`, in the order received. Alerts
/// without a creation time are never new.
fn created_after(alerts: Vec<Alert>, since: DateTime<Utc>) -> Vec<Alert> {
    alerts
        .into_iter()
        .filter(|x| x.created_at.is_some_and(|at| at > since))
        .collect()
}

/// Turns any non-2xx reply into an error carrying the status and body.
fn check(api: &str, result: Result<Response, ureq::Error>) -> Result<Response> {
    match result {
        Ok(response) => Ok(response),
        Err(ureq::Error::Status(code, response)) => {
            bail!(
                "{api} API failed ({code}): {}",
                response.into_string().unwrap_or_default()
            )
        }
        Err(e) => Err(e).with_context(|| format!("{api} API request failed")),
    }
}
