use std::fmt::Write;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use ureq::Agent;

use super::{check, env::AsanaSettings, github::Alert};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub name: String,
    pub notes: String,
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
    pub due_on: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTask {
    pub gid: String,
    pub permalink_url: Option<String>,
}

impl NewTask {
    pub fn from_alert(alert: &Alert, settings: &AsanaSettings) -> Self {
        let created = alert
            .created_at
            .map(|x| x.to_rfc3339())
            .unwrap_or_else(|| "unknown".to_string());

        let mut notes = String::new();
        // writing to a String cannot fail
        let _ = writeln!(notes, "Package: {}", alert.package().unwrap_or("Unknown package"));
        let _ = writeln!(
            notes,
            "Severity: {}",
            capitalize(alert.severity().unwrap_or("Unknown severity"))
        );
        let _ = writeln!(notes, "First seen: {created}");
        let _ = writeln!(notes, "Alert URL: {}", alert.html_url.as_deref().unwrap_or("none"));
        let _ = writeln!(notes);
        let _ = write!(
            notes,
            "Description: {}",
            alert.description().unwrap_or("No description available")
        );

        Self {
            name: format!(
                "Dependabot Alert: {}",
                alert.summary().unwrap_or("Unknown vulnerability")
            ),
            notes,
            projects: vec![settings.project.clone()],
            workspace: settings.workspace.clone(),
            due_on: None,
        }
    }
}

pub fn create_task(agent: &Agent, settings: &AsanaSettings, task: &NewTask) -> Result<CreatedTask> {
    let response = check(
        "Asana",
        agent
            .post(&format!("{}/tasks", settings.api.trim_end_matches('/')))
            .set("Authorization", &format!("Bearer {}", settings.token))
            .set("Accept", "application/json")
            .send_json(Envelope { data: task }),
    )?;

    let status = response.status();
    if !(200..300).contains(&status) {
        bail!(
            "Asana API failed ({status}): {}",
            response.into_string().unwrap_or_default()
        );
    }

    let created: Envelope<CreatedTask> = response
        .into_json()
        .context("Failed to parse Asana task response")?;
    Ok(created.data)
}

/// First letter upper case, the rest lower case.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
