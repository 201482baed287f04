use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use ureq::Agent;

use super::{check, env::GitHubSettings};

#[derive(Debug, Clone, Deserialize)]
pub struct Alert {
    pub number: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
    pub security_advisory: Option<Advisory>,
    pub security_vulnerability: Option<Vulnerability>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Advisory {
    pub summary: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Vulnerability {
    pub package: Option<Package>,
    pub severity: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    pub name: Option<String>,
}

impl Alert {
    pub fn summary(&self) -> Option<&str> {
        self.security_advisory.as_ref()?.summary.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.security_advisory.as_ref()?.description.as_deref()
    }

    pub fn package(&self) -> Option<&str> {
        self.security_vulnerability
            .as_ref()?
            .package
            .as_ref()?
            .name
            .as_deref()
    }

    pub fn severity(&self) -> Option<&str> {
        self.security_vulnerability.as_ref()?.severity.as_deref()
    }
}

/// Every open alert of the repository, following `Link: rel="next"` until
/// the last page.
pub fn open_alerts(agent: &Agent, settings: &GitHubSettings) -> Result<Vec<Alert>> {
    let mut url = Some(format!(
        "{}/repos/{}/dependabot/alerts?state=open&per_page=100",
        settings.api.trim_end_matches('/'),
        settings.repo
    ));
    let auth = format!("Bearer {}", settings.token);

    let mut alerts = Vec::new();
    let mut page = 0;
    while let Some(next) = url {
        page += 1;
        debug!("Fetching alerts page {page}: {next}");
        let response = check(
            "GitHub",
            agent
                .get(&next)
                .set("Authorization", &auth)
                .set("Accept", "application/vnd.github+json")
                .call(),
        )?;

        url = response.header("link").and_then(next_link);
        let batch: Vec<Alert> = response
            .into_json()
            .with_context(|| format!("Failed to parse alerts page {page}"))?;
        alerts.extend(batch);
    }

    Ok(alerts)
}

/// Extracts the `rel="next"` target from an RFC 8288 `Link` header.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';').map(str::trim);
        let target = parts.next()?.strip_prefix('<')?.strip_suffix('>')?;
        let is_next = parts.any(|param| {
            param
                .strip_prefix("rel=")
                .map(|x| x.trim_matches('"').split_whitespace().any(|x| x == "next"))
                .unwrap_or(false)
        });
        is_next.then(|| target.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_link_header() {
        let header = r#"<https://api.github.com/repositories/1/dependabot/alerts?state=open&page=2>; rel="next", <https://api.github.com/repositories/1/dependabot/alerts?state=open&page=5>; rel="last""#;
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://api.github.com/repositories/1/dependabot/alerts?state=open&page=2")
        );

        let last_page = r#"<https://api.github.com/x?page=1>; rel="first", <https://api.github.com/x?page=4>; rel="prev""#;
        assert_eq!(next_link(last_page), None);

        assert_eq!(next_link(""), None);
        assert_eq!(next_link("garbage; rel=\"next\""), None);
        assert_eq!(
            next_link("<https://x/?after=abc>; rel=\"prefetch next\"").as_deref(),
            Some("https://x/?after=abc")
        );
    }

    #[test]
    fn parse_alert() {
        let alerts: Vec<Alert> = serde_json::from_str(
            r#"[
                {
                    "number": 7,
                    "state": "open",
                    "created_at": "2024-05-01T09:30:00Z",
                    "html_url": "https://github.com/acme/widgets/security/dependabot/7",
                    "security_advisory": {
                        "ghsa_id": "GHSA-xxxx",
                        "summary": "Prototype pollution in lodash",
                        "description": "Versions before 4.17.21 are affected."
                    },
                    "security_vulnerability": {
                        "package": {"ecosystem": "npm", "name": "lodash"},
                        "severity": "high"
                    }
                },
                {"number": 8, "created_at": null, "security_advisory": null}
            ]"#,
        )
        .unwrap();

        let a = &alerts[0];
        assert_eq!(a.number, Some(7));
        assert_eq!(a.summary(), Some("Prototype pollution in lodash"));
        assert_eq!(a.package(), Some("lodash"));
        assert_eq!(a.severity(), Some("high"));
        assert_eq!(
            a.created_at.unwrap().to_rfc3339(),
            "2024-05-01T09:30:00+00:00"
        );

        let b = &alerts[1];
        assert_eq!(b.created_at, None);
        assert_eq!(b.summary(), None);
        assert_eq!(b.package(), None);
    }
}
