use std::fmt;

use dradis_search_config::{ConnectionSettings, MatchField};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::types::Issue;
use crate::DradisClient;

/// An issue whose searched field contains the term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub project_id: u64,
    pub issue_id: u64,
    pub title: String,
    pub url: String,
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.url, self.title)
    }
}

/// Case-insensitive substring test.
pub fn matches(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(&term.to_lowercase())
}

pub struct SearchEngine<'a> {
    client: &'a DradisClient,
    settings: &'a ConnectionSettings,
    field: MatchField,
}

impl<'a> SearchEngine<'a> {
    pub fn new(client: &'a DradisClient, settings: &'a ConnectionSettings, field: MatchField) -> Self {
        Self {
            client,
            settings,
            field,
        }
    }

    /// Walk every project and its issues in API order, collecting matches.
    /// The first failed request aborts the whole search.
    pub async fn search(&self, term: &str) -> Result<Vec<Match>> {
        info!("Getting projects from Dradis...");
        let projects = self.client.list_projects().await?;

        info!(
            projects = projects.len(),
            "Getting issues and searching for term \"{}\"...", term
        );

        let mut results = Vec::new();

        for project in &projects {
            let issues = self.client.list_issues(project.id).await?;
            debug!(project_id = project.id, issues = issues.len(), "Fetched issues");

            for issue in &issues {
                if matches(self.searched_text(issue), term) {
                    results.push(self.to_match(project.id, issue));
                }
            }
        }

        Ok(results)
    }

    fn searched_text<'i>(&self, issue: &'i Issue) -> &'i str {
        match self.field {
            MatchField::Title => &issue.title,
            MatchField::Text => &issue.text,
        }
    }

    fn to_match(&self, project_id: u64, issue: &Issue) -> Match {
        Match {
            project_id,
            issue_id: issue.id,
            title: issue.title.clone(),
            url: self
                .settings
                .resource_url(&format!("projects/{}/issues/{}", project_id, issue.id)),
        }
    }
}
