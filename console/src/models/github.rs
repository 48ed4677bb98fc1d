//! Read-only views over the GitHub payloads the dashboard displays

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GitHub account as embedded in commits and pull requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub login: String,

    #[serde(default)]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitCommitter {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetails {
    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub committer: CommitCommitter,
}

/// A commit as returned by the branches and compare endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub author: Option<User>,

    #[serde(default)]
    pub sha: String,

    #[serde(default)]
    pub html_url: String,

    #[serde(default)]
    pub commit: CommitDetails,
}

impl Commit {
    /// First line of the commit message
    pub fn message(&self) -> &str {
        self.commit.message.split('\n').next().unwrap_or_default()
    }

    /// Everything after the first line, if there is anything
    pub fn message_body(&self) -> Option<String> {
        let lines: Vec<&str> = self.commit.message.split('\n').collect();
        if lines.len() < 2 {
            return None;
        }
        Some(lines[1..].join("\n"))
    }

    pub fn sha(&self) -> &str {
        &self.sha
    }

    pub fn short_sha(&self) -> &str {
        let end = self
            .sha
            .char_indices()
            .nth(6)
            .map(|(i, _)| i)
            .unwrap_or(self.sha.len());
        &self.sha[..end]
    }

    pub fn user_name(&self) -> &str {
        self.author.as_ref().map(|a| a.login.as_str()).unwrap_or_default()
    }

    pub fn user_avatar_url(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.avatar_url.as_str())
            .unwrap_or_default()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.commit.committer.date
    }

    pub fn html_url(&self) -> &str {
        &self.html_url
    }
}

/// A branch with its head commit and optional CI badge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub commit: Commit,

    #[serde(default)]
    pub travis_image_url: String,

    #[serde(default)]
    pub travis_image_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestHead {
    #[serde(default, rename = "ref")]
    pub branch: String,

    #[serde(default)]
    pub sha: String,
}

/// An open pull request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub id: i64,

    #[serde(default)]
    pub html_url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub user: Option<User>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub head: PullRequestHead,

    #[serde(default)]
    pub travis_image_url: String,

    #[serde(default)]
    pub travis_image_link: String,
}

/// Comparison between the deployed commit and a candidate sha
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    #[serde(default)]
    pub html_url: String,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub ahead_by: i64,

    #[serde(default)]
    pub behind_by: i64,

    #[serde(default)]
    pub commits: Vec<Commit>,
}
