//! New deployment form: picking a commit to deploy

use crate::models::github::{Branch, PullRequest};

/// Length of a full git sha; shorter input is still being typed
pub const FULL_SHA_LEN: usize = 40;

/// Query for the diff between the deployed commit and a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffQuery {
    pub sha: String,
    pub target: String,
}

impl DiffQuery {
    /// Append the query string to the diff endpoint path
    pub fn to_path(&self, diff_path: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("sha", &self.sha)
            .append_pair("target", &self.target)
            .finish();
        format!("{}?{}", diff_path, query)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployForm {
    pub commit_sha: String,
    pub branch: String,
    pub target: String,
}

impl DeployForm {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    /// Fill the form from a pull request's head
    pub fn select_pull_request(&mut self, pull: &PullRequest) -> Option<DiffQuery> {
        self.branch = pull.head.branch.clone();
        self.set_commit_sha(&pull.head.sha)
    }

    /// Fill the form from a branch's head commit
    pub fn select_branch(&mut self, branch: &Branch) -> Option<DiffQuery> {
        self.branch = branch.name.clone();
        self.set_commit_sha(branch.commit.sha())
    }

    /// Change the deployment target; the diff has to be fetched again
    pub fn select_target(&mut self, target: impl Into<String>) -> Option<DiffQuery> {
        self.target = target.into();
        self.diff_query()
    }

    /// Update the sha field. Returns the diff to fetch once the sha is
    /// complete.
    pub fn set_commit_sha(&mut self, sha: &str) -> Option<DiffQuery> {
        self.commit_sha = sha.trim().to_string();
        self.diff_query()
    }

    pub fn diff_query(&self) -> Option<DiffQuery> {
        if self.commit_sha.len() < FULL_SHA_LEN {
            return None;
        }
        Some(DiffQuery {
            sha: self.commit_sha.clone(),
            target: self.target.clone(),
        })
    }
}
