//! Loaders for the pull request, branch and diff sections.
//!
//! Failures never leave this module: the section is replaced by an error
//! message and the rest of the page carries on.

use tracing::{debug, warn};

use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::models::github::{Branch, Diff, PullRequest};
use crate::render::sections::{
    render_branch, render_diff, render_error_message, render_pull_request,
};
use crate::ui::deploy_form::DiffQuery;
use crate::ui::views::SectionView;

pub const PULL_REQUESTS_ERROR: &str =
    "Something went wrong while fetching pull requests from GitHub";
pub const BRANCHES_ERROR: &str = "Something went wrong while fetching branch status from GitHub";
pub const DIFF_ERROR: &str = "Something went wrong while fetching the diff from GitHub";

pub async fn load_pull_requests(client: &HttpClient, path: &str, view: &mut dyn SectionView) {
    let result = client.get_json::<Vec<PullRequest>>(path).await;
    show_pull_requests(view, result);
}

pub async fn load_branches(client: &HttpClient, path: &str, view: &mut dyn SectionView) {
    let result = client.get_json::<Vec<Branch>>(path).await;
    show_branches(view, result);
}

pub async fn load_diff(
    client: &HttpClient,
    diff_path: &str,
    query: &DiffQuery,
    view: &mut dyn SectionView,
) {
    let result = client.get_json::<Option<Diff>>(&query.to_path(diff_path)).await;
    show_diff(view, result);
}

pub fn show_pull_requests(
    view: &mut dyn SectionView,
    result: Result<Vec<PullRequest>, ConsoleError>,
) {
    match result {
        Ok(pulls) => {
            debug!("Loaded {} pull requests", pulls.len());
            for pull in &pulls {
                view.append(&render_pull_request(pull));
            }
        }
        Err(e) => {
            warn!("Failed to load pull requests: {}", e);
            view.replace_with(&render_error_message(PULL_REQUESTS_ERROR));
        }
    }
}

pub fn show_branches(view: &mut dyn SectionView, result: Result<Vec<Branch>, ConsoleError>) {
    match result {
        Ok(branches) => {
            debug!("Loaded {} branches", branches.len());
            for branch in &branches {
                view.append(&render_branch(branch));
            }
        }
        Err(e) => {
            warn!("Failed to load branches: {}", e);
            view.replace_with(&render_error_message(BRANCHES_ERROR));
        }
    }
}

/// The diff container is emptied first; it only ever shows one diff
pub fn show_diff(view: &mut dyn SectionView, result: Result<Option<Diff>, ConsoleError>) {
    view.clear();
    match result {
        Ok(Some(diff)) => view.append(&render_diff(&diff)),
        Ok(None) => debug!("No diff for the selected commit"),
        Err(e) => {
            warn!("Failed to load diff: {}", e);
            view.append(&render_error_message(DIFF_ERROR));
        }
    }
}
