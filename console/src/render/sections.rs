//! Templates for the pull request, branch and diff sections

use crate::models::github::{Branch, Commit, Diff, PullRequest};
use crate::render::{html_escape, newline_to_break};

/// Alert shown in place of a section that failed to load
pub fn render_error_message(message: &str) -> String {
    format!(
        r#"<div class="alert alert-danger" role="alert">{}</div>"#,
        html_escape(message)
    )
}

pub fn render_pull_request(pull: &PullRequest) -> String {
    let (login, avatar) = pull
        .user
        .as_ref()
        .map(|u| (u.login.as_str(), u.avatar_url.as_str()))
        .unwrap_or_default();

    format!(
        concat!(
            r#"<li class="list-group-item pull-request" data-pull-request-id="{id}">"#,
            r#"<img class="avatar" src="{avatar}" alt="{login}"/> "#,
            r#"<a href="{url}">{title}</a> "#,
            r#"<code>{branch}</code>{travis}"#,
            r#"<button class="btn btn-xs btn-default deploy-pull-request" data-pull-request-head-sha="{sha}" data-pull-request-head-ref="{branch}">Deploy</button>"#,
            r#"</li>"#
        ),
        id = pull.id,
        avatar = html_escape(avatar),
        login = html_escape(login),
        url = html_escape(&pull.html_url),
        title = html_escape(&pull.title),
        branch = html_escape(&pull.head.branch),
        sha = html_escape(&pull.head.sha),
        travis = render_travis(&pull.travis_image_url, &pull.travis_image_link),
    )
}

pub fn render_branch(branch: &Branch) -> String {
    format!(
        concat!(
            r#"<li class="list-group-item branch">"#,
            r#"<strong>{name}</strong>{travis} "#,
            r#"{commit}"#,
            r#"<button class="btn btn-xs btn-default deploy-branch" data-branch-sha="{sha}" data-branch-name="{name}">Deploy</button>"#,
            r#"</li>"#
        ),
        name = html_escape(&branch.name),
        travis = render_travis(&branch.travis_image_url, &branch.travis_image_link),
        commit = render_commit(&branch.commit),
        sha = html_escape(branch.commit.sha()),
    )
}

pub fn render_diff(diff: &Diff) -> String {
    let commits: String = diff.commits.iter().map(render_commit).collect();
    format!(
        concat!(
            r#"<div class="diff">"#,
            r#"<p><a href="{url}">{ahead} ahead, {behind} behind</a></p>"#,
            r#"<ul class="list-unstyled diff-commits">{commits}</ul>"#,
            r#"</div>"#
        ),
        url = html_escape(&diff.html_url),
        ahead = diff.ahead_by,
        behind = diff.behind_by,
        commits = commits,
    )
}

fn render_commit(commit: &Commit) -> String {
    let body = match commit.message_body() {
        Some(body) => format!(
            r##" <a href="#" data-action="toggle-full-message">&hellip;</a><div class="message-body hidden">{}</div>"##,
            newline_to_break(&body)
        ),
        None => String::new(),
    };
    let updated = commit
        .updated_at()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    format!(
        concat!(
            r#"<div class="commit">"#,
            r#"<a href="{url}"><code>{short_sha}</code></a> "#,
            r#"<span class="message">{message}</span>{body} "#,
            r#"<img class="avatar avatar-small" src="{avatar}" alt="{user}"/> "#,
            r#"<span class="commit-user">{user}</span> "#,
            r#"<time>{updated}</time>"#,
            r#"</div>"#
        ),
        url = html_escape(commit.html_url()),
        short_sha = html_escape(commit.short_sha()),
        message = html_escape(commit.message()),
        body = body,
        avatar = html_escape(commit.user_avatar_url()),
        user = html_escape(commit.user_name()),
        updated = updated,
    )
}

fn render_travis(image_url: &str, image_link: &str) -> String {
    if image_url.is_empty() {
        return String::new();
    }
    format!(
        r#" <a href="{}"><img class="travis-badge" src="{}" alt="build status"/></a>"#,
        html_escape(image_link),
        html_escape(image_url)
    )
}
