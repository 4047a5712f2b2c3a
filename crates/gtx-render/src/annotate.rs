// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! HTML annotation of unified diffs and diff-stats
//!
//! Both annotators work on raw git output. Each line is classified first and
//! only the pieces copied into the output are escaped, so markup inserted here
//! never passes through the escaper and escaped text is never re-parsed.
//!
//! Links are relative to the site root; pages set `<base href>` accordingly.
//! Repository paths inside links are percent-encoded per segment with
//! [`href_path`].

use handlebars::html_escape;
use regex::Regex;

use gtx_git::tree::stat_target;

use crate::error::RenderError;

/// Metadata lines following a `diff --git` header
const KEYWORD_PATTERN: &str = r"^(deleted|index|new|rename|similarity)";

/// `@@ -a[,b] +c[,d] @@ context`
const HUNK_PATTERN: &str = r"^@@ -(\d+)(,\d+)? \+(\d+)(,\d+)? @@(.*)$";

/// Compiled patterns for diff annotation
#[derive(Debug, Clone)]
pub struct Annotator {
    keyword: Regex,
    hunk: Regex,
}

impl Annotator {
    /// Compile the annotation patterns
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Pattern` if a pattern fails to compile.
    pub fn new() -> Result<Self, RenderError> {
        Ok(Self {
            keyword: Regex::new(KEYWORD_PATTERN)?,
            hunk: Regex::new(HUNK_PATTERN)?,
        })
    }

    /// Annotate the body of `git diff -p parent..hash`
    ///
    /// File headers become bold with an anchor on the post-change path, hunk
    /// headers link their start lines to the object pages of either side, and
    /// removed and added lines are wrapped in `<del>` and `<ins>`.
    #[must_use]
    pub fn diff_body(&self, body: &str, hash: &str, parent: &str) -> String {
        let mut old: Option<String> = None;
        let mut new: Option<String> = None;
        let mut in_hunk = false;
        let mut out = Vec::new();

        for line in body.trim_end_matches('\n').lines() {
            if line.starts_with("diff ") {
                in_hunk = false;
                old = None;
                new = None;
                out.push(format!("<strong>{}</strong>", file_header(line)));
            } else if !in_hunk && line.starts_with("--- ") {
                old = side_path(&line[4..], "a/");
                out.push(format!("<mark>{}</mark>", html_escape(line)));
            } else if !in_hunk && line.starts_with("+++ ") {
                new = side_path(&line[4..], "b/");
                out.push(format!("<mark>{}</mark>", html_escape(line)));
            } else if line.starts_with("@@") {
                in_hunk = true;
                out.push(self.hunk_header(line, hash, parent, old.as_deref(), new.as_deref()));
            } else if in_hunk && line.starts_with('-') {
                out.push(format!("<del>{}</del>", html_escape(line)));
            } else if in_hunk && line.starts_with('+') {
                out.push(format!("<ins>{}</ins>", html_escape(line)));
            } else if !in_hunk && let Some(m) = self.keyword.find(line) {
                out.push(format!(
                    "<em>{}</em>{}",
                    m.as_str(),
                    html_escape(&line[m.end()..])
                ));
            } else {
                out.push(html_escape(line));
            }
        }

        out.join("\n")
    }

    fn hunk_header(
        &self,
        line: &str,
        hash: &str,
        parent: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> String {
        let Some(caps) = self.hunk.captures(line) else {
            return html_escape(line);
        };
        let group = |i: usize| caps.get(i).map_or("", |m| m.as_str());

        let old_start = match old {
            Some(path) => line_link(parent, path, group(1)),
            None => group(1).to_string(),
        };
        let new_start = match new {
            Some(path) => line_link(hash, path, group(3)),
            None => group(3).to_string(),
        };

        format!(
            "@@ -{}{} +{}{} @@{}",
            old_start,
            group(2),
            new_start,
            group(4),
            html_escape(group(5))
        )
    }

    /// Annotate the trimmed diff-stat computed against `parent`
    ///
    /// Each file line links its change column to the matching file in the
    /// full diff page. Lines without a `|` (the summary) are only escaped.
    #[must_use]
    pub fn diff_stat(&self, body: &str, hash: &str, parent: &str) -> String {
        body.trim_end_matches('\n')
            .lines()
            .map(|line| stat_line(line, hash, parent))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `diff --git a/x b/y` with an anchor on `y`
fn file_header(line: &str) -> String {
    match line.rfind(" b/") {
        Some(i) => {
            let path = &line[i + 3..];
            format!(
                "{} b/<a id=\"{}\">{}</a>",
                html_escape(&line[..i]),
                html_escape(path),
                html_escape(path)
            )
        }
        None => html_escape(line),
    }
}

/// Percent-encode each `/`-separated segment of a repository path
///
/// The result only holds unreserved characters, `%` escapes and `/`, so it is
/// safe in both URLs and HTML attributes.
#[must_use]
pub fn href_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Path named by a `---`/`+++` marker, or `None` for `/dev/null`
fn side_path(marker: &str, prefix: &str) -> Option<String> {
    let marker = marker.trim_end();
    if marker == "/dev/null" {
        return None;
    }
    Some(marker.strip_prefix(prefix).unwrap_or(marker).to_string())
}

fn line_link(commit: &str, path: &str, line: &str) -> String {
    format!(
        "<a href=\"commit/{}/{}.html#L{}\">{}</a>",
        html_escape(commit),
        href_path(path),
        line,
        line
    )
}

fn stat_line(line: &str, hash: &str, parent: &str) -> String {
    let Some((path, change)) = line.split_once('|') else {
        return html_escape(line);
    };

    let target = stat_target(path.trim());
    let trimmed = change.trim_start();
    let indent = &change[..change.len() - trimmed.len()];
    let (count, rest) = match trimmed.split_once(' ') {
        Some((count, rest)) => (count, format!(" {}", html_escape(rest))),
        None => (trimmed, String::new()),
    };

    format!(
        "{}|{}<a href=\"commit/{}/diff-to-{}.html#{}\">{}</a>{}",
        html_escape(path),
        indent,
        html_escape(hash),
        html_escape(parent),
        href_path(&target),
        html_escape(count),
        rest
    )
}
