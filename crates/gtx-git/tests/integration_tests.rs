// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Integration tests for gtx-git
//!
//! These tests drive branch resolution and history extraction through the
//! in-memory gateway with canned git output.

use std::sync::Arc;

use gtx_git::branch;
use gtx_git::memory::MemoryVcs;
use gtx_git::{BinaryTypes, Extractor, GitError, LogFormat};
use similar_asserts::assert_eq;

const SEP: &str = "6f6c1745-e902-474a-9e99-08d0084fb011";

fn hash(c: char) -> String {
    c.to_string().repeat(40)
}

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_string()).collect()
}

/// A log line in the extractor's field order
fn log_line(h: &str, parents: &[String], subject: &str, date: &str) -> String {
    [
        h.to_string(),
        parents.join(" "),
        subject.to_string(),
        "Test Author".to_string(),
        "test@example.com".to_string(),
        date.to_string(),
        h[..7].to_string(),
    ]
    .join(SEP)
}

/// Canned responses for one commit's body and tree
fn commit_fixture(vcs: &MemoryVcs, h: &str, message: &str, tree: &str) {
    vcs.respond(
        &["show", "--no-patch", "--no-notes", "--format=%B", h],
        format!("{message}\n\n"),
    );
    vcs.respond(
        &["ls-tree", "-r", "--format=%(objectname) %(path)", h],
        tree.to_string(),
    );
}

fn respond_log(vcs: &MemoryVcs, branch: &str, lines: &[String]) {
    let format = LogFormat::with_separator(SEP);
    let log_arg = format!("--format={}", format.format());
    let reference = format!("origin/{branch}");
    let mut output = lines.join("\n");
    output.push('\n');
    vcs.respond(&["log", &log_arg, &reference], output);
}

fn extractor(vcs: &Arc<MemoryVcs>, types: &BinaryTypes) -> Extractor {
    Extractor::new(vcs.clone(), types.clone()).with_format(LogFormat::with_separator(SEP))
}

#[tokio::test]
async fn test_resolve_branches_with_whitelist() {
    let vcs = MemoryVcs::new();
    vcs.respond(
        &["branch", "-a", "--format=%(refname)"],
        "refs/heads/main\nrefs/remotes/origin/HEAD\nrefs/remotes/origin/develop\nrefs/remotes/origin/experimental\nrefs/remotes/origin/main\n",
    );

    let filtered = branch::resolve(&vcs, &names(&["main", "develop"]))
        .await
        .expect("resolve");
    assert_eq!(filtered, names(&["main", "develop"]));

    let all = branch::resolve(&vcs, &[]).await.expect("resolve");
    assert_eq!(all, names(&["main", "develop", "experimental"]));
}

#[tokio::test]
async fn test_resolve_fails_when_listing_fails() {
    let vcs = MemoryVcs::new();
    let result = branch::resolve(&vcs, &names(&["main"])).await;
    assert!(matches!(result, Err(GitError::Command { .. })));
}

#[tokio::test]
async fn test_extract_keeps_order_and_drops_bad_dates() {
    let vcs = Arc::new(MemoryVcs::new());
    let (a, b, c) = (hash('a'), hash('b'), hash('c'));

    respond_log(
        &vcs,
        "main",
        &[
            log_line(&c, &[b.clone()], "Third", "Wed, 3 Jan 2024 10:00:00 +0000"),
            log_line(&b, &[a.clone()], "Second", "not a date"),
            log_line(&a, &[], "First", "Mon, 1 Jan 2024 10:00:00 +0000"),
        ],
    );
    commit_fixture(&vcs, &a, "First\n\nBody of first", &format!("{} a.txt\n", hash('1')));
    commit_fixture(&vcs, &b, "Second", &format!("{} a.txt\n", hash('2')));
    commit_fixture(&vcs, &c, "Third", &format!("{} a.txt\n", hash('3')));
    vcs.respond(
        &["diff", "--stat", &format!("{b}..{c}")],
        " a.txt | 2 +-\n 1 file changed, 1 insertion(+), 1 deletion(-)\n",
    );

    let types = BinaryTypes::new();
    let commits = extractor(&vcs, &types)
        .extract("main")
        .await
        .expect("extract");

    let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
    assert_eq!(subjects, vec!["Third", "First"]);

    let first = &commits[1];
    assert!(first.is_root());
    assert_eq!(first.body, "First\n\nBody of first");
    assert_eq!(first.tree.len(), 1);
    assert_eq!(first.abbr, "aaaaaaa");

    let third = &commits[0];
    assert_eq!(third.history.len(), 1);
    assert_eq!(
        third.history[0].body,
        "a.txt | 2 +-\n1 file changed, 1 insertion(+), 1 deletion(-)"
    );
}

#[tokio::test]
async fn test_extract_drops_commit_with_failing_tree() {
    let vcs = Arc::new(MemoryVcs::new());
    let (a, b) = (hash('a'), hash('b'));

    respond_log(
        &vcs,
        "main",
        &[
            log_line(&b, &[a.clone()], "Second", "Tue, 2 Jan 2024 10:00:00 +0000"),
            log_line(&a, &[], "First", "Mon, 1 Jan 2024 10:00:00 +0000"),
        ],
    );
    commit_fixture(&vcs, &a, "First", &format!("{} a.txt\n", hash('1')));
    vcs.respond(
        &["show", "--no-patch", "--no-notes", "--format=%B", &b],
        "Second\n",
    );

    let commits = extractor(&vcs, &BinaryTypes::new())
        .extract("main")
        .await
        .expect("extract");

    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].hash, a);
}

#[tokio::test]
async fn test_merge_commit_keeps_overviews_that_succeed() {
    let vcs = Arc::new(MemoryVcs::new());
    let (a, b, m) = (hash('a'), hash('b'), hash('d'));

    respond_log(
        &vcs,
        "main",
        &[log_line(
            &m,
            &[a.clone(), b.clone()],
            "Merge develop",
            "Thu, 4 Jan 2024 10:00:00 +0000",
        )],
    );
    commit_fixture(&vcs, &m, "Merge develop", &format!("{} a.txt\n", hash('1')));
    vcs.respond(&["diff", "--stat", &format!("{a}..{m}")], " a.txt | 1 +\n");

    let commits = extractor(&vcs, &BinaryTypes::new())
        .extract("main")
        .await
        .expect("extract");

    assert_eq!(commits.len(), 1);
    let merge = &commits[0];
    assert!(merge.is_merge());
    assert_eq!(merge.parents.len(), 2);
    assert_eq!(merge.history.len(), 1);
    assert!(merge.overview(&a).is_some());
    assert!(merge.overview(&b).is_none());
}

#[tokio::test]
async fn test_binary_extensions_recorded_during_extraction() {
    let vcs = Arc::new(MemoryVcs::new());
    let (a, b) = (hash('a'), hash('b'));

    respond_log(
        &vcs,
        "main",
        &[
            log_line(&b, &[a.clone()], "Add logo", "Tue, 2 Jan 2024 10:00:00 +0000"),
            log_line(&a, &[], "First", "Mon, 1 Jan 2024 10:00:00 +0000"),
        ],
    );
    commit_fixture(&vcs, &a, "First", &format!("{} README\n", hash('1')));
    commit_fixture(
        &vcs,
        &b,
        "Add logo",
        &format!("{} README\n{} img/logo.png\n", hash('1'), hash('2')),
    );
    vcs.respond(
        &["diff", "--stat", &format!("{a}..{b}")],
        " img/logo.png | Bin 0 -> 2048 bytes\n 1 file changed, 0 insertions(+), 0 deletions(-)\n",
    );

    let types = BinaryTypes::new();
    let ex = extractor(&vcs, &types);
    ex.extract("main").await.expect("extract");

    assert!(types.is_binary_path("other/place/icon.png"));
    assert!(ex.resolver().types().is_binary(".png"));
    assert!(!types.is_binary_path("README"));
}

#[tokio::test]
async fn test_branch_without_graph_still_extracts() {
    let vcs = Arc::new(MemoryVcs::new());
    let a = hash('a');
    respond_log(
        &vcs,
        "main",
        &[log_line(&a, &[], "First", "Mon, 1 Jan 2024 10:00:00 +0000")],
    );
    commit_fixture(&vcs, &a, "First", &format!("{} a.txt\n", hash('1')));

    let branch = extractor(&vcs, &BinaryTypes::new())
        .branch("main")
        .await
        .expect("branch");

    assert_eq!(branch.name, "main");
    assert_eq!(branch.commits.len(), 1);
    assert!(branch.graph.is_empty());
    assert_eq!(branch.latest().map(|c| c.hash.as_str()), Some(a.as_str()));
}

#[tokio::test]
async fn test_branch_graph_rows() {
    let vcs = Arc::new(MemoryVcs::new());
    let a = hash('a');
    respond_log(
        &vcs,
        "main",
        &[log_line(&a, &[], "First", "Mon, 1 Jan 2024 10:00:00 +0000")],
    );
    commit_fixture(&vcs, &a, "First", "");
    vcs.respond(
        &["log", "--graph", &format!("--format={SEP}%H"), "origin/main"],
        format!("* {SEP}{a}\n"),
    );

    let branch = extractor(&vcs, &BinaryTypes::new())
        .branch("main")
        .await
        .expect("branch");

    assert_eq!(branch.graph.len(), 1);
    assert_eq!(branch.graph[0].graph, "*");
    assert_eq!(branch.graph[0].hash.as_deref(), Some(a.as_str()));
    assert!(branch.commits[0].tree.is_empty());
}

#[tokio::test]
async fn test_extract_fails_when_log_fails() {
    let vcs = Arc::new(MemoryVcs::new());
    let result = extractor(&vcs, &BinaryTypes::new()).extract("missing").await;
    assert!(result.is_err());
}
