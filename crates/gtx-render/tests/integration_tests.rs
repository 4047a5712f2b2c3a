// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Integration tests for gtx-render
//!
//! These tests render full pages through the embedded template.

use chrono::DateTime;
use gtx_git::{Author, BinaryTypes, Branch, Commit, Diff, Object, Overview};
use gtx_render::{Page, Renderer};

const PARENT: &str = "c460aeb7fb2d109c17e43de0ce681faec0b7374d";
const HASH: &str = "1945ab9c752534e733c38ba0109dc3b741f0a6eb";

fn sample_commit() -> Commit {
    Commit {
        hash: HASH.to_string(),
        abbr: "1945ab9".to_string(),
        parents: vec![PARENT.to_string()],
        author: Author {
            name: "Test Author".to_string(),
            email: "test@example.com".to_string(),
        },
        date: DateTime::parse_from_rfc2822("Sat, 17 Jan 2026 02:33:06 +0100").expect("date"),
        subject: "Update foo <again>".to_string(),
        body: "Update foo <again>\n\nWith a body.".to_string(),
        tree: vec![
            Object {
                hash: "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".to_string(),
                path: "foo.txt".to_string(),
            },
            Object {
                hash: "5716ca5987cbf97d6bb54920bea6adde242d87e6".to_string(),
                path: "img/logo.png".to_string(),
            },
        ],
        history: vec![Overview {
            body: "foo.txt | 3 ++-\n1 file changed, 2 insertions(+), 1 deletion(-)".to_string(),
            hash: HASH.to_string(),
            parent: PARENT.to_string(),
        }],
    }
}

fn renderer() -> Renderer {
    Renderer::new().expect("default template")
}

#[test]
fn test_diff_page_links_hunk_lines() {
    let renderer = renderer();
    let diff = Diff {
        body: "\
diff --git a/foo.txt b/foo.txt
index 1111111..2222222 100644
--- a/foo.txt
+++ b/foo.txt
@@ -3,2 +3,3 @@
 context
-old
+new
+newer
"
        .to_string(),
        hash: HASH.to_string(),
        parent: PARENT.to_string(),
    };
    let page = Page::diff("Jimbo", "main", &sample_commit(), &diff, renderer.annotator());
    let html = renderer.render(&page).expect("render");

    assert!(html.contains("<title>Jimbo: main: 1945ab9</title>"));
    assert!(html.contains("<base href=\"../../\">"));
    assert!(html.contains(&format!("<a href=\"commit/{PARENT}/foo.txt.html#L3\">3</a>,2")));
    assert!(html.contains(&format!("<a href=\"commit/{HASH}/foo.txt.html#L3\">3</a>,3")));
    assert!(html.contains("<a id=\"foo.txt\">foo.txt</a>"));
    assert!(html.contains("<del>-old</del>"));
    assert!(html.contains("<ins>+newer</ins>"));
    assert!(html.contains("<em>index</em>"));
}

#[test]
fn test_commit_page() {
    let renderer = renderer();
    let types = BinaryTypes::new();
    types.record(".png", true);
    let page = Page::commit("Jimbo", "main", &sample_commit(), &types, renderer.annotator());
    let html = renderer.render(&page).expect("render");

    assert!(html.contains("<h2>Update foo &lt;again&gt;</h2>"));
    assert!(html.contains(&format!(
        "<a href=\"commit/{HASH}/diff-to-{PARENT}.html#foo.txt\">3</a>"
    )));
    assert!(html.contains(&format!("<a href=\"commit/{HASH}/foo.txt.html\">foo.txt</a>")));
    assert!(html.contains(&format!(
        "<a href=\"commit/{HASH}/img/logo.png\" download>img/logo.png</a>"
    )));
    assert!(html.contains(&format!("commit/{HASH}/diff-to-{PARENT}.html\">diff</a>")));
}

#[test]
fn test_index_and_branch_pages() {
    let renderer = renderer();
    let branches = vec![
        Branch {
            name: "main".to_string(),
            commits: vec![sample_commit()],
            graph: vec![],
        },
        Branch {
            name: "feature/empty".to_string(),
            commits: vec![],
            graph: vec![],
        },
    ];

    let index = renderer
        .render(&Page::index("Jimbo", &branches, Some("https://host.net/jimbo.git")))
        .expect("render");
    assert!(index.contains("<base href=\"./\">"));
    assert!(index.contains("git clone https://host.net/jimbo.git"));
    assert!(index.contains("<a href=\"branch/main/index.html\">main</a>"));
    assert!(index.contains(&format!("<a href=\"commit/{HASH}/index.html\">1945ab9</a>")));
    assert!(index.contains("No commits"));

    let branch = renderer
        .render(&Page::branch("Jimbo", &branches[1]))
        .expect("render");
    assert!(branch.contains("<title>Jimbo: feature/empty</title>"));
    assert!(branch.contains("<base href=\"../../../\">"));
}

#[test]
fn test_object_page_numbers_lines() {
    let renderer = renderer();
    let object = Object {
        hash: "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".to_string(),
        path: "foo.txt".to_string(),
    };
    let html = renderer
        .render(&Page::object("Jimbo", &object, b"one\n<two>\nthree\n"))
        .expect("render");

    assert!(html.contains("<title>Jimbo: e69de29</title>"));
    assert!(html.contains("id=\"L1\""));
    assert!(html.contains("id=\"L3\""));
    assert!(!html.contains("id=\"L4\""));
    assert!(html.contains("&lt;two&gt;"));
}
