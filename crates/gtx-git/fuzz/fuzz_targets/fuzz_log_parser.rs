// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

#![no_main]

//! Fuzz target for git output parsing
//!
//! Arbitrary text fed to the log, graph, tree, stat and branch parsers must
//! produce either records or errors, never panics.

use libfuzzer_sys::fuzz_target;

use gtx_git::branch::parse_branch_list;
use gtx_git::tree::{BinaryTypes, parse_tree, process_stat, stat_target};
use gtx_git::LogFormat;

fuzz_target!(|text: &str| {
    let format = LogFormat::with_separator("|");
    for line in text.lines() {
        let _ = format.parse_line(line);
        let _ = stat_target(line);
    }
    let _ = format.parse_graph(text);
    let _ = parse_tree(text);
    let _ = process_stat(text, &BinaryTypes::new());
    let _ = parse_branch_list(text);
});
