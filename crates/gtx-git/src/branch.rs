// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Branch discovery and whitelist filtering

use tracing::debug;

use crate::error::GitError;
use crate::gateway::Vcs;

/// List the working copy's branches and apply `whitelist`
///
/// With an empty whitelist every discovered branch is returned in discovery
/// order. Otherwise the result follows whitelist order and names git does not
/// know are dropped.
///
/// # Errors
///
/// Returns `GitError` only if the branch listing itself fails.
pub async fn resolve(vcs: &dyn Vcs, whitelist: &[String]) -> Result<Vec<String>, GitError> {
    let listing = vcs.list_branches().await?;
    let discovered = parse_branch_list(&listing);
    debug!(count = discovered.len(), "Discovered branches");
    Ok(filter_branches(discovered, whitelist))
}

/// Bare branch names from `git branch -a --format=%(refname)` output
///
/// Local and remote-tracking refs collapse onto one name, first one wins. The
/// symbolic `HEAD` entry and anything that is not a ref (a detached HEAD line)
/// are skipped.
#[must_use]
pub fn parse_branch_list(listing: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for line in listing.lines() {
        let Some(name) = bare_name(line.trim()) else {
            continue;
        };
        if name == "HEAD" || name.is_empty() {
            continue;
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    names
}

fn bare_name(refname: &str) -> Option<&str> {
    if let Some(local) = refname.strip_prefix("refs/heads/") {
        return Some(local);
    }
    // refs/remotes/<remote>/<branch...>
    let remote = refname.strip_prefix("refs/remotes/")?;
    remote.split_once('/').map(|(_, name)| name)
}

/// Keep the branches named in `whitelist`, in whitelist order
///
/// An empty whitelist keeps everything.
#[must_use]
pub fn filter_branches(discovered: Vec<String>, whitelist: &[String]) -> Vec<String> {
    if whitelist.is_empty() {
        return discovered;
    }

    let mut result: Vec<String> = Vec::new();
    for wanted in whitelist {
        if discovered.contains(wanted) && !result.contains(wanted) {
            result.push(wanted.clone());
        } else if !discovered.contains(wanted) {
            debug!(branch = %wanted, "Ignoring unknown branch");
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_string()).collect()
    }

    const LISTING: &str = "\
refs/heads/main
refs/remotes/origin/HEAD
refs/remotes/origin/develop
refs/remotes/origin/experimental
refs/remotes/origin/main
refs/remotes/origin/feature/login
";

    #[test]
    fn test_parse_strips_prefixes_and_head() {
        assert_eq!(
            parse_branch_list(LISTING),
            names(&["main", "develop", "experimental", "feature/login"])
        );
    }

    #[test]
    fn test_parse_skips_detached_head() {
        let listing = "(HEAD detached at 1a2b3c4)\nrefs/remotes/origin/main\n";
        assert_eq!(parse_branch_list(listing), names(&["main"]));
    }

    #[test]
    fn test_parse_empty_listing() {
        assert!(parse_branch_list("").is_empty());
    }

    #[test]
    fn test_filter_follows_whitelist_order() {
        let discovered = names(&["develop", "experimental", "main"]);
        let whitelist = names(&["main", "develop"]);
        assert_eq!(
            filter_branches(discovered, &whitelist),
            names(&["main", "develop"])
        );
    }

    #[test]
    fn test_filter_empty_whitelist_keeps_discovery_order() {
        let discovered = names(&["main", "develop", "experimental"]);
        assert_eq!(filter_branches(discovered.clone(), &[]), discovered);
    }

    #[test]
    fn test_filter_drops_unknown_names() {
        let discovered = names(&["main", "develop"]);
        let whitelist = names(&["release", "develop"]);
        assert_eq!(
            filter_branches(discovered, &whitelist),
            names(&["develop"])
        );
    }

    #[test]
    fn test_filter_nothing_matches() {
        let discovered = names(&["main"]);
        assert!(filter_branches(discovered, &names(&["gone"])).is_empty());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn branch_names() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::hash_set("[a-z]{1,8}", 0..8)
            .prop_map(|set| set.into_iter().filter(|n| n != "HEAD").collect())
    }

    proptest! {
        /// Property: the filtered list is a subsequence of the whitelist
        #[test]
        fn prop_filter_preserves_whitelist_order(
            discovered in branch_names(),
            whitelist in proptest::collection::vec("[a-z]{1,8}", 0..8)
        ) {
            let result = filter_branches(discovered.clone(), &whitelist);
            let mut cursor = whitelist.iter();
            for name in &result {
                prop_assert!(discovered.contains(name));
                prop_assert!(cursor.any(|w| w == name));
            }
        }

        /// Property: every listed ref comes back exactly once
        #[test]
        fn prop_parse_round_trips_remote_refs(discovered in branch_names()) {
            let listing: String = discovered
                .iter()
                .map(|n| format!("refs/remotes/origin/{n}\n"))
                .collect();
            prop_assert_eq!(parse_branch_list(&listing), discovered);
        }
    }
}
