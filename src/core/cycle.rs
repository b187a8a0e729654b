//! # Dependency-cycle validation.
//!
//! Pure depth-first check over the *proposed* dependency graph (existing
//! edges with the new registration's edges applied). Run before a record is
//! committed, so a rejected registration leaves the registry untouched.
//!
//! Classic visiting/done coloring with an explicit path stack: revisiting a
//! node that is still on the current path closes a cycle, and the error
//! names the full path including the repeated node.

use std::collections::{HashMap, HashSet};

use crate::error::RegistryError;

/// Validates that the graph reachable from `start` is acyclic.
///
/// `edges` maps each worker name to its dependencies; names without an entry
/// have no outgoing edges (depending on a not-yet-registered name is allowed
/// and resolved at start time).
pub(crate) fn check_acyclic(
    edges: &HashMap<String, Vec<String>>,
    start: &str,
) -> Result<(), RegistryError> {
    let mut path: Vec<String> = Vec::new();
    let mut on_path: HashSet<String> = HashSet::new();
    let mut done: HashSet<String> = HashSet::new();
    visit(edges, start, &mut path, &mut on_path, &mut done)
}

fn visit(
    edges: &HashMap<String, Vec<String>>,
    node: &str,
    path: &mut Vec<String>,
    on_path: &mut HashSet<String>,
    done: &mut HashSet<String>,
) -> Result<(), RegistryError> {
    if on_path.contains(node) {
        let first = path.iter().position(|n| n == node).unwrap_or(0);
        let mut cycle: Vec<String> = path[first..].to_vec();
        cycle.push(node.to_string());
        return Err(RegistryError::Cycle { path: cycle });
    }
    if done.contains(node) {
        return Ok(());
    }

    path.push(node.to_string());
    on_path.insert(node.to_string());

    if let Some(deps) = edges.get(node) {
        for dep in deps {
            visit(edges, dep, path, on_path, done)?;
        }
    }

    path.pop();
    on_path.remove(node);
    done.insert(node.to_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let g = edges(&[("c", &["c"])]);
        let err = check_acyclic(&g, "c").unwrap_err();
        let RegistryError::Cycle { path } = err;
        assert_eq!(path, vec!["c", "c"]);
    }

    #[test]
    fn two_node_cycle_reports_full_path() {
        let g = edges(&[("a", &["b"]), ("b", &["a"])]);
        let err = check_acyclic(&g, "a").unwrap_err();
        let RegistryError::Cycle { path } = err;
        assert_eq!(path, vec!["a", "b", "a"]);
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        // a -> b -> d, a -> c -> d: d reached twice, never on-path twice.
        let g = edges(&[("a", &["b", "c"]), ("b", &["d"]), ("c", &["d"]), ("d", &[])]);
        assert!(check_acyclic(&g, "a").is_ok());
    }

    #[test]
    fn unregistered_dependency_is_allowed() {
        let g = edges(&[("a", &["ghost"])]);
        assert!(check_acyclic(&g, "a").is_ok());
    }

    #[test]
    fn deep_cycle_behind_a_chain() {
        let g = edges(&[("a", &["b"]), ("b", &["c"]), ("c", &["b"])]);
        let err = check_acyclic(&g, "a").unwrap_err();
        let RegistryError::Cycle { path } = err;
        assert_eq!(path, vec!["b", "c", "b"]);
    }
}
