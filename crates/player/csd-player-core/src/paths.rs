#![allow(dead_code)]
//! Relative-path handling for document and asset references.
//!
//! Paths are opaque strings handed to the [`crate::assets::Assets`]
//! collaborator; this module only normalizes and joins them the way the
//! export format expects (`"./"` prefixes stripped, `".."` segments
//! collapsed against the base, clamped at the base root).

use crate::config::PathStrategy;

/// Strip a leading `"./"` (or bare `"/"`) run. `"../"` prefixes survive.
pub fn clean_path(p: &str) -> &str {
    let rest = p.strip_prefix('.').unwrap_or(p);
    if rest.starts_with('/') {
        rest.trim_start_matches('/')
    } else {
        // A lone "." with no slash after it was not a "./" prefix.
        p
    }
}

/// Directory portion of `path`, trailing separator included. Paths without a
/// separator have an empty directory.
pub fn dir_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    }
}

/// Final path segment.
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Resolve `rel` against the directory of `base`, collapsing `"."` and
/// `".."` segments. Walking past the base root drops the excess `".."`s
/// (URL-resolution semantics). An absolute base keeps its leading slash.
pub fn join_path(base: &str, rel: &str) -> String {
    let rel = clean_path(rel);
    let absolute = base.starts_with('/');

    let mut stack: Vec<&str> = Vec::new();
    for seg in dir_of(base).split('/') {
        if !seg.is_empty() && seg != "." {
            stack.push(seg);
        }
    }
    for seg in rel.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    let joined = stack.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Resolve a document-relative reference against a base directory.
pub fn resolve_relative(p: &str, base: &str) -> String {
    if p.is_empty() {
        return String::new();
    }
    join_path(base, clean_path(p))
}

/// Candidate paths for an atlas descriptor reference, in probe order.
pub fn atlas_candidates(base: &str, reference: &str, strategy: &PathStrategy) -> Vec<String> {
    let rel = clean_path(reference);
    match strategy {
        PathStrategy::RelativeSearch => vec![
            join_path(base, rel),
            join_path(base, &format!("../{rel}")),
            join_path(base, &format!("../../{rel}")),
            rel.to_string(),
        ],
        PathStrategy::FlatDir(dir) => {
            let dir = dir.trim_end_matches('/');
            vec![format!("{dir}/{}", basename(rel))]
        }
    }
}

/// Resolve a plain (non-atlas) texture path per the configured strategy.
pub fn texture_path(base: &str, reference: &str, strategy: &PathStrategy) -> String {
    match strategy {
        PathStrategy::RelativeSearch => resolve_relative(clean_path(reference), base),
        PathStrategy::FlatDir(dir) => {
            let dir = dir.trim_end_matches('/');
            format!("{dir}/{}", basename(clean_path(reference)))
        }
    }
}
