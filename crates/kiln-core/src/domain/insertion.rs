//! Idempotent code-fragment insertion.
//!
//! Insertion is a two step affair:
//!
//! 1. [`filter_existing`] drops every fragment whose whitespace-normalized
//!    lines already appear, consecutively, somewhere in the content.
//! 2. [`insert_fragments`] walks the content once and, above every marker
//!    line, emits that marker's remaining fragments in declaration order.
//!
//! Step 1 is what makes re-running a scaffold a no-op on files it already
//! touched.

use crate::domain::marker::{CodeFragmentsMap, Marker};

/// Keep only fragments keyed by a marker the inserter declared.
pub fn valid_code_fragments(markers: &[Marker], fragments: CodeFragmentsMap) -> CodeFragmentsMap {
    fragments
        .into_iter()
        .filter(|(marker, _)| markers.contains(marker))
        .collect()
}

/// Remove fragments that are already present in `content`.
///
/// A fragment of N lines matches if some window of N consecutive content
/// lines equals it line by line after trimming. Markers left without
/// fragments are removed from the map.
pub fn filter_existing(content: &str, fragments: &mut CodeFragmentsMap) {
    let lines: Vec<&str> = content.lines().map(str::trim).collect();

    for pending in fragments.values_mut() {
        pending.retain(|fragment| !contains_fragment(&lines, fragment));
    }
    fragments.retain(|_, pending| !pending.is_empty());
}

/// Whether the (trimmed) content lines already contain `fragment`.
///
/// Blank fragments count as present: inserting them would change nothing
/// worth tracking.
pub fn contains_fragment(lines: &[&str], fragment: &str) -> bool {
    let needle: Vec<&str> = fragment.trim().lines().map(str::trim).collect();
    if needle.is_empty() {
        return true;
    }
    lines
        .windows(needle.len())
        .any(|window| window == needle.as_slice())
}

/// Emit every fragment right above its marker line.
///
/// A fragment lacking a trailing newline gets one, so the marker always keeps
/// a line of its own. Every line in the output is newline-terminated.
pub fn insert_fragments(content: &str, fragments: &CodeFragmentsMap) -> String {
    let extra: usize = fragments.values().flatten().map(|f| f.len() + 1).sum();
    let mut out = String::with_capacity(content.len() + extra + 1);

    for line in content.lines() {
        for (marker, pending) in fragments {
            if marker.equals_line(line) {
                for fragment in pending {
                    out.push_str(fragment);
                    if !fragment.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
        }
        out.push_str(line);
        out.push('\n');
    }

    out
}

/// Filter then insert. Returns `None` when nothing is left to insert, so the
/// caller can leave the content untouched.
pub fn merge_fragments(
    content: &str,
    markers: &[Marker],
    fragments: CodeFragmentsMap,
) -> Option<String> {
    let mut pending = valid_code_fragments(markers, fragments);
    filter_existing(content, &mut pending);
    if pending.is_empty() {
        return None;
    }
    Some(insert_fragments(content, &pending))
}
