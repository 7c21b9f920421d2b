//! Per-file classification of target sources into compatibility classes.

use super::family::CompatibilityClass;
use super::scanner::{scan_targets, TargetDeclaration};
use std::collections::BTreeSet;
use tracing::debug;

/// A target whose sources mix incompatible language families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationRecord {
    /// GN file the target lives in.
    pub file: String,
    /// Target name.
    pub target: String,
    /// Every classified source of the mixing source lists, sorted and
    /// de-duplicated.
    pub sources: Vec<String>,
    /// Classes seen, in first-seen order.
    pub classes: Vec<CompatibilityClass>,
}

/// Scans a GN file and returns one record per target that mixes sources.
///
/// Records come back in target-declaration order. Targets without sources,
/// or whose sources all share one compatibility class, produce nothing.
#[must_use]
pub fn classify(file_path: &str, content: &str) -> Vec<ViolationRecord> {
    scan_targets(content)
        .iter()
        .filter_map(|target| classify_target(file_path, target))
        .collect()
}

fn classify_target(file_path: &str, target: &TargetDeclaration) -> Option<ViolationRecord> {
    let mut offending = BTreeSet::new();
    let mut classes = Vec::new();

    for group in &target.source_groups {
        let classified: Vec<(&str, CompatibilityClass)> = group
            .iter()
            .filter_map(|s| CompatibilityClass::of_path(s).map(|c| (s.as_str(), c)))
            .collect();

        let mut group_classes = Vec::new();
        for (_, class) in &classified {
            if !group_classes.contains(class) {
                group_classes.push(*class);
            }
        }

        if group_classes.len() < 2 {
            continue;
        }

        for class in group_classes {
            if !classes.contains(&class) {
                classes.push(class);
            }
        }
        offending.extend(classified.into_iter().map(|(s, _)| s.to_string()));
    }

    if offending.is_empty() {
        return None;
    }

    debug!(
        "{file_path}: target {} mixes {}",
        target.name,
        classes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    Some(ViolationRecord {
        file: file_path.to_string(),
        target: target.name.clone(),
        sources: offending.into_iter().collect(),
        classes,
    })
}
