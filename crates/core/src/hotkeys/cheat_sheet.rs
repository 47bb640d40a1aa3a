//! Cheat sheet data for the active context chain.
//!
//! Only data is produced here; rendering belongs to the caller.

use std::collections::HashSet;

use keygrid_config::constants::HIDDEN_GROUP;

use super::context::HotkeyContext;

/// One binding as listed on the cheat sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheatSheetEntry {
    /// Name of the context declaring the binding.
    pub context: String,
    pub triggers: Vec<String>,
    pub description: String,
}

/// Entries sharing a `<group>` label, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheatSheetGroup {
    pub label: String,
    pub entries: Vec<CheatSheetEntry>,
}

/// Collect entries from innermost to outermost context.
///
/// Hidden bindings are skipped, as are outer bindings whose triggers are all
/// shadowed by an inner one.
pub(crate) fn collect<'a, A: 'a>(
    chain: impl IntoIterator<Item = &'a HotkeyContext<A>>,
) -> Vec<CheatSheetGroup> {
    let mut groups: Vec<CheatSheetGroup> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for context in chain {
        for binding in &context.bindings {
            if binding.description.group() == HIDDEN_GROUP {
                continue;
            }
            let triggers: Vec<String> = binding
                .triggers
                .iter()
                .map(|t| t.source().to_string())
                .collect();
            if triggers.iter().all(|t| seen.contains(t)) {
                continue;
            }
            seen.extend(triggers.iter().cloned());

            let entry = CheatSheetEntry {
                context: context.name.clone(),
                triggers,
                description: binding.description.text().to_string(),
            };
            let label = binding.description.group();
            match groups.iter_mut().find(|g| g.label == label) {
                Some(group) => group.entries.push(entry),
                None => groups.push(CheatSheetGroup {
                    label: label.to_string(),
                    entries: vec![entry],
                }),
            }
        }
    }

    groups
}
