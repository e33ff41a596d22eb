use eframe::egui;
use std::collections::VecDeque;

use crate::document::Document;

// ============================================================================
// HISTORY MANAGER — linear undo/redo over full document snapshots
// ============================================================================

/// Upper bound on retained snapshots; the oldest entry is dropped first.
pub const MAX_HISTORY_ENTRIES: usize = 50;

/// One committed edit: a full immutable copy of the document plus a label
/// for the history panel.
#[derive(Clone)]
pub struct HistoryEntry {
    pub document: Document,
    pub description: String,
}

/// Linear undo/redo stack: a sequence of snapshots plus a cursor.
///
/// This is deliberately NOT a command/patch system — documents here are small
/// (a handful of layers, image pixels behind `Arc`), so a full snapshot per
/// discrete edit is cheap and makes undo trivially correct. Continuous
/// interactions (drag in progress, slider held) mutate the live document
/// without committing; one snapshot lands on the interaction's end event.
pub struct HistoryManager {
    entries: VecDeque<HistoryEntry>,
    /// Index of the current state within `entries`. Always valid.
    cursor: usize,
    max_entries: usize,
}

impl HistoryManager {
    /// Seed the history with the initial document as the first snapshot.
    pub fn new(initial: Document) -> Self {
        Self::with_capacity(initial, MAX_HISTORY_ENTRIES)
    }

    pub fn with_capacity(initial: Document, max_entries: usize) -> Self {
        let mut entries = VecDeque::new();
        entries.push_back(HistoryEntry {
            document: initial,
            description: t!("history.initial"),
        });
        Self {
            entries,
            cursor: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Commit a new snapshot: any redoable future after the cursor is
    /// discarded, the snapshot is appended and becomes current, and the
    /// oldest entries are dropped past `max_entries`.
    pub fn commit(&mut self, document: Document, description: impl Into<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(HistoryEntry {
            document,
            description: description.into(),
        });
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one snapshot and return it as the new current state.
    /// No-op at the oldest entry.
    pub fn undo(&mut self) -> Option<&Document> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor].document)
    }

    /// Step forward one snapshot. No-op at the newest entry.
    pub fn redo(&mut self) -> Option<&Document> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor].document)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The snapshot the cursor points at.
    pub fn current(&self) -> &Document {
        &self.entries[self.cursor].document
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entry descriptions newest-first, with the cursor position marked.
    pub fn descriptions(&self) -> Vec<(String, bool)> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .map(|(i, e)| (e.description.clone(), i == self.cursor))
            .collect()
    }

    /// Reset to a single snapshot (e.g. when switching screens).
    pub fn reset(&mut self, initial: Document) {
        self.entries.clear();
        self.entries.push_back(HistoryEntry {
            document: initial,
            description: t!("history.initial"),
        });
        self.cursor = 0;
    }
}

// ============================================================================
// HISTORY PANEL — read-only list of committed edits
// ============================================================================

#[derive(Default)]
pub struct HistoryPanel;

impl HistoryPanel {
    pub fn show(&mut self, ui: &mut egui::Ui, history: &HistoryManager) {
        ui.label(format!(
            "{} / {}",
            history.cursor() + 1,
            history.len()
        ));
        egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
            for (desc, is_current) in history.descriptions() {
                if is_current {
                    ui.label(egui::RichText::new(format!("▶ {}", desc)).strong().size(11.0));
                } else {
                    ui.label(egui::RichText::new(format!("  {}", desc)).weak().size(11.0));
                }
            }
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DEFAULT_HEIGHT, DEFAULT_WIDTH};

    fn doc() -> Document {
        Document::blank(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    fn doc_with_bg(bg: &str) -> Document {
        doc().with_background(bg)
    }

    #[test]
    fn seeded_with_initial_snapshot() {
        let history = HistoryManager::new(doc_with_bg("#111111"));
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current().background, "#111111");
    }

    #[test]
    fn undo_n_times_returns_initial_redo_returns_final() {
        let mut history = HistoryManager::new(doc_with_bg("#000000"));
        for i in 1..=5 {
            history.commit(doc_with_bg(&format!("#{:06}", i)), "Background");
        }
        for _ in 0..5 {
            assert!(history.undo().is_some());
        }
        assert_eq!(history.current().background, "#000000");
        assert!(history.undo().is_none(), "no-op past the oldest entry");
        for _ in 0..5 {
            assert!(history.redo().is_some());
        }
        assert_eq!(history.current().background, "#000005");
        assert!(history.redo().is_none(), "no-op past the newest entry");
    }

    #[test]
    fn commit_after_undo_discards_redo_future() {
        let mut history = HistoryManager::new(doc_with_bg("init"));
        history.commit(doc_with_bg("a"), "A");
        history.commit(doc_with_bg("b"), "B");
        history.undo();
        assert_eq!(history.current().background, "a");
        history.commit(doc_with_bg("c"), "C");
        assert!(history.redo().is_none(), "redo future was discarded");
        assert_eq!(history.current().background, "c");
        history.undo();
        assert_eq!(history.current().background, "a");
    }

    #[test]
    fn retention_cap_drops_oldest_first() {
        let mut history = HistoryManager::new(doc_with_bg("init"));
        for i in 0..MAX_HISTORY_ENTRIES + 10 {
            history.commit(doc_with_bg(&format!("{}", i)), "edit");
        }
        assert_eq!(history.len(), MAX_HISTORY_ENTRIES);
        // Walk all the way back: the oldest retained entry is no longer "init".
        while history.undo().is_some() {}
        assert_ne!(history.current().background, "init");
        assert_eq!(history.current().background, "10");
    }

    #[test]
    fn snapshots_are_independent_of_live_edits() {
        let mut history = HistoryManager::new(doc());
        let live = history.current().with_shape_layer();
        history.commit(live.clone(), "Add Shape");
        // Mutating a further derived document must not affect the snapshot.
        let id = live.layers[0].id.clone();
        let _ = live.without_layer(&id);
        assert_eq!(history.current().layers.len(), 1);
    }
}
