use crate::components::history::HistoryManager;
use crate::document::Document;

/// The single editor instance's shared mutable state: the live document plus
/// its undo/redo history. Passed by `&mut` into the panels that edit it —
/// there is no ambient/global editor state.
pub struct EditorProject {
    /// The live document. During a continuous interaction this may be ahead
    /// of the latest history snapshot.
    pub document: Document,
    pub history: HistoryManager,
}

impl EditorProject {
    pub fn new(initial: Document) -> Self {
        Self {
            document: initial.clone(),
            history: HistoryManager::new(initial),
        }
    }

    /// Visual-only update: replace the live document WITHOUT committing.
    /// Used for rapid continuous edits (drag in progress, slider held, text
    /// composition) so history grows by one entry per user intent, not one
    /// per pixel of motion.
    pub fn apply_visual(&mut self, next: Document) {
        self.document = next;
    }

    /// Committing update: replace the live document and push one snapshot.
    pub fn commit(&mut self, next: Document, description: impl Into<String>) {
        self.document = next.clone();
        self.history.commit(next, description);
    }

    /// Push the live document as a snapshot — the end event of a continuous
    /// interaction whose visual-only updates already landed in `document`.
    pub fn commit_current(&mut self, description: impl Into<String>) {
        self.history.commit(self.document.clone(), description);
    }

    pub fn undo(&mut self) -> bool {
        if let Some(doc) = self.history.undo() {
            self.document = doc.clone();
            true
        } else {
            false
        }
    }

    pub fn redo(&mut self) -> bool {
        if let Some(doc) = self.history.redo() {
            self.document = doc.clone();
            true
        } else {
            false
        }
    }

    /// Replace everything with a new document (template load, AI layout) as
    /// one committed step.
    pub fn replace_document(&mut self, next: Document, description: impl Into<String>) {
        self.commit(next, description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DEFAULT_HEIGHT, DEFAULT_WIDTH};

    #[test]
    fn visual_updates_do_not_touch_history() {
        let mut project = EditorProject::new(Document::blank(DEFAULT_WIDTH, DEFAULT_HEIGHT));
        let next = project.document.with_shape_layer();
        project.apply_visual(next);
        assert_eq!(project.document.layers.len(), 1);
        assert!(!project.history.can_undo());
    }

    #[test]
    fn commit_current_captures_the_live_state() {
        let mut project = EditorProject::new(Document::blank(DEFAULT_WIDTH, DEFAULT_HEIGHT));
        let next = project.document.with_shape_layer();
        project.apply_visual(next);
        project.commit_current("Move Layer");
        assert!(project.history.can_undo());
        assert!(project.undo());
        assert_eq!(project.document.layers.len(), 0);
        assert!(project.redo());
        assert_eq!(project.document.layers.len(), 1);
    }

    #[test]
    fn undo_restores_pre_replace_document() {
        let mut project = EditorProject::new(Document::blank(DEFAULT_WIDTH, DEFAULT_HEIGHT));
        let replacement = Document::blank(1080, 1920).with_background("#0f172a");
        project.replace_document(replacement, "Load Template");
        assert_eq!(project.document.height, 1920);
        assert!(project.undo());
        assert_eq!(project.document.height, DEFAULT_HEIGHT);
        assert_eq!(project.document.background, "#ffffff");
    }
}
