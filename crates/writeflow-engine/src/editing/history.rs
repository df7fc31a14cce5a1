/// Linear undo/redo history of full-text snapshots.
///
/// Both stacks keep the most recent snapshot last. With a limit set, the
/// oldest undo snapshots are dropped once the limit is exceeded.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo: Vec<String>,
    redo: Vec<String>,
    limit: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record the text as it was before a forward edit.
    pub fn record(&mut self, snapshot: String) {
        push_bounded(&mut self.undo, snapshot, self.limit);
    }

    pub fn clear_redo(&mut self) {
        self.redo.clear();
    }

    /// Step back: `current` becomes the previous snapshot and its old value
    /// moves to the redo stack. Returns false when there is nothing to undo.
    pub fn undo(&mut self, current: &mut String) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        let replaced = std::mem::replace(current, previous);
        push_bounded(&mut self.redo, replaced, self.limit);
        true
    }

    /// Step forward again after an undo. Returns false when there is nothing to redo.
    pub fn redo(&mut self, current: &mut String) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let replaced = std::mem::replace(current, next);
        push_bounded(&mut self.undo, replaced, self.limit);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

fn push_bounded(stack: &mut Vec<String>, snapshot: String, limit: Option<usize>) {
    stack.push(snapshot);
    if let Some(limit) = limit
        && stack.len() > limit
    {
        let excess = stack.len() - limit;
        stack.drain(..excess);
    }
}
