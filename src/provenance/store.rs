/// One history entry: a state snapshot and the action that produced it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ProvenanceEntry<S, A> {
    /// Snapshot, never mutated once pushed.
    pub state: S,
    /// Originating action; `None` for the initial state.
    pub action: Option<A>,
}

/// Append-only, cursor-addressed history of state snapshots.
///
/// The cursor always points at a valid entry. Pushing after an undo drops
/// every entry beyond the cursor.
#[derive(Clone, Debug)]
pub struct Provenance<S, A> {
    history: Vec<ProvenanceEntry<S, A>>,
    cursor: usize,
}

impl<S, A> Provenance<S, A> {
    /// A store holding only `seed`.
    pub fn new(seed: S) -> Self {
        Self {
            history: vec![ProvenanceEntry {
                state: seed,
                action: None,
            }],
            cursor: 0,
        }
    }

    /// Reset the history to a single untagged entry.
    pub fn set_initial_state(&mut self, seed: S) {
        self.history.clear();
        self.history.push(ProvenanceEntry {
            state: seed,
            action: None,
        });
        self.cursor = 0;
    }

    /// Append a snapshot after the cursor, discarding any redo branch.
    pub fn push(&mut self, state: S, action: A) {
        self.history.truncate(self.cursor + 1);
        self.history.push(ProvenanceEntry {
            state,
            action: Some(action),
        });
        self.cursor = self.history.len() - 1;
    }

    /// Step back one entry. A no-op at the initial state.
    pub fn undo(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Snapshot at the cursor.
    pub fn state(&self) -> &S {
        &self.history[self.cursor].state
    }

    /// Every retained entry, oldest first.
    pub fn history(&self) -> &[ProvenanceEntry<S, A>] {
        &self.history
    }

    /// Index of the current entry.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Always `false`: a store holds at least its initial entry.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// `true` when the cursor sits on the initial entry.
    pub fn is_at_initial(&self) -> bool {
        self.cursor == 0
    }

    /// `true` when [`Provenance::undo`] would move the cursor.
    pub fn can_undo(&self) -> bool {
        !self.is_at_initial()
    }

    /// Actions leading from the initial state to the cursor.
    pub fn action_history(&self) -> Vec<&A> {
        self.history[..=self.cursor]
            .iter()
            .filter_map(|e| e.action.as_ref())
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/provenance/store.rs"]
mod tests;
