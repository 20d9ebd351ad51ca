//! Scope stack threaded through one synthesis traversal.
//!
//! Mirrors the upstream [`ScopeTree`](bml_core::ScopeTree) as the traversal
//! descends: the global scope is fixed for the run, the dialogue scope is set
//! while a dialogue block is lowered, and nested function/block scopes are
//! pushed and popped around the subtrees that introduce them.

use bml_core::ScopeId;

#[derive(Debug, Clone)]
pub struct ScopeStack {
    global: ScopeId,
    dialogue: Option<ScopeId>,
    frames: Vec<ScopeId>,
}

impl ScopeStack {
    pub fn new(global: ScopeId) -> Self {
        Self {
            global,
            dialogue: None,
            frames: Vec::new(),
        }
    }

    pub fn global(&self) -> ScopeId {
        self.global
    }

    pub fn dialogue(&self) -> Option<ScopeId> {
        self.dialogue
    }

    /// Innermost scope: the top frame, else the dialogue scope, else global.
    pub fn current(&self) -> ScopeId {
        self.frames
            .last()
            .copied()
            .or(self.dialogue)
            .unwrap_or(self.global)
    }

    pub fn push(&mut self, scope: ScopeId) {
        self.frames.push(scope);
    }

    pub fn pop(&mut self) -> Option<ScopeId> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enter a dialogue block. Frames pushed for the previous block must have
    /// been popped.
    pub fn enter_dialogue(&mut self, scope: ScopeId) {
        debug_assert!(self.frames.is_empty(), "dialogue entered with open frames");
        self.dialogue = Some(scope);
    }

    pub fn leave_dialogue(&mut self) {
        self.dialogue = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_falls_back_outwards() {
        let mut stack = ScopeStack::new(ScopeId(0));
        assert_eq!(stack.current(), ScopeId(0));

        stack.enter_dialogue(ScopeId(1));
        assert_eq!(stack.current(), ScopeId(1));

        stack.push(ScopeId(2));
        stack.push(ScopeId(3));
        assert_eq!(stack.current(), ScopeId(3));
        assert_eq!(stack.pop(), Some(ScopeId(3)));
        assert_eq!(stack.current(), ScopeId(2));
        stack.pop();

        stack.leave_dialogue();
        assert_eq!(stack.current(), ScopeId(0));
        assert_eq!(stack.dialogue(), None);
    }
}
