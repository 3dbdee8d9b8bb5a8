//! Search focus forwarding.
//!
//! The header owns the search element; its parent only sees a [`SearchRef`].
//! The handle stays valid across re-attachments, and calls made while nothing
//! is attached are dropped.

use std::cell::RefCell;
use std::rc::Rc;

/// Text selection reported by the search input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionChange {
    pub start: usize,
    pub end: Option<usize>,
}

/// What the search element lets its parent do.
pub trait SearchCapability {
    fn focus(&mut self);
    fn apply_selection_change(&mut self, change: SelectionChange);
}

/// Stable handle to the currently attached search element.
#[derive(Clone, Default)]
pub struct SearchRef {
    target: Rc<RefCell<Option<Box<dyn SearchCapability>>>>,
}

impl SearchRef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `target`, replacing any previous one.
    pub fn attach(&self, target: impl SearchCapability + 'static) {
        *self.target.borrow_mut() = Some(Box::new(target));
    }

    pub fn detach(&self) {
        self.target.borrow_mut().take();
    }

    pub fn is_attached(&self) -> bool {
        self.target.borrow().is_some()
    }

    /// Returns `false` if nothing received the call.
    pub fn focus(&self) -> bool {
        self.with_target(|t| t.focus())
    }

    /// Returns `false` if nothing received the call.
    pub fn apply_selection_change(&self, change: SelectionChange) -> bool {
        self.with_target(|t| t.apply_selection_change(change))
    }

    fn with_target(&self, f: impl FnOnce(&mut Box<dyn SearchCapability>)) -> bool {
        // A target calling back into its own handle is ignored.
        let Ok(mut slot) = self.target.try_borrow_mut() else {
            tracing::debug!("search ref busy, call dropped");
            return false;
        };
        match slot.as_mut() {
            Some(target) => {
                f(target);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for SearchRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchRef")
            .field("attached", &self.is_attached())
            .finish()
    }
}
