//! Visibility sentinel driving infinite scroll.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAction {
    LoadMore,
    Unobserve,
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfiniteScroll {
    observing: bool,
}

impl Default for InfiniteScroll {
    fn default() -> Self {
        Self { observing: true }
    }
}

impl InfiniteScroll {
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    pub fn on_visible(&mut self, has_more: bool) -> ScrollAction {
        if !self.observing {
            return ScrollAction::Ignore;
        }
        if has_more {
            ScrollAction::LoadMore
        } else {
            self.observing = false;
            ScrollAction::Unobserve
        }
    }

    /// After a fresh load observation resumes if there is more to fetch.
    pub fn after_load(&mut self, has_more: bool) {
        self.observing = has_more;
    }

    pub fn after_append(&mut self, has_more: bool) {
        if !has_more {
            self.observing = false;
        }
    }
}
