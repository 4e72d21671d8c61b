//! Running segmentation state.

/// Page, section and table counters threaded through one segmentation pass.
///
/// Every transition consumes the state and returns the next one, so a pass
/// is a fold over the input and no state outlives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentState {
    /// Current page (1-indexed, never decreases)
    pub page: u32,

    /// Current item number, sticky until the next section heading
    pub item: Option<String>,

    /// Next unused table index
    pub next_table: usize,

    /// Table block currently open (text filings only)
    pub open_table: Option<usize>,
}

impl SegmentState {
    /// State at the start of a document.
    pub fn new() -> Self {
        Self {
            page: 1,
            item: None,
            next_table: 1,
            open_table: None,
        }
    }

    /// Advance to the next page.
    pub fn page_break(mut self) -> Self {
        self.page += 1;
        self
    }

    /// Enter a new section.
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    /// Allocate the next table index.
    pub fn take_table_index(mut self) -> (Self, usize) {
        let index = self.next_table;
        self.next_table += 1;
        (self, index)
    }

    /// Open a table block using the next unused index without consuming it.
    pub fn open_table(mut self) -> Self {
        self.open_table = Some(self.next_table);
        self
    }

    /// Close the open table block and retire its index. A stray close
    /// leaves the counter untouched.
    pub fn close_table(mut self) -> Self {
        if self.open_table.take().is_some() {
            self.next_table += 1;
        }
        self
    }
}

impl Default for SegmentState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SegmentState::new();
        assert_eq!(state.page, 1);
        assert_eq!(state.item, None);
        assert_eq!(state.next_table, 1);
    }

    #[test]
    fn test_transitions() {
        let state = SegmentState::new().page_break().with_item("7A");
        assert_eq!(state.page, 2);
        assert_eq!(state.item.as_deref(), Some("7A"));

        let (state, first) = state.take_table_index();
        let (state, second) = state.take_table_index();
        assert_eq!((first, second), (1, 2));
        assert_eq!(state.next_table, 3);
    }

    #[test]
    fn test_table_block() {
        let state = SegmentState::new().open_table();
        assert_eq!(state.open_table, Some(1));
        let state = state.close_table().open_table();
        assert_eq!(state.open_table, Some(2));
    }

    #[test]
    fn test_stray_close_keeps_counter() {
        let state = SegmentState::new().close_table().close_table();
        assert_eq!(state.next_table, 1);
        assert_eq!(state.open_table, None);
    }
}
