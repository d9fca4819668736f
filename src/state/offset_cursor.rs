//! Pagination state for the World Community Grid results API

/// Number of records requested per page
pub const PAGE_SIZE: u32 = 250;

/// Distance between consecutive page offsets
///
/// Smaller than [`PAGE_SIZE`], so consecutive windows overlap by
/// `PAGE_SIZE - PAGE_STEP` records. The duplicates are written with the same
/// tags and timestamp and overwrite each other in the store.
pub const PAGE_STEP: u32 = 240;

/// Offset/limit window walking the results listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetCursor {
    offset: u32,
    limit: u32,
    step: u32,
    pages: u32,
}

impl OffsetCursor {
    /// Cursor at offset 0 with the standard window
    pub fn new() -> Self {
        Self::with_window(PAGE_SIZE, PAGE_STEP)
    }

    /// Cursor at offset 0 with a custom window
    pub fn with_window(limit: u32, step: u32) -> Self {
        Self {
            offset: 0,
            limit,
            step,
            pages: 0,
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of times the cursor has advanced
    pub fn pages(&self) -> u32 {
        self.pages
    }

    /// Records shared by two consecutive windows
    pub fn overlap(&self) -> u32 {
        self.limit.saturating_sub(self.step)
    }

    /// Moves to the next window
    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.step);
        self.pages += 1;
    }
}

impl Default for OffsetCursor {
    fn default() -> Self {
        Self::new()
    }
}
