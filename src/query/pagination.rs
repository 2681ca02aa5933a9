use std::num::NonZeroU32;

use crate::error::{MosqueError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Page(NonZeroU32);

impl Page {
    pub const FIRST: Page = Page(NonZeroU32::MIN);

    pub fn new(page: u32) -> Result<Self> {
        NonZeroU32::new(page)
            .map(Page)
            .ok_or_else(|| MosqueError::validation("page numbers start at 1"))
    }

    /// Lenient form for raw request input: absent or non-positive pages are
    /// the first page, pages past `u32::MAX` saturate (and come back empty).
    pub fn clamped(raw: Option<i64>) -> Self {
        raw.filter(|p| *p >= 1)
            .map(|p| u32::try_from(p).unwrap_or(u32::MAX))
            .and_then(NonZeroU32::new)
            .map(Page)
            .unwrap_or(Page::FIRST)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::FIRST
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: Page, page_size: u32) -> Self {
        Self {
            skip: (page.get() as u64 - 1) * page_size as u64,
            limit: page_size,
        }
    }

    pub fn for_page(page: Page) -> Self {
        Self::new(page, DEFAULT_PAGE_SIZE)
    }
}
