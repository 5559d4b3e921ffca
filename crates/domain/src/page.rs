use hvacdesk_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Page size assumed when neither the server nor configuration declares one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Returns `max(1, ceil(total_count / page_size))`.
#[must_use]
pub fn total_pages(total_count: usize, page_size: usize) -> u32 {
    let page_size = page_size.max(1);
    let pages = total_count.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of a remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<R> {
    items: Vec<R>,
    total_count: usize,
    page_size: usize,
    page: u32,
}

impl<R> PageResult<R> {
    /// Creates a validated page result.
    pub fn new(items: Vec<R>, total_count: usize, page_size: usize, page: u32) -> AppResult<Self> {
        if page_size == 0 {
            return Err(AppError::Validation(
                "page size must be greater than zero".to_owned(),
            ));
        }

        if page == 0 {
            return Err(AppError::Validation("page numbers start at 1".to_owned()));
        }

        Ok(Self {
            items,
            total_count,
            page_size,
            page,
        })
    }

    /// Creates the page shown when nothing could be loaded.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }

    /// Creates a single page holding every item of an unpaginated list.
    #[must_use]
    pub fn single_page(items: Vec<R>) -> Self {
        let total_count = items.len();
        Self {
            items,
            total_count,
            page_size: total_count.max(DEFAULT_PAGE_SIZE),
            page: 1,
        }
    }

    /// Returns the records on this page.
    #[must_use]
    pub fn items(&self) -> &[R] {
        &self.items
    }

    /// Consumes the page and returns its records.
    #[must_use]
    pub fn into_items(self) -> Vec<R> {
        self.items
    }

    /// Returns the server-reported total across all pages.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns the page size used for the page count.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the page this result belongs to.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the number of pages, never less than one.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count, self.page_size)
    }

    /// Converts every item, failing on the first conversion error.
    pub fn try_map<T, F>(self, convert: F) -> AppResult<PageResult<T>>
    where
        F: FnMut(R) -> AppResult<T>,
    {
        Ok(PageResult {
            items: self
                .items
                .into_iter()
                .map(convert)
                .collect::<AppResult<Vec<T>>>()?,
            total_count: self.total_count,
            page_size: self.page_size,
            page: self.page,
        })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn twenty_three_records_of_ten_span_three_pages() {
        let page = PageResult::new(vec![0; 10], 23, 10, 1).unwrap_or_else(|_| unreachable!());
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn empty_collection_still_has_one_page() {
        assert_eq!(PageResult::<u8>::empty().total_pages(), 1);
    }

    #[test]
    fn single_page_counts_every_item() {
        let page = PageResult::single_page(vec!["a", "b", "c", "d", "e"]);
        assert_eq!(page.total_count(), 5);
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.page(), 1);
    }

    #[test]
    fn zero_page_size_and_page_zero_are_rejected() {
        assert!(PageResult::<u8>::new(Vec::new(), 0, 0, 1).is_err());
        assert!(PageResult::<u8>::new(Vec::new(), 0, 10, 0).is_err());
    }

    proptest! {
        #[test]
        fn total_pages_covers_every_record(total in 0usize..10_000, size in 1usize..200) {
            let pages = total_pages(total, size) as usize;
            prop_assert!(pages >= 1);
            prop_assert!(pages * size >= total);
            prop_assert!(total == 0 || (pages - 1) * size < total);
        }
    }
}
