//! Pagination.

use serde::Serialize;

use crate::error::{QueryError, Result};

/// A requested page: 1-indexed page number and a non-zero page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    /// Page `0` is read as page `1`. A size of `0` is rejected.
    pub fn new(page: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(QueryError::ZeroPageSize);
        }
        Ok(PageRequest {
            page: page.max(1),
            size,
        })
    }

    pub fn first(size: usize) -> Result<Self> {
        PageRequest::new(1, size)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// One bounded slice of a filtered, sorted collection.
///
/// `page_number` is always within `1..=max(1, total_pages)`: a request past
/// the last page lands on the last page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    /// Matching records before pagination.
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cuts one page out of the full result list.
    ///
    /// With no request the whole list is a single page.
    pub fn paginate(mut items: Vec<T>, request: Option<PageRequest>) -> Self {
        let total_items = items.len();
        let Some(request) = request else {
            return Page {
                items,
                page_number: 1,
                page_size: total_items.max(1),
                total_items,
                total_pages: usize::from(total_items > 0),
            };
        };

        let total_pages = total_items.div_ceil(request.size);
        let page_number = request.page.clamp(1, total_pages.max(1));
        let start = (page_number - 1) * request.size;
        let end = (start + request.size).min(total_items);

        items.truncate(end);
        let items = items.split_off(start.min(end));

        Page {
            items,
            page_number,
            page_size: request.size,
            total_items,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    /// 1-indexed position of the first item on this page, `0` when empty.
    pub fn first_item_number(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page_number - 1) * self.page_size + 1
        }
    }

    /// Transforms the items while keeping the pagination metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
