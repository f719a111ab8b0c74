//! Dynamic ordering and pagination over an in-memory record set
//!
//! Sort fields are closed enums resolved through [`SortBy`], so an unknown
//! field name fails when it is parsed, before any query runs.

use std::cmp::Ordering;

use serde::Serialize;

use crate::errors::{ContractError, Result};
use crate::model::named_enum;

named_enum! {
    /// Sort direction
    pub enum SortDirection as "sort_direction" {
        Asc,
        Desc,
    }
}

/// Compare two records on one of a closed set of fields
pub trait SortBy<F: Copy> {
    fn compare_by(&self, other: &Self, field: F) -> Ordering;
}

/// Validated 1-based page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: usize,
    page_size: usize,
}

impl PageRequest {
    /// # Errors
    /// `InvalidPaging` if either value is zero.
    pub fn new(page_number: usize, page_size: usize) -> Result<Self> {
        if page_number == 0 {
            return Err(ContractError::InvalidPaging {
                reason: "page number must be at least 1".to_string(),
            });
        }
        if page_size == 0 {
            return Err(ContractError::InvalidPaging {
                reason: "page size must be at least 1".to_string(),
            });
        }
        Ok(Self {
            page_number,
            page_size,
        })
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn skip(&self) -> usize {
        (self.page_number - 1).saturating_mul(self.page_size)
    }
}

/// One page of a larger result set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
}

impl<T> PagedList<T> {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then(|| self.current_page + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.current_page - 1)
    }

    /// Nothing matched at all (callers answer "no content")
    pub fn is_empty_result(&self) -> bool {
        self.total_count == 0
    }

    /// Records matched but the page lies beyond them (callers answer "not found")
    pub fn is_past_end(&self) -> bool {
        self.total_count > 0 && self.current_page > self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            current_page: self.current_page,
            page_size: self.page_size,
        }
    }
}

/// Slice an already ordered collection into the requested page
pub fn paginate<T>(items: Vec<T>, page: PageRequest) -> PagedList<T> {
    let total_count = items.len();
    let total_pages = total_count.div_ceil(page.page_size);
    let items = items
        .into_iter()
        .skip(page.skip())
        .take(page.page_size)
        .collect();

    PagedList {
        items,
        total_count,
        total_pages,
        current_page: page.page_number,
        page_size: page.page_size,
    }
}

/// Order `items` by `field` in `direction`, then paginate
///
/// The sort is stable: records that compare equal keep their input order.
pub fn sort_and_page<T, F>(
    mut items: Vec<T>,
    field: F,
    direction: SortDirection,
    page: PageRequest,
) -> PagedList<T>
where
    T: SortBy<F>,
    F: Copy,
{
    match direction {
        SortDirection::Asc => items.sort_by(|a, b| a.compare_by(b, field)),
        SortDirection::Desc => items.sort_by(|a, b| b.compare_by(a, field)),
    }
    paginate(items, page)
}
