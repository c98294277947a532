//! Fixed-size pagination with a clamped, 1-indexed current page.
//!
//! The paginator never stores the collection it pages over. Every read takes the
//! current item count, so a page number left over from a longer list is clamped
//! instead of producing an out-of-range slice.

use std::num::NonZeroUsize;

/// Number of items per page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSize {
    /// At most this many items per page
    Fixed(NonZeroUsize),
    /// Everything on a single page
    Unbounded,
}

impl PageSize {
    /// The fixed size, `None` when unbounded.
    #[must_use]
    pub const fn get(self) -> Option<usize> {
        match self {
            Self::Fixed(size) => Some(size.get()),
            Self::Unbounded => None,
        }
    }
}

/// One page of items plus the numbers the pagination controls need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page, in collection order
    pub items: Vec<T>,
    /// 1-indexed page number
    pub number: usize,
    /// `ceil(total_items / page_size)`, zero for an empty collection
    pub total_pages: usize,
    /// Size of the whole collection
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Whether the Previous control is enabled.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether the Next control is enabled.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// An empty page renders the empty state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Tracks the current page of a list screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    page_size: PageSize,
    current_page: usize,
}

impl Paginator {
    /// Starts on page 1.
    #[must_use]
    pub const fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            current_page: 1,
        }
    }

    /// The configured page size.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Number of pages needed for `total_items`.
    #[must_use]
    pub const fn total_pages(&self, total_items: usize) -> usize {
        match self.page_size {
            PageSize::Fixed(size) => total_items.div_ceil(size.get()),
            PageSize::Unbounded => {
                if total_items == 0 {
                    0
                } else {
                    1
                }
            }
        }
    }

    /// The current page clamped to `[1, max(1, total_pages)]`.
    #[must_use]
    pub fn current_page(&self, total_items: usize) -> usize {
        self.current_page
            .clamp(1, self.total_pages(total_items).max(1))
    }

    /// Back to page 1. Called whenever the filter or search changes.
    pub const fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Moves to the next page; a no-op on the last page. Returns whether it moved.
    pub fn next(&mut self, total_items: usize) -> bool {
        let current = self.current_page(total_items);
        if current < self.total_pages(total_items) {
            self.current_page = current + 1;
            true
        } else {
            self.current_page = current;
            false
        }
    }

    /// Moves to the previous page; a no-op on page 1. Returns whether it moved.
    pub fn previous(&mut self, total_items: usize) -> bool {
        let current = self.current_page(total_items);
        if current > 1 {
            self.current_page = current - 1;
            true
        } else {
            self.current_page = current;
            false
        }
    }

    /// Jumps to `page`, clamped to the valid range.
    pub fn go_to(&mut self, page: usize, total_items: usize) {
        self.current_page = page.clamp(1, self.total_pages(total_items).max(1));
    }

    /// Slices the current page out of `items`.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>) -> Page<T> {
        let total_items = items.len();
        let number = self.current_page(total_items);
        let total_pages = self.total_pages(total_items);

        let items = match self.page_size {
            PageSize::Fixed(size) => items
                .into_iter()
                .skip((number - 1) * size.get())
                .take(size.get())
                .collect(),
            PageSize::Unbounded => items,
        };

        Page {
            items,
            number,
            total_pages,
            total_items,
        }
    }
}
