use serde::Serialize;

/// Listings shown per catalog page
pub const PAGE_SIZE: usize = 9;

/// One slice of a filtered collection
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number actually served
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.total_items == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            page_size: self.page_size,
        }
    }
}

/// Slice `items` into [`PAGE_SIZE`] pages and return the requested one
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    paginate_with(items, page, PAGE_SIZE)
}

/// Page numbers below 1 are served as page 1 and numbers past the end as the
/// last page. An empty collection still has a single (empty) page.
pub fn paginate_with<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        page,
        total_pages,
        total_items,
        page_size,
    }
}
