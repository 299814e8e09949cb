//! This module defines the common functionality for paging data.
//!
//! Both the ledger and the product list page the same way: the full result
//! set is sliced after filtering and sorting, the page number is clamped into
//! range, and an empty set still reports one (empty) page.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The entries to display per ledger page when not specified in a request.
    pub ledger_page_size: u64,
    /// The products to display per page when not specified in a request.
    pub product_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            ledger_page_size: 10,
            product_page_size: 8,
            max_pages: 5,
        }
    }
}

/// One page cut out of a larger collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The items on this page, in the collection's order.
    pub items: Vec<T>,
    /// The page number after clamping, starting from 1.
    pub page: u64,
    /// The total number of pages. At least 1, even for an empty collection.
    pub page_count: u64,
}

/// Slice `items` into the requested page.
///
/// The page count is the ceiling of the item count over `page_size`, with a
/// floor of one so an empty collection still renders as a single empty page.
/// `page` is clamped into `1..=page_count` rather than rejected, so a stale
/// page number from a bookmarked URL degrades to the nearest valid page.
pub fn paginate<T>(items: Vec<T>, page: u64, page_size: u64) -> Page<T> {
    let page_size = page_size.max(1);
    let page_count = (items.len() as u64).div_ceil(page_size).max(1);
    let page = page.clamp(1, page_count);

    let start = ((page - 1) * page_size) as usize;
    let items = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    Page {
        items,
        page,
        page_count,
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

/// Build the row of page links shown under a paged table.
///
/// At most `max_pages` numbered links are shown around the current page, with
/// the first and last page always reachable behind an ellipsis.
pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

#[cfg(test)]
mod paginate_tests {
    use crate::pagination::paginate;

    #[test]
    fn concatenated_pages_reproduce_the_collection() {
        let items: Vec<u64> = (0..23).collect();
        let page_size = 5;
        let page_count = paginate(items.clone(), 1, page_size).page_count;

        let mut concatenated = Vec::new();
        for page in 1..=page_count {
            concatenated.extend(paginate(items.clone(), page, page_size).items);
        }

        assert_eq!(page_count, 5);
        assert_eq!(concatenated, items);
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let page = paginate(Vec::<u64>::new(), 1, 10);

        assert_eq!(page.page_count, 1);
        assert_eq!(page.page, 1);
        assert!(page.items.is_empty());
    }

    #[test]
    fn out_of_range_page_is_clamped() {
        let items: Vec<u64> = (0..23).collect();

        let last = paginate(items.clone(), 99, 10);
        assert_eq!(last.page, 3);
        assert_eq!(last.items, vec![20, 21, 22]);

        let first = paginate(items, 0, 10);
        assert_eq!(first.page, 1);
        assert_eq!(first.items, (0..10).collect::<Vec<u64>>());
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let items: Vec<u64> = (0..20).collect();

        assert_eq!(paginate(items, 1, 10).page_count, 2);
    }
}
