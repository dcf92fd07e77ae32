use crate::contract::model::PageView;

/// Slice `items` into 1-based pages.
///
/// `page_size` is at least 1. `page` is clamped into `1..=total_pages`, and an
/// empty input still has one (empty) page.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> PageView<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    PageView {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    }
}
