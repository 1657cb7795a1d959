use crate::list::filter::FilterSet;
use crate::list::state::ListState;
use crate::list::Listable;

/// The visible slice of a list plus the size of the filtered set.
#[derive(Debug, PartialEq)]
pub struct Projection<'a, T> {
    pub visible: Vec<&'a T>,
    pub total_matching: usize,
}

/// Number of pages needed for `total` items. Never less than one, so an
/// empty list still reads "page 1 of 1".
pub fn page_count(total: usize, per_page: usize) -> usize {
    total.div_ceil(per_page.max(1)).max(1)
}

/// Filter, then stable-sort, then slice `items` according to `state`.
///
/// Pure: the state is not clamped here. A page past the end yields an
/// empty slice.
pub fn project<'a, T: Listable>(items: &'a [T], state: &ListState<T>) -> Projection<'a, T> {
    let mut matching: Vec<&T> = items.iter().filter(|i| state.filters.matches(i)).collect();

    let (column, direction) = (state.sort_column, state.sort_direction);
    matching.sort_by(|a, b| direction.apply(a.compare_by(b, column)));

    let total_matching = matching.len();
    let per_page = state.items_per_page.max(1);
    let start = state.current_page.saturating_sub(1).saturating_mul(per_page);
    let visible = matching.into_iter().skip(start).take(per_page).collect();

    Projection {
        visible,
        total_matching,
    }
}
