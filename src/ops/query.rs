//! Filter → search → sort → paginate over a list of records, plus the
//! table state that sits beside it (row selection, sort toggling, page
//! links).

use indexmap::IndexSet;
use serde::Serialize;

/// A record the pipeline can filter, search and select.
pub trait Queryable {
    type Category: PartialEq + Copy;

    /// Stable identifier, used for selection
    fn id(&self) -> &str;

    /// Value compared against the categorical filter
    fn category(&self) -> Self::Category;

    /// Text fields matched by the search box
    fn search_fields(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Categorical filter: everything, or one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter<C> {
    #[default]
    All,
    Only(C),
}

impl<C: PartialEq> CategoryFilter<C> {
    pub fn matches(&self, value: &C) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => c == value,
        }
    }
}

/// Derived sort key of a record
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Text(String),
    Count(usize),
}

#[derive(Debug, Clone)]
pub struct QueryParams<C> {
    pub search_text: String,
    pub category: CategoryFilter<C>,
    pub sort_direction: SortDirection,
    /// Rows per page; 0 is treated as 1
    pub page_size: usize,
    /// Requested page, 1-based; clamped into range
    pub page: usize,
}

impl<C> QueryParams<C> {
    pub fn new(page_size: usize) -> Self {
        QueryParams {
            search_text: String::new(),
            category: CategoryFilter::All,
            sort_direction: SortDirection::Asc,
            page_size,
            page: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryResult<'a, T> {
    pub visible: Vec<&'a T>,
    /// Matches across all pages
    pub total_matches: usize,
    pub pagination: Pagination,
}

impl<T: Queryable> QueryResult<'_, T> {
    pub fn visible_ids(&self) -> Vec<String> {
        self.visible.iter().map(|r| r.id().to_string()).collect()
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

pub fn filter_category<'a, T: Queryable>(
    records: Vec<&'a T>,
    filter: &CategoryFilter<T::Category>,
) -> Vec<&'a T> {
    records
        .into_iter()
        .filter(|r| filter.matches(&r.category()))
        .collect()
}

/// Case-insensitive substring match against any search field.
pub fn search<'a, T: Queryable>(records: Vec<&'a T>, text: &str) -> Vec<&'a T> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| {
            r.search_fields()
                .iter()
                .any(|f| f.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Stable sort: records with equal keys keep their input order in both
/// directions.
pub fn stable_sort<'a, T>(
    records: Vec<&'a T>,
    direction: SortDirection,
    sort_value: impl Fn(&T) -> SortValue,
) -> Vec<&'a T> {
    let mut keyed: Vec<(SortValue, &'a T)> =
        records.into_iter().map(|r| (sort_value(r), r)).collect();
    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Asc => a.cmp(b),
        SortDirection::Desc => b.cmp(a),
    });
    keyed.into_iter().map(|(_, r)| r).collect()
}

/// Page bookkeeping for `count` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page_size: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

impl Pagination {
    pub fn new(count: usize, page_size: usize, requested: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = count.div_ceil(page_size).max(1);
        Pagination {
            page_size,
            total_pages,
            current_page: requested.clamp(1, total_pages),
        }
    }

    /// Index range of the current page within the filtered list
    pub fn range(&self, count: usize) -> std::ops::Range<usize> {
        let start = ((self.current_page - 1) * self.page_size).min(count);
        let end = (start + self.page_size).min(count);
        start..end
    }

    /// Clamp a navigation request into `[1, total_pages]`.
    pub fn go_to(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages)
    }

    pub fn links(&self) -> Vec<PageLink> {
        page_links(self.total_pages, self.current_page)
    }
}

/// Run the full pipeline.
pub fn query<'a, T: Queryable>(
    records: &'a [T],
    params: &QueryParams<T::Category>,
    sort_value: impl Fn(&T) -> SortValue,
) -> QueryResult<'a, T> {
    let rows: Vec<&T> = records.iter().collect();
    let rows = filter_category(rows, &params.category);
    let rows = search(rows, &params.search_text);
    let rows = stable_sort(rows, params.sort_direction, sort_value);

    let pagination = Pagination::new(rows.len(), params.page_size, params.page);
    let total_matches = rows.len();
    let visible = rows[pagination.range(total_matches)].to_vec();

    QueryResult {
        visible,
        total_matches,
        pagination,
    }
}

// ---------------------------------------------------------------------------
// Page links
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

/// Page numbers for pagination controls: all pages when there are at most
/// five, otherwise first, current ±1, last, with ellipses over gaps.
pub fn page_links(total_pages: usize, current_page: usize) -> Vec<PageLink> {
    if total_pages <= 5 {
        return (1..=total_pages).map(PageLink::Page).collect();
    }
    let start = current_page.saturating_sub(1).max(1);
    let end = (current_page + 1).min(total_pages);

    let mut links = Vec::new();
    if start > 1 {
        links.push(PageLink::Page(1));
    }
    if start > 2 {
        links.push(PageLink::Ellipsis);
    }
    links.extend((start..=end).map(PageLink::Page));
    if end + 1 < total_pages {
        links.push(PageLink::Ellipsis);
    }
    if end < total_pages {
        links.push(PageLink::Page(total_pages));
    }
    links
}

pub fn format_page_links(links: &[PageLink], current_page: usize) -> String {
    links
        .iter()
        .map(|l| match l {
            PageLink::Page(p) if *p == current_page => format!("[{}]", p),
            PageLink::Page(p) => p.to_string(),
            PageLink::Ellipsis => "\u{2026}".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Sort + selection state
// ---------------------------------------------------------------------------

/// Active sort column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: PartialEq + Copy> SortState<K> {
    pub fn new(key: K) -> Self {
        SortState {
            key,
            direction: SortDirection::Asc,
        }
    }

    /// Header click: same column flips direction, another column starts asc.
    pub fn toggle(self, key: K) -> Self {
        if self.key == key {
            SortState {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            SortState::new(key)
        }
    }
}

/// Checkbox state for the selection header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Row selection keyed by record id, independent of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: IndexSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn toggle_one(&mut self, id: &str) {
        if !self.ids.shift_remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Every visible id is selected (and there is at least one)
    pub fn all_selected(&self, visible_ids: &[String]) -> bool {
        !visible_ids.is_empty() && visible_ids.iter().all(|id| self.ids.contains(id))
    }

    /// Header click: clear when the page is fully selected, otherwise add
    /// every visible id.
    pub fn toggle_all(&mut self, visible_ids: &[String]) {
        if self.all_selected(visible_ids) {
            self.ids.clear();
        } else {
            self.ids.extend(visible_ids.iter().cloned());
        }
    }

    /// `Checked` whenever every visible id is selected, even if the
    /// selection also holds ids from other pages.
    pub fn header(&self, visible_ids: &[String]) -> HeaderCheck {
        if self.all_selected(visible_ids) {
            HeaderCheck::Checked
        } else if !self.ids.is_empty() {
            HeaderCheck::Indeterminate
        } else {
            HeaderCheck::Unchecked
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        name: String,
        kind: u8,
        weight: usize,
    }

    impl Queryable for Row {
        type Category = u8;
        fn id(&self) -> &str {
            &self.id
        }
        fn category(&self) -> u8 {
            self.kind
        }
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name.as_str()]
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (1..=n)
            .map(|i| Row {
                id: format!("r{}", i),
                name: format!("Row {}", i),
                kind: (i % 2) as u8,
                weight: i % 3,
            })
            .collect()
    }

    fn by_weight(r: &Row) -> SortValue {
        SortValue::Count(r.weight)
    }

    #[test]
    fn test_paginate_clamps_past_last_page() {
        let data = rows(16);
        let mut params = QueryParams::new(7);
        params.page = 10;
        let result = query(&data, &params, |r| SortValue::Text(r.id.clone()));
        assert_eq!(result.pagination.total_pages, 3);
        assert_eq!(result.pagination.current_page, 3);
        assert_eq!(result.visible.len(), 2);
    }

    #[test]
    fn test_paginate_empty_and_zero_page() {
        let p = Pagination::new(0, 7, 0);
        assert_eq!((p.total_pages, p.current_page), (1, 1));
        assert_eq!(p.range(0), 0..0);
        assert_eq!(Pagination::new(5, 0, 3).total_pages, 5);
    }

    #[test]
    fn test_go_to_clamps() {
        let p = Pagination::new(20, 7, 1);
        assert_eq!(p.go_to(0), 1);
        assert_eq!(p.go_to(9), 3);
        assert_eq!(p.go_to(2), 2);
    }

    #[test]
    fn test_category_then_search() {
        let data = rows(12);
        let mut params = QueryParams::new(50);
        params.category = CategoryFilter::Only(1);
        params.search_text = "ROW 1".into();
        let result = query(&data, &params, |r| SortValue::Text(r.id.clone()));
        // odd ids containing "row 1": 1, 11
        assert_eq!(result.visible_ids(), vec!["r1", "r11"]);
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let data = rows(6);
        let mut params = QueryParams::new(50);
        let asc = query(&data, &params, by_weight).visible_ids();
        // weights: r1=1 r2=2 r3=0 r4=1 r5=2 r6=0
        assert_eq!(asc, vec!["r3", "r6", "r1", "r4", "r2", "r5"]);

        params.sort_direction = SortDirection::Desc;
        let desc = query(&data, &params, by_weight).visible_ids();
        assert_eq!(desc, vec!["r2", "r5", "r1", "r4", "r3", "r6"]);
    }

    #[test]
    fn test_page_links() {
        use PageLink::*;
        assert_eq!(page_links(3, 2), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(
            page_links(10, 1),
            vec![Page(1), Page(2), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_links(10, 5),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_links(10, 10),
            vec![Page(1), Ellipsis, Page(9), Page(10)]
        );
        assert_eq!(
            page_links(6, 3),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(6)]
        );
    }

    #[test]
    fn test_format_page_links() {
        let links = page_links(10, 5);
        insta::assert_snapshot!(format_page_links(&links, 5), @"1 … 4 [5] 6 … 10");
    }

    #[test]
    fn test_sort_toggle() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Col {
            Name,
            Count,
        }
        let s = SortState::new(Col::Name);
        let s = s.toggle(Col::Name);
        assert_eq!(s.direction, SortDirection::Desc);
        let s = s.toggle(Col::Count);
        assert_eq!(s, SortState::new(Col::Count));
    }

    #[test]
    fn test_selection_header_states() {
        let visible: Vec<String> = vec!["a".into(), "b".into()];
        let mut sel = Selection::new();
        assert_eq!(sel.header(&visible), HeaderCheck::Unchecked);

        sel.toggle_one("a");
        assert_eq!(sel.header(&visible), HeaderCheck::Indeterminate);

        sel.toggle_all(&visible);
        assert_eq!(sel.header(&visible), HeaderCheck::Checked);
        assert_eq!(sel.len(), 2);

        sel.toggle_all(&visible);
        assert!(sel.is_empty());
    }

    #[test]
    fn test_select_all_only_touches_visible_page() {
        let mut sel = Selection::new();
        sel.toggle_one("off-page");
        let visible: Vec<String> = vec!["a".into()];
        sel.toggle_all(&visible);
        assert!(sel.contains("off-page"));
        assert!(sel.contains("a"));
        // Selection larger than the page but covering it is still "checked"
        assert_eq!(sel.header(&visible), HeaderCheck::Checked);
    }
}
