//! Record browser: the active table's records, paged, with one selectable
//! record that field components display.

use serde::Serialize;

use crate::host::{FieldMeta, Record, TableMeta};

/// Records shown per browser page.
pub const RECORDS_PER_PAGE: usize = 10;

/// Records fetched for the browser when a table is opened.
pub const BROWSER_FETCH_SIZE: usize = 100;

/// One entry of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "page")]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// Pager entries for `total` pages with `current` active (both 1-based).
///
/// The first and last page are always listed, plus every page within two
/// of the current one; gaps collapse into a single ellipsis.
///
/// ```
/// use folio::designer::{PageItem::*, page_numbers};
///
/// assert_eq!(
///     page_numbers(6, 12),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Page(7), Page(8), Ellipsis, Page(12)]
/// );
/// ```
pub fn page_numbers(current: usize, total: usize) -> Vec<PageItem> {
    let mut items = Vec::new();
    let mut last = 0;
    for page in 1..=total {
        if page == 1 || page == total || page.abs_diff(current) <= 2 {
            if last != 0 && page != last + 1 {
                items.push(PageItem::Ellipsis);
            }
            items.push(PageItem::Page(page));
            last = page;
        }
    }
    items
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordBrowser {
    pub tables: Vec<TableMeta>,
    pub fields: Vec<FieldMeta>,
    pub records: Vec<Record>,
    selected: Option<String>,
    page: usize,
}

impl RecordBrowser {
    /// Replace the field list and records, resetting paging and selection.
    pub fn set_records(&mut self, fields: Vec<FieldMeta>, records: Vec<Record>) {
        self.fields = fields;
        self.records = records;
        self.page = 1;
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Record> {
        let id = self.selected.as_deref()?;
        self.records.iter().find(|r| r.id == id)
    }

    /// Select a record by id; `None` or an unknown id clears the selection.
    pub fn select(&mut self, record_id: Option<&str>) -> Option<&Record> {
        self.selected = record_id
            .filter(|id| self.records.iter().any(|r| r.id == *id))
            .map(str::to_string);
        self.selected()
    }

    pub fn page_count(&self) -> usize {
        self.records.len().div_ceil(RECORDS_PER_PAGE)
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Go to a page, clamped to the valid range.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.page_count().max(1));
        self.page
    }

    /// Records on the current page.
    pub fn page_records(&self) -> &[Record] {
        let start = (self.page() - 1) * RECORDS_PER_PAGE;
        let end = (start + RECORDS_PER_PAGE).min(self.records.len());
        self.records.get(start..end).unwrap_or(&[])
    }

    pub fn page_numbers(&self) -> Vec<PageItem> {
        page_numbers(self.page(), self.page_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageItem::*;

    fn browser(n: usize) -> RecordBrowser {
        let mut b = RecordBrowser::default();
        b.set_records(
            vec![],
            (1..=n)
                .map(|i| Record {
                    id: format!("r{i}"),
                    ..Default::default()
                })
                .collect(),
        );
        b
    }

    #[test]
    fn test_page_numbers_small() {
        assert_eq!(page_numbers(1, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(page_numbers(1, 1), vec![Page(1)]);
        assert!(page_numbers(1, 0).is_empty());
    }

    #[test]
    fn test_page_numbers_edges() {
        assert_eq!(
            page_numbers(1, 8),
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(8)]
        );
        assert_eq!(
            page_numbers(8, 8),
            vec![Page(1), Ellipsis, Page(6), Page(7), Page(8)]
        );
        // no ellipsis when the gap is empty
        assert_eq!(
            page_numbers(4, 6),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6)]
        );
    }

    #[test]
    fn test_paging() {
        let mut b = browser(23);
        assert_eq!(b.page_count(), 3);
        assert_eq!(b.page_records().len(), 10);
        assert_eq!(b.set_page(9), 3);
        assert_eq!(b.page_records().len(), 3);
        assert_eq!(b.page_records()[0].id, "r21");
        assert_eq!(b.set_page(0), 1);
    }

    #[test]
    fn test_select() {
        let mut b = browser(3);
        assert_eq!(b.select(Some("r2")).map(|r| r.id.as_str()), Some("r2"));
        assert!(b.select(Some("zzz")).is_none());
        assert!(b.selected().is_none());
    }

    #[test]
    fn test_empty_browser() {
        let b = RecordBrowser::default();
        assert_eq!(b.page(), 1);
        assert!(b.page_records().is_empty());
        assert!(b.page_numbers().is_empty());
    }
}
