/// Fixed-size pagination over a list of items
pub struct Page<'a, T> {
    items: &'a [T],
    per_page: usize,
    pub current_page: usize,
}

impl<'a, T> Page<'a, T> {
    /// Create a pagination over `items`, starting at page 1
    pub fn new(items: &'a [T], per_page: usize) -> Self {
        Page {
            items,
            per_page: per_page.max(1),
            current_page: 1,
        }
    }

    /// Jump to a 1-based page number
    pub fn go_to(mut self, page_num: usize) -> Result<Self, String> {
        if page_num < 1 || page_num > self.total_pages() {
            return Err(format!(
                "❌ Invalid page number. This list has {} page(s)",
                self.total_pages()
            ));
        }
        self.current_page = page_num;
        Ok(self)
    }

    /// Get total number of pages (an empty list still has one page)
    pub fn total_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page).max(1)
    }

    /// Items on the current page
    pub fn current_items(&self) -> &'a [T] {
        let start = (self.current_page - 1) * self.per_page;
        let end = (start + self.per_page).min(self.items.len());
        &self.items[start.min(end)..end]
    }

    /// 1-based position of the first item on the current page
    pub fn first_item_number(&self) -> usize {
        (self.current_page - 1) * self.per_page + 1
    }

    pub fn footer(&self) -> String {
        format!(
            "Page {}/{} • {} total",
            self.current_page,
            self.total_pages(),
            self.items.len()
        )
    }
}
