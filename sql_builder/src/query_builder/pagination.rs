/// Offset/limit paging for one-based page numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
}

impl Pagination {
    /// Pages below 1 clamp to the first page
    pub fn new(page: i64, per_page: u64) -> Self {
        Self {
            page: page.max(1) as u64,
            per_page,
        }
    }

    /// Saturates at `u64::MAX` for page numbers past any real table
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn to_sql(&self) -> String {
        format!("LIMIT {} OFFSET {}", self.per_page, self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offsets() {
        assert_eq!(Pagination::new(1, 6).to_sql(), "LIMIT 6 OFFSET 0");
        assert_eq!(Pagination::new(2, 6).to_sql(), "LIMIT 6 OFFSET 6");
        assert_eq!(Pagination::new(0, 6), Pagination::new(1, 6));
        assert_eq!(Pagination::new(-3, 6).offset(), 0);
    }

    #[test]
    fn test_huge_page_saturates() {
        let page = Pagination::new(i64::MAX, 10);
        assert_eq!(page.offset(), u64::MAX);
        assert_eq!(page.to_sql(), format!("LIMIT 10 OFFSET {}", u64::MAX));
    }
}
