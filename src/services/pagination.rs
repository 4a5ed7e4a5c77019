//! Page arithmetic shared by the store client and the gallery view.

/// Fixed number of tiles per gallery page.
pub const PAGE_SIZE: u32 = 9;

/// Inclusive, zero-based row index range for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub from: u64,
    pub to: u64,
}

impl PageRange {
    /// `page` is 1-based. Returns `None` when `page` or `page_size` is zero.
    pub fn for_page(page: u32, page_size: u32) -> Option<Self> {
        if page == 0 || page_size == 0 {
            return None;
        }
        let from = (page as u64 - 1) * page_size as u64;
        let to = from + page_size as u64 - 1;
        Some(Self { from, to })
    }

    /// Value for a `Range` request header.
    pub fn header_value(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size as u64).min(u32::MAX as u64) as u32
}

/// Clamps to `[1, total_pages]`; an empty gallery still has page 1.
pub fn clamp_page(page: i64, total_pages: u32) -> u32 {
    let last = total_pages.max(1) as i64;
    page.clamp(1, last) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_page_of_nine() {
        let range = PageRange::for_page(3, 9).unwrap();
        assert_eq!(range, PageRange { from: 18, to: 26 });
        assert_eq!(range.header_value(), "18-26");
        assert_eq!(range.to - range.from + 1, 9);
    }

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(
            PageRange::for_page(1, 9),
            Some(PageRange { from: 0, to: 8 })
        );
    }

    #[test]
    fn zero_page_or_size_has_no_range() {
        assert_eq!(PageRange::for_page(0, 9), None);
        assert_eq!(PageRange::for_page(1, 0), None);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 9), 0);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
        assert_eq!(total_pages(27, 9), 3);
    }

    #[test]
    fn clamp_stays_in_bounds() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(-4, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(7, 3), 3);
        assert_eq!(clamp_page(5, 0), 1);
    }
}
