// Property: list pagination never skips or repeats rows.
//
// For any page size and page number, consecutive pages start exactly
// `per_page` rows apart, and the page count covers every row.

use proptest::prelude::*;
use bookmark_manager_core::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_consecutive_pages_are_adjacent(number in 1usize..1000, per_page in 1usize..200) {
        let current = Page::new(number, per_page);
        let next = Page::new(number + 1, per_page);
        prop_assert_eq!(next.offset() - current.offset(), per_page);
    }

    #[test]
    fn prop_total_pages_cover_all_rows(total in 1usize..10_000, per_page in 1usize..200) {
        let page = BookmarkPage { items: vec![], total, page: Page::new(1, per_page) };
        let pages = page.total_pages();
        prop_assert!(pages * per_page >= total);
        prop_assert!((pages - 1) * per_page < total);
    }

    #[test]
    fn prop_bookmark_id_display_parses_back(raw in any::<i64>()) {
        let id = BookmarkId(raw);
        prop_assert_eq!(id.to_string().parse::<BookmarkId>().unwrap(), id);
    }
}
