//! Property tests for offset/limit page slicing.

use proptest::prelude::*;

use dewey::{Page, PageRequest};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a page is exactly the requested slice of the input, in
    /// input order, with `total` reporting the full result size and
    /// `has_more` true iff items exist past the page.
    #[test]
    fn property_slice_matches_the_input_window(
        items in proptest::collection::vec(any::<u32>(), 0..100),
        offset in 0usize..150,
        limit in 0usize..40
    ) {
        let page = PageRequest::at(offset, limit).slice(items.clone());

        let start = offset.min(items.len());
        let end = offset.saturating_add(limit).min(items.len());
        prop_assert_eq!(&page.items, &items[start..end]);

        prop_assert!(page.items.len() <= limit);
        prop_assert_eq!(page.total, items.len());
        prop_assert_eq!(page.offset, offset);
        prop_assert_eq!(page.limit, limit);
        prop_assert_eq!(page.has_more(), offset + page.items.len() < items.len());
    }

    /// PROPERTY: walking consecutive pages reconstructs the input exactly,
    /// with every page before the last one full.
    #[test]
    fn property_page_walk_reconstructs_the_input(
        items in proptest::collection::vec(any::<u32>(), 0..100),
        limit in 1usize..17
    ) {
        let mut collected: Vec<u32> = Vec::new();
        let mut offset = 0;
        loop {
            let page: Page<u32> = PageRequest::at(offset, limit).slice(items.clone());
            prop_assert_eq!(page.total, items.len());
            let len = page.items.len();
            let more = page.has_more();
            collected.extend(page.items);
            if !more {
                break;
            }
            prop_assert_eq!(len, limit, "only the last page may be short");
            offset += limit;
        }
        prop_assert_eq!(collected, items);
    }
}
