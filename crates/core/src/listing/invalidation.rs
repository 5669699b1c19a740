//! Key enumeration for sweep-mode invalidation.

use super::{PageKey, PageRequest};

/// Pages swept for every page size in `SWEEP_PAGE_SIZES`.
const SWEEP_PAGES: i64 = 10;
/// Page sizes 10, 20, ..., 100.
const SWEEP_PAGE_SIZES: [i64; 10] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];
/// The default page size is swept deeper than the rest.
const SWEEP_DEFAULT_SIZE_PAGES: i64 = 20;

/// Keys dropped by a sweep: pages 1-10 at every size in steps of 10, plus
/// pages 1-20 at the default size of 20. Any other cached page survives the
/// sweep until its sliding window lapses.
pub fn sweep_keys() -> impl Iterator<Item = PageKey> {
    let common = (1..=SWEEP_PAGES).flat_map(|page| {
        SWEEP_PAGE_SIZES
            .into_iter()
            .map(move |size| PageRequest::new(page, size).key())
    });

    // Pages 1-10 at size 20 are already in `common`
    let default_size = (SWEEP_PAGES + 1..=SWEEP_DEFAULT_SIZE_PAGES)
        .map(|page| PageRequest::new(page, super::DEFAULT_PAGE_SIZE).key());

    common.chain(default_size)
}
