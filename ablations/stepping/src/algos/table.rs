//! 偏移表 + 同步步进.

use super::{accumulate, make_input, Profile};
use berry_filter::prelude::*;
use log::debug;
use utils::sweep::SweepCase;

/// 以 `berry-filter` 的滤波迭代器遍历每组参数.
pub fn table_driven(cases: &[SweepCase], mode: ExtendMode) -> Profile {
    let mut profile = Profile::new();
    let options = FilterOptions::default().with_mode(mode);

    for case in cases {
        let input = make_input(case);
        let data = input.as_slice().expect("standard layout input");
        let weights = vec![1u8; case.window_size()];

        profile.setup_start();
        let mut fi = FilterIterator::new(
            input.shape(),
            input.strides(),
            &case.window,
            &weights,
            case.footprint.as_ref(),
            &options,
        )
        .expect("sweep cases are well formed");
        let mut cursor = RowMajorCursor::from_array(&input);
        profile.setup_elapsed();

        debug!(
            "{}: shape {:?}, {} regions",
            mode.name(),
            case.shape,
            fi.layout().region_count()
        );

        profile.target_start();
        let (mut checksum, mut invalid) = (0u64, 0u64);
        loop {
            let at = cursor.offset() as usize;
            for j in 0..fi.tap_count() {
                match fi.retrieve(data, at, j) {
                    Some(v) => checksum = accumulate(checksum, j, v),
                    None => invalid += 1,
                }
            }
            if !cursor.advance() {
                break;
            }
            fi.step(&cursor);
        }
        let elements = case.len() as u64;
        profile.target_elapsed(elements, elements * fi.tap_count() as u64, invalid, checksum);
    }
    profile.finish()
}
