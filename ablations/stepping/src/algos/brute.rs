//! 逐元素暴力边界解析.

use super::{accumulate, make_input, Profile};
use berry_filter::prelude::*;
use utils::sweep::SweepCase;

/// 对每个元素的每个抽头, 逐轴套用扩展规则求出源位置.
pub fn brute_force(cases: &[SweepCase], mode: ExtendMode) -> Profile {
    let mut profile = Profile::new();

    for case in cases {
        let input = make_input(case);

        profile.setup_start();
        let cells: Vec<Vec<isize>> = PosIter::new(&case.window)
            .enumerate()
            .filter(|(k, _)| case.footprint.as_ref().map_or(true, |f| f.as_slice()[*k]))
            .map(|(_, cell)| {
                cell.iter()
                    .zip(&case.window)
                    .map(|(&c, &f)| c as isize - (f / 2) as isize)
                    .collect()
            })
            .collect();
        let mut src = vec![0usize; case.shape.len()];
        profile.setup_elapsed();

        profile.target_start();
        let (mut checksum, mut invalid) = (0u64, 0u64);
        for pos in PosIter::new(&case.shape) {
            for (j, cell) in cells.iter().enumerate() {
                let found = src
                    .iter_mut()
                    .zip(&pos)
                    .zip(cell)
                    .zip(&case.shape)
                    .all(|(((s, &p), &d), &n)| {
                        mode.resolve(p as isize + d, n).map(|r| *s = r).is_some()
                    });
                match found {
                    true => checksum = accumulate(checksum, j, input[src.as_slice()]),
                    false => invalid += 1,
                }
            }
        }
        let elements = case.len() as u64;
        profile.target_elapsed(elements, elements * cells.len() as u64, invalid, checksum);
    }
    profile.finish()
}
