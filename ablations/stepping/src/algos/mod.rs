mod brute;
mod profile;
mod table;

use ndarray::ArrayD;
use utils::sweep::SweepCase;

pub use brute::brute_force;
pub use profile::Profile;
pub use table::table_driven;

/// 为参数组 `case` 准备输入数据: 值为元素的线性序号.
fn make_input(case: &SweepCase) -> ArrayD<u32> {
    let mut n = 0u32;
    ArrayD::from_shape_simple_fn(case.shape.clone(), || {
        n = n.wrapping_add(1);
        n
    })
}

/// 将第 `j` 个抽头读到的值 `v` 累加进校验和.
#[inline]
fn accumulate(checksum: u64, j: usize, v: u32) -> u64 {
    checksum.wrapping_mul(31).wrapping_add((j as u64 + 1) * v as u64)
}
