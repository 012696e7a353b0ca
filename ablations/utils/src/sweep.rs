//! 消融实验使用的几何参数扫描集.

use berry_filter::Footprint;
use itertools::iproduct;

/// 一组数组/窗口几何参数.
#[derive(Clone, Debug)]
pub struct SweepCase {
    /// 数组形状 (标准布局).
    pub shape: Vec<usize>,

    /// 窗口形状.
    pub window: Vec<usize>,

    /// 可选的 footprint.
    pub footprint: Option<Footprint>,
}

impl SweepCase {
    /// 数组元素个数.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// 数组是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 窗口单元个数.
    #[inline]
    pub fn window_size(&self) -> usize {
        self.window.iter().product()
    }
}

/// 十字形 footprint: 只有中心行/列上的单元有效.
pub fn cross(window: &[usize]) -> Footprint {
    berry_filter::traverse::PosIter::new(window)
        .map(|c| {
            c.iter()
                .zip(window)
                .filter(|(&ci, &f)| ci != f / 2)
                .count()
                <= 1
        })
        .collect()
}

/// 默认扫描集. 覆盖 1 ~ 3 维, 窄/宽/长于数组的窗口, 以及十字形 footprint.
///
/// `scale` 控制数组大小, 为 1 时是一个较快的冒烟规模.
pub fn default_sweep(scale: usize) -> Vec<SweepCase> {
    let scale = scale.max(1);
    let mut cases = Vec::with_capacity(64);

    for (n, f) in iproduct!([7usize, 64 * scale, 1000 * scale], [1usize, 3, 4, 9]) {
        cases.push(SweepCase {
            shape: vec![n],
            window: vec![f],
            footprint: None,
        });
    }
    let sides = [5usize, 32 * scale, 128 * scale];
    for (hw, f, with_cross) in iproduct!(sides, [3usize, 5], [false, true]) {
        let window = vec![f, f];
        cases.push(SweepCase {
            shape: vec![hw, hw + 3],
            footprint: with_cross.then(|| cross(&window)),
            window,
        });
    }
    for d in [4usize, 12 * scale, 24 * scale] {
        cases.push(SweepCase {
            shape: vec![d, d + 1, d + 2],
            window: vec![3, 3, 3],
            footprint: None,
        });
        cases.push(SweepCase {
            shape: vec![d, d, d],
            window: vec![1, 5, 2],
            footprint: None,
        });
    }
    // 窗口长于数组.
    cases.push(SweepCase {
        shape: vec![2, 3],
        window: vec![7, 9],
        footprint: None,
    });
    cases
}
