//! 区域划分.
//!
//! 沿每个轴, 数组位置被分为 "低边缘", "内部" 和 "高边缘" 三类. 低边缘 (高边缘) 中的每个位置
//! 看到的越界抽头集合都不同, 因此各自占用偏移表中的一行; 内部位置共享一行.
//! 于是一个轴上的行数为 `min(extent, window)`: 对于宽为 3 的窗口恰好是
//! `{低, 内部, 高}` 三行, 对于宽为 1 的窗口只有一行.
//!
//! 各轴的行号按混合进制 (最后一个轴变化最快) 拼成一个区域号, 偏移表按区域号平铺存储.

use crate::error::{FilterError, FilterResult};

/// 单个轴上的区域类别.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Zone {
    /// 低边缘. 参数为到轴起点的距离.
    Low(usize),

    /// 内部. 整个窗口都落在数组内.
    Interior,

    /// 高边缘. 参数为到轴终点的距离.
    High(usize),
}

/// 单个轴的区域划分.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct AxisZones {
    /// 数组在该轴上的长度.
    extent: usize,
    /// 窗口在该轴上的长度.
    window: usize,
    /// 窗口锚点, 即 `window / 2 + origin`. 位于 `[0, window)`.
    anchor: usize,
}

impl AxisZones {
    /// 创建轴划分. `origin` 必须已经校验过.
    pub(crate) fn new(extent: usize, window: usize, origin: isize) -> Self {
        let anchor = (window / 2) as isize + origin;
        debug_assert!((0..window as isize).contains(&anchor));
        Self {
            extent,
            window,
            anchor: anchor as usize,
        }
    }

    /// 数组在该轴上的长度.
    #[inline]
    pub fn extent(&self) -> usize {
        self.extent
    }

    /// 窗口在该轴上的长度.
    #[inline]
    pub fn window(&self) -> usize {
        self.window
    }

    /// 窗口锚点.
    #[inline]
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// 偏移表中该轴占用的行数.
    #[inline]
    pub fn rows(&self) -> usize {
        self.extent.min(self.window)
    }

    /// 共享内部行的位置比边缘行多出来的个数.
    #[inline]
    fn spare(&self) -> usize {
        self.extent.saturating_sub(self.window)
    }

    /// 位置 `p` 的区域类别.
    ///
    /// 窗口长于数组时, 一个位置可能同时处于低边缘和高边缘, 此时返回 `Low`.
    pub fn classify(&self, p: usize) -> Zone {
        debug_assert!(p < self.extent);
        let tail = self.window - 1 - self.anchor;
        if p < self.anchor {
            Zone::Low(p)
        } else if p + tail >= self.extent {
            Zone::High(self.extent - 1 - p)
        } else {
            Zone::Interior
        }
    }

    /// 位置 `p` 所在的行.
    pub fn row_of(&self, p: usize) -> usize {
        debug_assert!(p < self.extent);
        if p <= self.anchor {
            p
        } else if p <= self.anchor + self.spare() {
            self.anchor
        } else {
            p - self.spare()
        }
    }

    /// 代表第 `row` 行的位置. 该行的偏移就是按窗口放在这个位置时计算出来的.
    pub fn representative(&self, row: usize) -> usize {
        debug_assert!(row < self.rows());
        if row <= self.anchor {
            row
        } else {
            row + self.spare()
        }
    }

    /// 步进边界 `[low, high)`: 主遍历在该轴上前进到新索引 `q` 时,
    /// 当且仅当 `q` 落在该区间内, 所在行不变.
    ///
    /// 窗口不短于数组时区间为空, 每前进一步都换行.
    #[inline]
    pub fn bounds(&self) -> (usize, usize) {
        let low = self.anchor + 1;
        (low, low + self.spare())
    }
}

/// 全部轴的区域划分及其混合进制布局.
#[derive(Clone, Debug)]
pub struct RegionLayout {
    axes: Vec<AxisZones>,
    /// 每个轴上行号的权重 (以区域为单位).
    radix: Vec<usize>,
    regions: usize,
}

impl RegionLayout {
    /// `origins` 必须已经校验过.
    pub(crate) fn new(shape: &[usize], window: &[usize], origins: &[isize]) -> FilterResult<Self> {
        let axes: Vec<_> = shape
            .iter()
            .zip(window)
            .zip(origins)
            .map(|((&n, &f), &o)| AxisZones::new(n, f, o))
            .collect();

        let mut radix = vec![0; axes.len()];
        let mut acc = 1usize;
        for (r, axis) in radix.iter_mut().zip(&axes).rev() {
            *r = acc;
            acc = acc.checked_mul(axis.rows()).ok_or(FilterError::TooLarge)?;
        }
        Ok(Self {
            axes,
            radix,
            regions: acc,
        })
    }

    /// 维数.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    /// 区域总数, 即各轴行数之积.
    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions
    }

    /// 第 `axis` 轴的划分.
    #[inline]
    pub fn axis(&self, axis: usize) -> &AxisZones {
        &self.axes[axis]
    }

    /// 全部轴的划分.
    #[inline]
    pub fn axes(&self) -> &[AxisZones] {
        &self.axes
    }

    /// 各轴的行数.
    pub fn rows(&self) -> Vec<usize> {
        self.axes.iter().map(AxisZones::rows).collect()
    }

    /// 第 `axis` 轴的行号每加一, 区域号增加的量.
    #[inline]
    pub fn radix(&self, axis: usize) -> usize {
        self.radix[axis]
    }

    /// 元素 `position` 的区域号.
    pub fn region_of(&self, position: &[usize]) -> usize {
        debug_assert_eq!(position.len(), self.ndim());
        self.axes
            .iter()
            .zip(&self.radix)
            .zip(position)
            .map(|((axis, r), &p)| axis.row_of(p) * r)
            .sum()
    }

    /// 元素 `position` 在各轴上的类别.
    pub fn classify(&self, position: &[usize]) -> Vec<Zone> {
        self.axes
            .iter()
            .zip(position)
            .map(|(axis, &p)| axis.classify(p))
            .collect()
    }
}
