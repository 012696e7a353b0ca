//! 边界感知偏移表.
//!
//! 对每个区域 (见 [`crate::zone`]) 和每个有效抽头, 预先计算 "从元素自身到该抽头对应源元素"
//! 的线性内存偏移. 越界抽头按扩展模式解析; `Constant` 模式下越界抽头写入边界标记,
//! 该值严格大于数组内任意两元素间的距离, 不会与合法偏移冲突.

use crate::error::{FilterError, FilterResult};
use crate::extend::ExtendMode;
use crate::traverse::PosIter;
use crate::zone::RegionLayout;
use itertools::izip;
use log::debug;

/// 校验数组与窗口几何参数, 返回补全后的原点偏移.
///
/// 所有检查都在分配偏移表之前完成.
pub(crate) fn validate(
    shape: &[usize],
    strides: &[isize],
    window: &[usize],
    origins: Option<&[isize]>,
) -> FilterResult<Vec<isize>> {
    let rank = shape.len();
    if window.len() != rank {
        return Err(FilterError::RankMismatch(rank, window.len()));
    }
    if strides.len() != rank {
        return Err(FilterError::StrideRankMismatch(rank, strides.len()));
    }
    if let Some(axis) = shape.iter().position(|&n| n == 0) {
        return Err(FilterError::ZeroExtent(axis));
    }
    if let Some(axis) = window.iter().position(|&f| f == 0) {
        return Err(FilterError::EmptyWindow(axis));
    }
    let origins = match origins {
        None => vec![0; rank],
        Some(o) if o.len() == rank => o.to_vec(),
        Some(o) => return Err(FilterError::OriginRank(rank, o.len())),
    };
    for (axis, (&o, &f)) in origins.iter().zip(window).enumerate() {
        let f_signed = f as isize;
        if o < -(f_signed / 2) || o > (f_signed - 1) / 2 {
            return Err(FilterError::OriginOutOfRange(axis, o, f));
        }
    }
    Ok(origins)
}

/// 窗口单元总数, 溢出时报告资源耗尽.
pub(crate) fn window_size(window: &[usize]) -> FilterResult<usize> {
    window
        .iter()
        .try_fold(1usize, |acc, &f| acc.checked_mul(f))
        .ok_or(FilterError::TooLarge)
}

/// 按区域平铺的偏移表.
///
/// 第 `r` 个区域的偏移位于 `offsets[r * T..(r + 1) * T]`, 其中 `T` 是有效抽头个数.
#[derive(Clone, Debug)]
pub struct OffsetTable {
    layout: RegionLayout,
    /// 每个有效抽头在稠密窗口中的行优先序号.
    cells: Vec<usize>,
    offsets: Vec<isize>,
    /// 每个区域, 每个抽头, 每个轴的坐标偏移.
    coordinates: Option<Vec<isize>>,
    border_flag: isize,
}

impl OffsetTable {
    /// 构建偏移表.
    ///
    /// - `strides` 为以元素为单位的内存步长 (同 `ndarray`, 可以为负);
    /// - `footprint` 为按窗口行优先顺序排列的有效性掩码, `None` 代表全部有效;
    /// - `origins` 为每个轴的原点偏移, `None` 代表窗口居中;
    /// - `with_coordinates` 为 `true` 时同时生成逐轴坐标偏移表.
    ///
    /// 参数不合法时返回相应的 [`FilterError`], 此时不会分配任何表.
    pub fn build(
        shape: &[usize],
        strides: &[isize],
        window: &[usize],
        footprint: Option<&[bool]>,
        origins: Option<&[isize]>,
        mode: ExtendMode,
        with_coordinates: bool,
    ) -> FilterResult<Self> {
        let origins = validate(shape, strides, window, origins)?;
        let size = window_size(window)?;
        if let Some(m) = footprint {
            if m.len() != size {
                return Err(FilterError::FootprintSize(size, m.len()));
            }
        }
        let layout = RegionLayout::new(shape, window, &origins)?;
        let border_flag = border_flag_for(shape, strides)?;

        let (cells, taps): (Vec<usize>, Vec<Vec<usize>>) = PosIter::new(window)
            .enumerate()
            .filter(|(k, _)| footprint.map_or(true, |m| m[*k]))
            .unzip();
        if taps.is_empty() {
            return Err(FilterError::EmptyFootprint);
        }

        let rank = shape.len();
        let total = layout
            .region_count()
            .checked_mul(taps.len())
            .ok_or(FilterError::TooLarge)?;
        let mut offsets = Vec::with_capacity(total);
        let mut coordinates = match with_coordinates {
            true => Some(Vec::with_capacity(
                total.checked_mul(rank).ok_or(FilterError::TooLarge)?,
            )),
            false => None,
        };

        let mut delta = vec![0isize; rank];
        for rows in PosIter::new(&layout.rows()) {
            // 以该区域的代表位置放置窗口.
            let base: Vec<isize> = izip!(&rows, layout.axes())
                .map(|(&r, axis)| axis.representative(r) as isize)
                .collect();

            for tap in taps.iter() {
                let mut offset = Some(0isize);
                for (d, axis, &b, &t, &s) in izip!(&mut delta, layout.axes(), &base, tap, strides)
                {
                    let cc = b - axis.anchor() as isize + t as isize;
                    match mode.resolve(cc, axis.extent()) {
                        Some(src) => {
                            *d = src as isize - b;
                            offset = offset.map(|o| o + s * *d);
                        }
                        None => {
                            *d = cc - b;
                            offset = None;
                        }
                    }
                }
                offsets.push(offset.unwrap_or(border_flag));
                if let Some(c) = coordinates.as_mut() {
                    c.extend_from_slice(&delta);
                }
            }
        }
        debug_assert_eq!(offsets.len(), total);

        debug!(
            "offset table: shape {shape:?}, window {window:?}, mode {}, {} regions x {} taps",
            mode.name(),
            layout.region_count(),
            taps.len()
        );
        Ok(Self {
            layout,
            cells,
            offsets,
            coordinates,
            border_flag,
        })
    }

    /// 有效抽头个数 `T`.
    #[inline]
    pub fn tap_count(&self) -> usize {
        self.cells.len()
    }

    /// 区域个数.
    #[inline]
    pub fn region_count(&self) -> usize {
        self.layout.region_count()
    }

    /// 区域布局.
    #[inline]
    pub fn layout(&self) -> &RegionLayout {
        &self.layout
    }

    /// 边界标记值.
    #[inline]
    pub fn border_flag(&self) -> isize {
        self.border_flag
    }

    /// 整张表.
    #[inline]
    pub fn offsets(&self) -> &[isize] {
        &self.offsets
    }

    /// 第 `region` 个区域的偏移行.
    #[inline]
    pub fn row(&self, region: usize) -> &[isize] {
        let t = self.tap_count();
        &self.offsets[region * t..(region + 1) * t]
    }

    /// 第 `j` 个有效抽头在稠密窗口中的行优先序号.
    #[inline]
    pub fn cell(&self, j: usize) -> usize {
        self.cells[j]
    }

    /// 第 `region` 个区域中第 `j` 个抽头的逐轴坐标偏移. 未生成坐标表时返回 `None`.
    ///
    /// `Constant` 模式下越界抽头给出的是未经解析的原始偏移.
    pub fn coordinates(&self, region: usize, j: usize) -> Option<&[isize]> {
        let rank = self.layout.ndim();
        let at = (region * self.tap_count() + j) * rank;
        self.coordinates.as_ref().map(|c| &c[at..at + rank])
    }

    /// 在表中沿 `axis` 轴换到下一行需要移动的距离.
    #[inline]
    pub fn stride(&self, axis: usize) -> usize {
        self.layout.radix(axis) * self.tap_count()
    }

    /// `axis` 轴回绕到起点时需要后退的距离.
    #[inline]
    pub fn backstride(&self, axis: usize) -> usize {
        (self.layout.axis(axis).rows() - 1) * self.stride(axis)
    }
}

/// 严格大于数组内任意两元素间距离的最小值.
fn border_flag_for(shape: &[usize], strides: &[isize]) -> FilterResult<isize> {
    shape
        .iter()
        .zip(strides)
        .try_fold(1isize, |acc, (&n, &s)| {
            let span = s.checked_abs()?.checked_mul(n as isize - 1)?;
            acc.checked_add(span)
        })
        .ok_or(FilterError::TooLarge)
}

#[cfg(test)]
mod tests {
    use super::OffsetTable;
    use crate::{ExtendMode, FilterError};

    fn table_1d(n: usize, f: usize, mode: ExtendMode) -> OffsetTable {
        OffsetTable::build(&[n], &[1], &[f], None, None, mode, false).unwrap()
    }

    /// 位置 `p` 处各抽头解析到的绝对位置, 边界标记记为 `None`.
    fn resolved_1d(t: &OffsetTable, p: usize) -> Vec<Option<usize>> {
        let region = t.layout().region_of(&[p]);
        t.row(region)
            .iter()
            .map(|&o| (o != t.border_flag()).then(|| (p as isize + o) as usize))
            .collect()
    }

    #[test]
    fn test_nearest_1d() {
        let t = table_1d(5, 3, ExtendMode::Nearest);
        assert_eq!(t.region_count(), 3);
        assert_eq!(t.tap_count(), 3);
        assert_eq!(resolved_1d(&t, 0), [Some(0), Some(0), Some(1)]);
        assert_eq!(resolved_1d(&t, 2), [Some(1), Some(2), Some(3)]);
        assert_eq!(resolved_1d(&t, 4), [Some(3), Some(4), Some(4)]);
    }

    #[test]
    fn test_constant_1d() {
        let t = table_1d(5, 3, ExtendMode::Constant);
        assert_eq!(resolved_1d(&t, 0), [None, Some(0), Some(1)]);
        assert_eq!(resolved_1d(&t, 4), [Some(3), Some(4), None]);
        for p in 1..4 {
            assert!(resolved_1d(&t, p).iter().all(Option::is_some));
        }
    }

    #[test]
    fn test_wrap_2d_corner() {
        let t =
            OffsetTable::build(&[4, 4], &[4, 1], &[3, 3], None, None, ExtendMode::Wrap, false)
                .unwrap();
        assert_eq!(t.region_count(), 9);
        // (0, 0) 的左上抽头 -> (3, 3)
        assert_eq!(t.row(0)[0], 3 * 4 + 3);
    }

    #[test]
    fn test_unit_window_all_zero() {
        for mode in ExtendMode::ALL {
            let t = OffsetTable::build(&[3, 4, 5], &[20, 5, 1], &[1, 1, 1], None, None, mode, false)
                .unwrap();
            assert_eq!(t.region_count(), 1);
            assert_eq!(t.offsets(), &[0]);
        }
    }

    #[test]
    fn test_region_count_three_wide() {
        let t = OffsetTable::build(
            &[6, 7, 8],
            &[56, 8, 1],
            &[3, 1, 3],
            None,
            None,
            ExtendMode::Mirror,
            false,
        )
        .unwrap();
        assert_eq!(t.region_count(), 3usize.pow(2));
        assert_eq!(t.offsets().len(), 9 * 9);
        assert_eq!((t.stride(0), t.stride(1), t.stride(2)), (27, 27, 9));
        assert_eq!((t.backstride(0), t.backstride(1), t.backstride(2)), (54, 0, 18));
    }

    #[test]
    fn test_footprint_columns() {
        let mask = [false, true, false, true, true, true, false, true, false];
        let t = OffsetTable::build(
            &[5, 5],
            &[5, 1],
            &[3, 3],
            Some(&mask),
            None,
            ExtendMode::Reflect,
            false,
        )
        .unwrap();
        assert_eq!(t.tap_count(), 5);
        assert_eq!((0..5).map(|j| t.cell(j)).collect::<Vec<_>>(), [1, 3, 4, 5, 7]);
        // 内部区域: 十字形.
        let interior = t.layout().region_of(&[2, 2]);
        assert_eq!(t.row(interior), &[-5, -1, 0, 1, 5]);
    }

    #[test]
    fn test_border_flag_is_out_of_reach() {
        let mode = ExtendMode::Constant;
        let t = OffsetTable::build(&[3, 4], &[-4, 1], &[5, 5], None, None, mode, false).unwrap();
        assert_eq!(t.border_flag(), 2 * 4 + 3 + 1);
        assert!(t
            .offsets()
            .iter()
            .all(|&o| o == t.border_flag() || o.abs() < t.border_flag()));
        assert!(t.offsets().contains(&t.border_flag()));
    }

    #[test]
    fn test_no_flag_without_constant() {
        for mode in ExtendMode::ALL.into_iter().filter(|m| !m.is_constant()) {
            let t = OffsetTable::build(&[2, 3], &[3, 1], &[5, 4], None, None, mode, false).unwrap();
            assert!(t.offsets().iter().all(|&o| o != t.border_flag()), "{mode:?}");
        }
    }

    #[test]
    fn test_coordinates() {
        let mode = ExtendMode::Constant;
        let t = OffsetTable::build(&[4, 4], &[4, 1], &[3, 3], None, None, mode, true).unwrap();
        // 区域 0 即 (0, 0), 抽头 0 越界, 给出原始偏移.
        assert_eq!(t.coordinates(0, 0), Some(&[-1isize, -1][..]));
        let interior = t.layout().region_of(&[1, 1]);
        assert_eq!(t.coordinates(interior, 8), Some(&[1isize, 1][..]));

        let t = OffsetTable::build(&[4, 4], &[4, 1], &[3, 3], None, None, ExtendMode::Wrap, true)
            .unwrap();
        assert_eq!(t.coordinates(0, 0), Some(&[3isize, 3][..]));
        let t = OffsetTable::build(&[4], &[1], &[3], None, None, ExtendMode::Wrap, false).unwrap();
        assert_eq!(t.coordinates(0, 0), None);
    }

    #[test]
    fn test_origin_shifts_window() {
        // 窗口 [p - 0, p + 1]
        let t = OffsetTable::build(&[4], &[1], &[2], None, Some(&[-1]), ExtendMode::Nearest, false)
            .unwrap();
        assert_eq!(t.layout().axis(0).anchor(), 0);
        assert_eq!(t.row(0), &[0, 1]);
        let last = t.layout().region_of(&[3]);
        assert_eq!(t.row(last), &[0, 0]);
    }

    #[test]
    fn test_invalid_geometry() {
        let e = |r: Result<OffsetTable, FilterError>| r.unwrap_err();
        let m = ExtendMode::Mirror;
        assert_eq!(
            e(OffsetTable::build(&[3, 3], &[3, 1], &[3], None, None, m, false)),
            FilterError::RankMismatch(2, 1)
        );
        assert_eq!(
            e(OffsetTable::build(&[3, 3], &[1], &[3, 3], None, None, m, false)),
            FilterError::StrideRankMismatch(2, 1)
        );
        assert_eq!(
            e(OffsetTable::build(&[3, 0], &[3, 1], &[3, 3], None, None, m, false)),
            FilterError::ZeroExtent(1)
        );
        assert_eq!(
            e(OffsetTable::build(&[3, 3], &[3, 1], &[0, 3], None, None, m, false)),
            FilterError::EmptyWindow(0)
        );
        assert_eq!(
            e(OffsetTable::build(&[3, 3], &[3, 1], &[3, 3], None, Some(&[0]), m, false)),
            FilterError::OriginRank(2, 1)
        );
        assert_eq!(
            e(OffsetTable::build(&[3, 3], &[3, 1], &[3, 4], None, Some(&[0, 2]), m, false)),
            FilterError::OriginOutOfRange(1, 2, 4)
        );
        assert_eq!(
            e(OffsetTable::build(&[3], &[1], &[3], Some(&[true]), None, m, false)),
            FilterError::FootprintSize(3, 1)
        );
        assert_eq!(
            e(OffsetTable::build(&[3], &[1], &[2], Some(&[false, false]), None, m, false)),
            FilterError::EmptyFootprint
        );
    }
}
