//! 滤波迭代器.

use crate::error::{FilterError, FilterResult};
use crate::footprint::{compress, Footprint};
use crate::offsets::{self, OffsetTable};
use crate::options::FilterOptions;
use crate::traverse::Traversal;
use crate::zone::RegionLayout;
use ndarray::{ArrayBase, Data, Dimension};
use num::Zero;
use std::borrow::Cow;
use std::ops::Index;

/// 步进时的进位状态.
#[derive(Copy, Clone, Debug)]
enum Carry {
    /// 正在处理该轴. 该轴之后 (更内层) 的轴都已回绕.
    Axis(usize),

    /// 进位结束.
    Settled,
}

/// 跟随主遍历同步步进的邻域游标.
///
/// 迭代器独占自己的偏移表.
/// 系数在压缩时为私有副本, 否则借用调用方缓冲区, 二者都随迭代器一起释放. 一个实例只服务于一次滤波调用中的一个数组,
/// 不可在多个线程间共享步进.
///
/// # 使用方式
///
/// ```
/// use berry_filter::prelude::*;
///
/// let data: Vec<i32> = (0..5).collect();
/// let weights = [1, 1, 1];
/// let opts = FilterOptions::default().with_mode(ExtendMode::Nearest);
/// let mut fi = FilterIterator::new(&[5], &[1], &[3], &weights, None, &opts).unwrap();
///
/// let mut cursor = RowMajorCursor::standard(&[5]);
/// let mut sums = vec![];
/// loop {
///     let at = cursor.offset() as usize;
///     sums.push((0..fi.tap_count()).filter_map(|j| fi.retrieve(&data, at, j)).sum::<i32>());
///     if !cursor.advance() {
///         break;
///     }
///     fi.step(&cursor);
/// }
/// assert_eq!(sums, [1, 3, 6, 9, 11]);
/// ```
#[derive(Clone, Debug)]
pub struct FilterIterator<'a, T: Clone> {
    table: OffsetTable,
    coefficients: Cow<'a, [T]>,
    /// 当前区域偏移行在表中的起点.
    cur: usize,
    strides: Vec<usize>,
    backstrides: Vec<usize>,
    bounds: Vec<(usize, usize)>,
}

impl<'a, T: Clone> FilterIterator<'a, T> {
    /// 构造迭代器.
    ///
    /// - `shape`, `strides`: 数组形状与元素单位的内存步长;
    /// - `window`: 窗口形状, `coefficients` 按其行优先顺序排列;
    /// - `footprint`: 有效性掩码, 仅在 `options.compress` 为 `true` 时生效.
    ///
    /// 几何参数不合法时返回错误, 此时不会分配任何表.
    pub fn new(
        shape: &[usize],
        strides: &[isize],
        window: &[usize],
        coefficients: &'a [T],
        footprint: Option<&Footprint>,
        options: &FilterOptions,
    ) -> FilterResult<Self> {
        offsets::validate(shape, strides, window, options.origins.as_deref())?;
        let size = offsets::window_size(window)?;
        if coefficients.len() != size {
            return Err(FilterError::CoefficientCount(size, coefficients.len()));
        }

        let footprint = footprint.filter(|_| options.compress);
        let compressed = compress(coefficients, footprint)?;
        let table = OffsetTable::build(
            shape,
            strides,
            window,
            compressed.mask(),
            options.origins.as_deref(),
            options.mode,
            options.coordinates,
        )?;
        debug_assert_eq!(table.tap_count(), compressed.active());

        let rank = shape.len();
        let strides = (0..rank).map(|i| table.stride(i)).collect();
        let backstrides = (0..rank).map(|i| table.backstride(i)).collect();
        let bounds = table.layout().axes().iter().map(|a| a.bounds()).collect();
        Ok(Self {
            table,
            coefficients: compressed.into_coefficients(),
            cur: 0,
            strides,
            backstrides,
            bounds,
        })
    }

    /// 以 `ndarray` 数组构造. `filter` 必须是标准布局, 其元素即为系数.
    pub fn from_arrays<S, S2, D>(
        array: &ArrayBase<S, D>,
        filter: &'a ArrayBase<S2, D>,
        footprint: Option<&Footprint>,
        options: &FilterOptions,
    ) -> FilterResult<Self>
    where
        S: Data,
        S2: Data<Elem = T>,
        D: Dimension,
    {
        let coefficients = filter.as_slice().ok_or(FilterError::NonContiguous)?;
        Self::new(
            array.shape(),
            array.strides(),
            filter.shape(),
            coefficients,
            footprint,
            options,
        )
    }

    /// 当前区域的偏移行, 可能包含边界标记.
    #[inline]
    pub fn raw_offsets(&self) -> &[isize] {
        &self.table.offsets()[self.cur..self.cur + self.tap_count()]
    }

    /// 第 `j` 个抽头在当前区域下的偏移. 无有效源时返回 `None`.
    ///
    /// `j` 不小于 [`Self::tap_count`] 时 panic.
    #[inline]
    pub fn tap_offset(&self, j: usize) -> Option<isize> {
        let o = self.raw_offsets()[j];
        (o != self.table.border_flag()).then_some(o)
    }

    /// 第 `j` 个抽头的 (压缩后) 系数. 与当前区域无关.
    #[inline]
    pub fn coefficient(&self, j: usize) -> &T {
        &self.coefficients[j]
    }

    /// 全部 (压缩后) 系数.
    #[inline]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// 系数是否为迭代器私有的压缩副本.
    #[inline]
    pub fn owns_coefficients(&self) -> bool {
        matches!(self.coefficients, Cow::Owned(_))
    }

    /// 读取位于 `data[at]` 的元素的第 `j` 个邻居.
    ///
    /// 该抽头在当前区域没有有效源 (`Constant` 越界) 时返回 `None`.
    /// `at` 是元素相对于 `data` 起点的内存偏移. 解析出的位置越出 `data` 时 panic.
    #[inline]
    pub fn retrieve<E: Copy>(&self, data: &[E], at: usize, j: usize) -> Option<E> {
        let off = self.tap_offset(j)?;
        Some(data[(at as isize + off) as usize])
    }

    /// 写入位于 `data[at]` 的元素的第 `j` 个邻居.
    ///
    /// 不检查边界标记, 调用方必须事先通过 [`Self::retrieve`] 或 [`Self::tap_offset`]
    /// 确认该抽头有效. `j` 越界或解析出的位置越出 `data` 时 panic.
    #[inline]
    pub fn set<E>(&self, data: &mut [E], at: usize, j: usize, value: E) {
        let off = self.raw_offsets()[j];
        data[(at as isize + off) as usize] = value;
    }

    /// 主遍历前进一个元素之后调用, 使当前偏移行跟上新位置.
    ///
    /// 从最内层轴向外检查.
    /// 索引回绕为 0 的轴退回该轴的起始行, 并继续向外进位;
    /// 遇到第一个未回绕的轴时, 若其新索引越过步进边界则前进一行, 然后停止.
    ///
    /// 调用次数不应超过数组元素个数; 恰好走完整个数组时, 当前行回到起点.
    pub fn step<I: Traversal + ?Sized>(&mut self, it: &I) {
        debug_assert_eq!(it.ndim(), self.strides.len());
        let mut state = match self.strides.len() {
            0 => Carry::Settled,
            rank => Carry::Axis(rank - 1),
        };
        loop {
            state = match state {
                Carry::Settled => break,
                Carry::Axis(axis) => {
                    debug_assert_eq!(it.dimension(axis), self.table.layout().axis(axis).extent());
                    let q = it.index(axis);
                    if q != 0 {
                        let (low, high) = self.bounds[axis];
                        if !(low..high).contains(&q) {
                            self.cur += self.strides[axis];
                        }
                        Carry::Settled
                    } else {
                        debug_assert!(self.cur >= self.backstrides[axis]);
                        self.cur -= self.backstrides[axis];
                        match axis {
                            0 => Carry::Settled,
                            _ => Carry::Axis(axis - 1),
                        }
                    }
                }
            };
        }
        debug_assert!(self.cur + self.tap_count() <= self.table.offsets().len());
    }

    /// 随机定位到任意元素 `position` 所在的区域.
    ///
    /// 用于从数组中途开始 (例如分块) 的主遍历.
    /// `position` 的维数或任一轴上的索引越界时 panic.
    pub fn seek(&mut self, position: &[usize]) {
        let layout = self.table.layout();
        assert_eq!(position.len(), layout.ndim(), "seek: rank mismatch");
        for (axis, &p) in layout.axes().iter().zip(position) {
            assert!(p < axis.extent(), "seek: {position:?} is outside the array");
        }
        self.cur = self.table.layout().region_of(position) * self.tap_count();
    }

    /// 回到首元素所在的区域.
    #[inline]
    pub fn reset(&mut self) {
        self.cur = 0;
    }

    /// 当前区域号.
    #[inline]
    pub fn region(&self) -> usize {
        self.cur / self.tap_count()
    }

    /// 第 `j` 个抽头在当前区域下的逐轴坐标偏移. 未启用坐标表时返回 `None`.
    #[inline]
    pub fn tap_coordinates(&self, j: usize) -> Option<&[isize]> {
        self.table.coordinates(self.region(), j)
    }

    /// 有效抽头个数 `T`.
    #[inline]
    pub fn tap_count(&self) -> usize {
        self.table.tap_count()
    }

    /// 边界标记值.
    #[inline]
    pub fn border_flag(&self) -> isize {
        self.table.border_flag()
    }

    /// 区域布局.
    #[inline]
    pub fn layout(&self) -> &RegionLayout {
        self.table.layout()
    }

    /// 底层偏移表.
    #[inline]
    pub fn table(&self) -> &OffsetTable {
        &self.table
    }
}

impl<'a, T: Clone + Zero> FilterIterator<'a, T> {
    /// 以 `filter` 中的非零权重作为 footprint 构造迭代器.
    pub fn from_weights<S, S2, D>(
        array: &ArrayBase<S, D>,
        filter: &'a ArrayBase<S2, D>,
        options: &FilterOptions,
    ) -> FilterResult<Self>
    where
        S: Data,
        S2: Data<Elem = T>,
        D: Dimension,
    {
        let coefficients = filter.as_slice().ok_or(FilterError::NonContiguous)?;
        let footprint = Footprint::from_nonzero(coefficients);
        Self::from_arrays(array, filter, Some(&footprint), options)
    }
}

impl<'a, T: Clone> Index<usize> for FilterIterator<'a, T> {
    type Output = T;

    #[inline]
    fn index(&self, j: usize) -> &Self::Output {
        self.coefficient(j)
    }
}

#[cfg(test)]
mod tests {
    use super::FilterIterator;
    use crate::traverse::{PosIter, RowMajorCursor};
    use crate::{ExtendMode, FilterError, FilterOptions, Footprint};
    use ndarray::{array, s, Array2, Array3, ShapeBuilder};

    fn opts(mode: ExtendMode) -> FilterOptions {
        FilterOptions::default().with_mode(mode)
    }

    /// 同步走完整个数组, 收集每个元素的区域号.
    fn walk_regions<T: Clone>(fi: &mut FilterIterator<T>, shape: &[usize]) -> Vec<usize> {
        let mut cursor = RowMajorCursor::standard(shape);
        let mut regions = vec![fi.region()];
        while cursor.advance() {
            fi.step(&cursor);
            regions.push(fi.region());
        }
        // 最后一步所有轴同时回绕.
        fi.step(&cursor);
        regions
    }

    #[test]
    fn test_region_sequence_matches_classifier() {
        let shape = [4, 6, 5];
        let a = Array3::<f32>::zeros(shape);
        let w = Array3::<f32>::ones((3, 4, 1));
        let mut fi = FilterIterator::from_arrays(&a, &w, None, &opts(ExtendMode::Wrap)).unwrap();

        let expected: Vec<_> = PosIter::new(&shape)
            .map(|p| fi.layout().region_of(&p))
            .collect();
        assert_eq!(walk_regions(&mut fi, &shape), expected);
        assert_eq!(fi.region(), 0);
    }

    #[test]
    fn test_nearest_scenario() {
        let data = [10, 11, 12, 13, 14];
        let w = [1, 2, 3];
        let o = opts(ExtendMode::Nearest);
        let mut fi = FilterIterator::new(&[5], &[1], &[3], &w, None, &o).unwrap();
        let mut cursor = RowMajorCursor::standard(&[5]);
        let mut seen = vec![];
        loop {
            let at = cursor.offset() as usize;
            seen.push((0..3).map(|j| fi.retrieve(&data, at, j).unwrap()).collect::<Vec<_>>());
            if !cursor.advance() {
                break;
            }
            fi.step(&cursor);
        }
        assert_eq!(seen[0], [10, 10, 11]);
        assert_eq!(seen[2], [11, 12, 13]);
        assert_eq!(seen[4], [13, 14, 14]);
        assert_eq!((fi[0], fi[1], fi[2]), (1, 2, 3));
        assert!(!fi.owns_coefficients());
    }

    #[test]
    fn test_constant_scenario() {
        let o = opts(ExtendMode::Constant);
        let mut fi = FilterIterator::new(&[5], &[1], &[3], &[1u8; 3], None, &o).unwrap();
        assert_eq!(fi.tap_offset(0), None);
        assert_eq!(fi.raw_offsets()[0], fi.border_flag());
        for p in 1..5 {
            fi.seek(&[p]);
            let invalid: Vec<_> = (0..3).filter(|&j| fi.tap_offset(j).is_none()).collect();
            match p {
                4 => assert_eq!(invalid, [2]),
                _ => assert!(invalid.is_empty()),
            }
        }
    }

    #[test]
    fn test_wrap_corner_2d() {
        let a = Array2::<u16>::from_shape_fn((4, 4), |(i, j)| (i * 4 + j) as u16);
        let w = Array2::<u16>::ones((3, 3));
        let fi = FilterIterator::from_arrays(&a, &w, None, &opts(ExtendMode::Wrap)).unwrap();
        let data = a.as_slice().unwrap();
        assert_eq!(fi.retrieve(data, 0, 0), Some(a[(3, 3)]));
    }

    #[test]
    fn test_compressed_weights() {
        let a = Array2::<f64>::zeros((5, 5));
        let w = array![[0.0, 0.5, 0.0], [0.25, 1.0, 0.25], [0.0, 0.5, 0.0]];
        let fi = FilterIterator::from_weights(&a, &w, &FilterOptions::default()).unwrap();
        assert_eq!(fi.tap_count(), 5);
        assert_eq!(fi.coefficients(), &[0.5, 0.25, 1.0, 0.25, 0.5]);
        assert!(fi.owns_coefficients());
        for j in 0..5 {
            assert_eq!(fi.table().cell(j), [1, 3, 4, 5, 7][j]);
        }

        let dense = FilterOptions::default().with_compress(false);
        let plain = FilterIterator::from_weights(&a, &w, &dense).unwrap();
        assert_eq!(plain.tap_count(), 9);
        assert!(!plain.owns_coefficients());
    }

    #[test]
    fn test_write_through_tap() {
        let mut data = vec![0i32; 12];
        let fp = Footprint::new(vec![false, false, true]);
        let o = opts(ExtendMode::Constant);
        let w = [0, 0, 7];
        let mut fi = FilterIterator::new(&[3, 4], &[4, 1], &[1, 3], &w, Some(&fp), &o).unwrap();
        assert_eq!(fi.tap_count(), 1);
        assert_eq!(fi[0], 7);
        // (1, 1) 的右邻居是 (1, 2).
        fi.seek(&[1, 1]);
        assert_eq!(fi.retrieve(&data, 5, 0), Some(0));
        fi.set(&mut data, 5, 0, 9);
        assert_eq!(data[6], 9);
    }

    #[test]
    #[should_panic]
    fn test_tap_index_past_count_panics() {
        let o = opts(ExtendMode::Constant);
        let fi = FilterIterator::new(&[5], &[1], &[3], &[1u8; 3], None, &o).unwrap();
        // 区域 0 之后紧跟着区域 1 的偏移行, 不能被当作第 3 个抽头读出.
        let _ = fi.tap_offset(3);
    }

    #[test]
    #[should_panic]
    fn test_set_past_count_panics() {
        let mut data = vec![0u8; 5];
        let o = opts(ExtendMode::Nearest);
        let mut fi = FilterIterator::new(&[5], &[1], &[3], &[1u8; 3], None, &o).unwrap();
        fi.seek(&[2]);
        fi.set(&mut data, 2, 3, 1);
    }

    #[test]
    #[should_panic]
    fn test_seek_outside_array_panics() {
        let a = Array2::<u8>::zeros((5, 5));
        let w = Array2::<u8>::ones((3, 3));
        let mut fi = FilterIterator::from_arrays(&a, &w, None, &opts(ExtendMode::Wrap)).unwrap();
        fi.seek(&[9, 9]);
    }

    #[test]
    fn test_seek_last_element() {
        let a = Array2::<u8>::zeros((5, 5));
        let w = Array2::<u8>::ones((3, 3));
        let mut fi = FilterIterator::from_arrays(&a, &w, None, &opts(ExtendMode::Wrap)).unwrap();
        fi.seek(&[4, 4]);
        assert_eq!(fi.region(), fi.layout().region_count() - 1);
        fi.reset();
        assert_eq!(fi.region(), 0);
    }

    #[test]
    fn test_tap_coordinates() {
        let o = opts(ExtendMode::Reflect).with_coordinates(true);
        let mut fi = FilterIterator::new(&[3, 3], &[3, 1], &[3, 3], &[1; 9], None, &o).unwrap();
        assert_eq!(fi.tap_coordinates(0), Some(&[0isize, 0][..]));
        fi.seek(&[1, 1]);
        assert_eq!(fi.tap_coordinates(0), Some(&[-1isize, -1][..]));
        assert_eq!(fi.tap_coordinates(5), Some(&[0isize, 1][..]));
    }

    #[test]
    fn test_fortran_layout_strides() {
        let a = Array2::<i32>::from_shape_fn((3, 4).f(), |(i, j)| (i * 10 + j) as i32);
        let w = Array2::<i32>::ones((3, 3));
        let fi = FilterIterator::from_arrays(&a, &w, None, &opts(ExtendMode::Nearest)).unwrap();
        let data = a.as_slice_memory_order().unwrap();
        // (0, 0) 左上抽头截断到自身, 右下抽头为 (1, 1).
        assert_eq!(fi.retrieve(data, 0, 0), Some(0));
        assert_eq!(fi.retrieve(data, 0, 8), Some(11));
    }

    #[test]
    fn test_construction_errors() {
        let o = FilterOptions::default();
        assert_eq!(
            FilterIterator::new(&[4], &[1], &[3], &[1, 2], None, &o).unwrap_err(),
            FilterError::CoefficientCount(3, 2)
        );
        assert_eq!(
            FilterIterator::new(&[4, 4], &[4, 1], &[3], &[1, 2, 3], None, &o).unwrap_err(),
            FilterError::RankMismatch(2, 1)
        );
        let a = Array2::<u8>::zeros((4, 4));
        let w = Array2::<u8>::ones((3, 6));
        assert_eq!(
            FilterIterator::from_arrays(&a, &w.slice(s![.., ..;2]), None, &o).unwrap_err(),
            FilterError::NonContiguous
        );
        let zero = Array2::<u8>::zeros((3, 3));
        assert_eq!(
            FilterIterator::from_weights(&a, &zero, &o).unwrap_err(),
            FilterError::EmptyFootprint
        );
    }
}
