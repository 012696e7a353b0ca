//! 主遍历协作者.
//!
//! 滤波迭代器本身不遍历数组, 而是跟随调用方的行优先主遍历同步步进.
//! 这里给出主遍历需要暴露的最小接口 [`Traversal`], 以及一个可直接使用的实现
//! [`RowMajorCursor`].

use ndarray::{ArrayBase, Data, Dimension};

/// 行优先主遍历的当前状态.
pub trait Traversal {
    /// 维数.
    fn ndim(&self) -> usize;

    /// 当前元素在 `axis` 轴上的索引.
    fn index(&self, axis: usize) -> usize;

    /// `axis` 轴的长度.
    fn dimension(&self, axis: usize) -> usize;
}

/// N 维行优先索引迭代器. 最后一个轴变化最快.
///
/// 0 维形状产生恰好一个空索引; 任意轴长度为 0 时不产生任何索引.
#[derive(Debug, Clone)]
pub struct PosIter {
    cur: Vec<usize>,
    shape: Vec<usize>,
    done: bool,
}

impl PosIter {
    /// 从全零索引开始遍历 `shape`.
    #[inline]
    pub fn new(shape: &[usize]) -> Self {
        Self {
            cur: vec![0; shape.len()],
            shape: shape.to_vec(),
            done: shape.contains(&0),
        }
    }
}

impl Iterator for PosIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let ret_pos = self.cur.clone();
        self.done = !odometer_inc(&mut self.cur, &self.shape);
        Some(ret_pos)
    }
}

/// 行优先加一. 如果所有轴都发生了回绕 (即遍历结束) 则返回 `false`.
#[inline]
fn odometer_inc(cur: &mut [usize], shape: &[usize]) -> bool {
    for (c, &n) in cur.iter_mut().zip(shape).rev() {
        if *c + 1 < n {
            *c += 1;
            return true;
        }
        *c = 0;
    }
    false
}

/// 带步长的行优先游标.
///
/// 除 N 维索引外, 还同时维护当前元素相对于数组首元素的内存偏移 (以元素为单位),
/// 以便直接配合 [`crate::FilterIterator::retrieve`] 使用.
#[derive(Debug, Clone)]
pub struct RowMajorCursor {
    index: Vec<usize>,
    shape: Vec<usize>,
    strides: Vec<isize>,
    offset: isize,
}

impl RowMajorCursor {
    /// 以 `shape` 和元素单位的 `strides` 创建游标, 初始位于全零索引处.
    ///
    /// `shape` 与 `strides` 长度必须一致, 否则 panic.
    pub fn new(shape: &[usize], strides: &[isize]) -> Self {
        assert_eq!(shape.len(), strides.len());
        Self {
            index: vec![0; shape.len()],
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            offset: 0,
        }
    }

    /// 以标准布局 (行优先连续) 的步长创建游标.
    pub fn standard(shape: &[usize]) -> Self {
        let mut strides = vec![0isize; shape.len()];
        let mut acc = 1isize;
        for (s, &n) in strides.iter_mut().zip(shape).rev() {
            *s = acc;
            acc *= n as isize;
        }
        Self::new(shape, &strides)
    }

    /// 跟随 `array` 的形状与步长.
    pub fn from_array<S: Data, D: Dimension>(array: &ArrayBase<S, D>) -> Self {
        Self::new(array.shape(), array.strides())
    }

    /// 前进一个元素. 返回 `false` 代表所有轴都已回绕, 即遍历已经结束
    /// (此时游标回到全零索引).
    pub fn advance(&mut self) -> bool {
        for axis in (0..self.index.len()).rev() {
            if self.index[axis] + 1 < self.shape[axis] {
                self.index[axis] += 1;
                self.offset += self.strides[axis];
                return true;
            }
            self.offset -= self.strides[axis] * self.index[axis] as isize;
            self.index[axis] = 0;
        }
        false
    }

    /// 当前 N 维索引.
    #[inline]
    pub fn position(&self) -> &[usize] {
        &self.index
    }

    /// 当前元素相对于首元素的内存偏移.
    ///
    /// 对于含负步长的视图, 该值可能为负.
    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    /// 元素总数.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// 是否不含任何元素.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Traversal for RowMajorCursor {
    #[inline]
    fn ndim(&self) -> usize {
        self.shape.len()
    }

    #[inline]
    fn index(&self, axis: usize) -> usize {
        self.index[axis]
    }

    #[inline]
    fn dimension(&self, axis: usize) -> usize {
        self.shape[axis]
    }
}
