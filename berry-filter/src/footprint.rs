//! Footprint 压缩.
//!
//! 稠密窗口中往往只有部分单元真正参与运算 (非零权重, 或结构元素中为 "开" 的单元).
//! 压缩只保留这些有效抽头, 使偏移表的列数和系数个数一起缩小.

use crate::error::{FilterError, FilterResult};
use num::Zero;
use std::borrow::Cow;

/// 窗口单元的有效性掩码, 按窗口行优先顺序排列.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Footprint(Vec<bool>);

impl Footprint {
    /// 由掩码直接构造.
    #[inline]
    pub fn new(mask: Vec<bool>) -> Self {
        Self(mask)
    }

    /// 以非零权重作为有效单元.
    pub fn from_nonzero<T: Zero>(weights: &[T]) -> Self {
        Self(weights.iter().map(|w| !w.is_zero()).collect())
    }

    /// 掩码长度, 即窗口大小.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 掩码是否为空.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 有效单元个数.
    #[inline]
    pub fn active(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// 底层掩码.
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for Footprint {
    fn from(value: Vec<bool>) -> Self {
        Self(value)
    }
}

impl FromIterator<bool> for Footprint {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 压缩结果.
///
/// 系数以 `Cow` 保存: 没有掩码时直接借用调用方的缓冲区, 有掩码时持有压缩后的私有副本,
/// 随该结构 (或接管它的迭代器) 一起释放.
#[derive(Clone, Debug)]
pub struct Compressed<'a, 'm, T: Clone> {
    active: usize,
    coefficients: Cow<'a, [T]>,
    mask: Option<&'m [bool]>,
}

impl<'a, 'm, T: Clone> Compressed<'a, 'm, T> {
    /// 有效抽头个数.
    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    /// 压缩后的系数.
    #[inline]
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// 交给偏移表使用的掩码. 没有压缩时为 `None`.
    #[inline]
    pub fn mask(&self) -> Option<&'m [bool]> {
        self.mask
    }

    /// 系数是否为私有副本.
    #[inline]
    pub fn owns_coefficients(&self) -> bool {
        matches!(self.coefficients, Cow::Owned(_))
    }

    /// 拆分出系数.
    #[inline]
    pub(crate) fn into_coefficients(self) -> Cow<'a, [T]> {
        self.coefficients
    }
}

/// 按 `footprint` 压缩 `coefficients`.
///
/// 没有 `footprint` 时压缩是空操作: 所有抽头有效, 系数被原样借用.
///
/// # 返回值
///
/// - 掩码长度与系数个数不同时, 返回 `Err(FilterError::FootprintSize)`;
/// - 掩码全为 `false` 时, 返回 `Err(FilterError::EmptyFootprint)`.
pub fn compress<'a, 'm, T: Clone>(
    coefficients: &'a [T],
    footprint: Option<&'m Footprint>,
) -> FilterResult<Compressed<'a, 'm, T>> {
    let Some(fp) = footprint else {
        return Ok(Compressed {
            active: coefficients.len(),
            coefficients: Cow::Borrowed(coefficients),
            mask: None,
        });
    };
    if fp.len() != coefficients.len() {
        return Err(FilterError::FootprintSize(coefficients.len(), fp.len()));
    }
    let kept: Vec<T> = coefficients
        .iter()
        .zip(fp.as_slice())
        .filter_map(|(c, &on)| on.then(|| c.clone()))
        .collect();
    if kept.is_empty() {
        return Err(FilterError::EmptyFootprint);
    }
    Ok(Compressed {
        active: kept.len(),
        coefficients: Cow::Owned(kept),
        mask: Some(fp.as_slice()),
    })
}
