//! 边界扩展模式.
//!
//! 邻域位置越出数组某个轴的 `[0, len)` 范围时, 由扩展模式决定它映射到哪个源位置,
//! 或者被标记为无效.

use crate::error::FilterError;
use std::str::FromStr;

/// 边界扩展模式.
///
/// 以一维数组 `abcd` 为例, 各模式向两侧扩展的结果为:
///
/// | 模式 | 扩展结果 |
/// | --- | --- |
/// | `Nearest` | `aaa\|abcd\|ddd` |
/// | `Wrap` | `bcd\|abcd\|abc` |
/// | `Reflect` | `cba\|abcd\|dcb` |
/// | `Mirror` | `dcb\|abcd\|cba` |
/// | `Constant` | `???\|abcd\|???` (无有效源) |
///
/// 默认值为 `Mirror`. 注意 `Nearest` 和 `Mirror` 是两种完全不同的模式.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExtendMode {
    /// 截断到最近的边缘元素.
    Nearest,

    /// 循环.
    Wrap,

    /// 以边界为轴镜像, 边缘元素重复一次.
    Reflect,

    /// 以边缘元素为轴镜像, 边缘元素不重复.
    #[default]
    Mirror,

    /// 越界位置没有有效源, 由上层算法填充常量.
    Constant,
}

impl ExtendMode {
    /// 全部模式, 按编号排列.
    pub const ALL: [ExtendMode; 5] = [
        Self::Nearest,
        Self::Wrap,
        Self::Reflect,
        Self::Mirror,
        Self::Constant,
    ];

    /// 是否为 `Constant` 模式. 只有该模式会在偏移表中写入边界标记.
    #[inline]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Constant)
    }

    /// 模式名 (小写).
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Wrap => "wrap",
            Self::Reflect => "reflect",
            Self::Mirror => "mirror",
            Self::Constant => "constant",
        }
    }

    /// 将某个轴上可能越界的坐标 `coord` 映射到长度为 `len` 的轴上的源位置.
    ///
    /// 任意远的越界坐标都按周期处理. 仅当模式为 `Constant` 且 `coord` 越界时返回 `None`.
    ///
    /// `len` 必须大于 0.
    pub fn resolve(self, coord: isize, len: usize) -> Option<usize> {
        debug_assert!(len > 0);
        let n = len as isize;
        if (0..n).contains(&coord) {
            return Some(coord as usize);
        }
        let c = match self {
            Self::Nearest => coord.clamp(0, n - 1),
            Self::Wrap => coord.rem_euclid(n),
            Self::Reflect => {
                let period = 2 * n;
                let c = coord.rem_euclid(period);
                if c >= n {
                    period - 1 - c
                } else {
                    c
                }
            }
            Self::Mirror if n == 1 => 0,
            Self::Mirror => {
                let period = 2 * n - 2;
                let c = coord.rem_euclid(period);
                if c >= n {
                    period - c
                } else {
                    c
                }
            }
            Self::Constant => return None,
        };
        Some(c as usize)
    }
}

/// 按 `0 = Nearest, 1 = Wrap, 2 = Reflect, 3 = Mirror, 4 = Constant` 编号转换.
impl TryFrom<u8> for ExtendMode {
    type Error = FilterError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(FilterError::UnknownMode(value))
    }
}

/// 不区分大小写.
impl FromStr for ExtendMode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FilterError::UnknownModeName(s.to_string()))
    }
}
