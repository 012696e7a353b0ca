//! 构造期错误.

use std::fmt::{self, Formatter};

/// 构造偏移表或滤波迭代器时的配置错误.
///
/// 所有错误都在建表之前 (或建表时分配之前) 报告, 内部不做任何恢复,
/// 由调用方的滤波算法决定是否继续上报.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterError {
    /// 数组与窗口的维数不一致. 第一个参数为数组维数, 第二个参数为窗口维数.
    RankMismatch(usize, usize),

    /// 数组步长个数与维数不一致. 第一个参数为数组维数, 第二个参数为步长个数.
    StrideRankMismatch(usize, usize),

    /// 数组在某个轴上的长度为 0. 参数为轴序号.
    ZeroExtent(usize),

    /// 窗口在某个轴上的长度为 0. 参数为轴序号.
    EmptyWindow(usize),

    /// 原点偏移个数与维数不一致. 第一个参数为维数, 第二个参数为原点偏移个数.
    OriginRank(usize, usize),

    /// 原点偏移超出窗口范围. `(axis, origin, window)`
    ///
    /// 合法范围为 `-(window / 2) <= origin <= (window - 1) / 2`.
    OriginOutOfRange(usize, isize, usize),

    /// 滤波系数个数与窗口大小不一致. 第一个参数为窗口大小, 第二个参数为实际系数个数.
    CoefficientCount(usize, usize),

    /// footprint 长度与窗口大小不一致. 第一个参数为期望长度, 第二个参数为实际长度.
    FootprintSize(usize, usize),

    /// footprint 全部为 `false`, 不存在任何有效抽头.
    EmptyFootprint,

    /// 窗口数组不是标准 (行优先, 连续) 布局, 无法直接借用其系数.
    NonContiguous,

    /// 未知的边界扩展模式编号.
    UnknownMode(u8),

    /// 未知的边界扩展模式名称.
    UnknownModeName(String),

    /// 偏移表规模超出可表示范围 (资源耗尽).
    TooLarge,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::RankMismatch(a, w) => write!(f, "array rank {a} does not match window rank {w}"),
            Self::StrideRankMismatch(a, s) => {
                write!(f, "array rank {a} does not match stride count {s}")
            }
            Self::ZeroExtent(axis) => write!(f, "array extent along axis {axis} is zero"),
            Self::EmptyWindow(axis) => write!(f, "window extent along axis {axis} is zero"),
            Self::OriginRank(r, o) => write!(f, "rank {r} does not match origin count {o}"),
            Self::OriginOutOfRange(axis, origin, window) => write!(
                f,
                "origin {origin} along axis {axis} is out of range for window extent {window}"
            ),
            Self::CoefficientCount(e, n) => {
                write!(f, "window holds {e} cells but {n} coefficients were given")
            }
            Self::FootprintSize(e, n) => write!(f, "footprint of length {n}, expected {e}"),
            Self::EmptyFootprint => f.write_str("footprint has no active taps"),
            Self::NonContiguous => f.write_str("filter array is not in standard layout"),
            Self::UnknownMode(code) => write!(f, "unknown extend mode code {code}"),
            Self::UnknownModeName(name) => write!(f, "unknown extend mode `{name}`"),
            Self::TooLarge => f.write_str("offset table size overflows"),
        }
    }
}

impl std::error::Error for FilterError {}

/// 构造期结果.
pub type FilterResult<T> = Result<T, FilterError>;
