//! 滤波迭代器配置.

use crate::extend::ExtendMode;

/// 构造 [`crate::FilterIterator`] 时可识别的选项.
///
/// 默认值: `Mirror` 扩展, 窗口居中, 有掩码时压缩, 不生成坐标偏移表.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterOptions {
    /// 边界扩展模式.
    pub mode: ExtendMode,

    /// 每个轴的原点偏移. `None` 代表窗口居中 (全 0).
    pub origins: Option<Vec<isize>>,

    /// 是否按 footprint 压缩. 为 `false` 时忽略 footprint, 所有抽头有效.
    pub compress: bool,

    /// 是否同时生成每个抽头的逐轴坐标偏移.
    pub coordinates: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            mode: ExtendMode::default(),
            origins: None,
            compress: true,
            coordinates: false,
        }
    }
}

impl FilterOptions {
    /// 设置扩展模式.
    #[inline]
    pub fn with_mode(mut self, mode: ExtendMode) -> Self {
        self.mode = mode;
        self
    }

    /// 设置原点偏移.
    #[inline]
    pub fn with_origins(mut self, origins: Vec<isize>) -> Self {
        self.origins = Some(origins);
        self
    }

    /// 设置是否压缩.
    #[inline]
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// 设置是否生成坐标偏移表.
    #[inline]
    pub fn with_coordinates(mut self, coordinates: bool) -> Self {
        self.coordinates = coordinates;
        self
    }
}
