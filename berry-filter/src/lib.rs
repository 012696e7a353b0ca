#![warn(missing_docs)]

//! N 维数组滑动窗口滤波的邻域访问引擎.
//!
//! 卷积, 形态学腐蚀/膨胀, 秩滤波, 距离变换等一切滑动窗口运算都需要回答同一个问题:
//! 对数组中的每个元素, 窗口中的每个抽头对应哪个源元素? 靠近边缘时又该如何处理?
//! 该 crate 只回答这个问题, 不对元素值做任何计算.
//!
//! # 组成
//!
//! ### Footprint 压缩 ✅
//!
//! 只保留窗口中有效 (非零, 或结构元素中为 "开") 的抽头, 系数随之压缩为私有副本.
//!
//! 实现位于 `berry-filter/src/footprint.rs`.
//!
//! ### 边界感知偏移表 ✅
//!
//! 按每个轴的 "低边缘 / 内部 / 高边缘" 划分区域, 为每个区域的每个有效抽头预先算好线性偏移.
//! 越界抽头按扩展模式 (`Nearest`, `Wrap`, `Reflect`, `Mirror`, `Constant`) 解析;
//! `Constant` 模式下写入边界标记.
//!
//! 实现位于 `berry-filter/src/zone.rs` 和 `berry-filter/src/offsets.rs`.
//!
//! ### 同步步进迭代器 ✅
//!
//! 跟随调用方的行优先主遍历, 以混合进制进位 ("里程表") 的方式在偏移表中换行,
//! 每个元素均摊 O(1).
//!
//! 实现位于 `berry-filter/src/iterator.rs`.
//!
//! # 注意
//!
//! 1. 一个 [`FilterIterator`] 只服务于一次滤波调用, 不可跨线程共享步进.
//!   多个独立实例可以并发读取同一个数组.
//! 2. 通过 [`FilterIterator::set`] 原地写入时, 读写冲突由调用方负责.
//! 3. 在非期望情况下 (例如传入的数据切片与构造时的形状不符), 程序会直接 panic,
//!   而不会导致内存错误.

mod error;
mod iterator;
mod options;

pub mod extend;
pub mod footprint;
pub mod offsets;
pub mod prelude;
pub mod traverse;
pub mod zone;

pub use error::{FilterError, FilterResult};
pub use extend::ExtendMode;
pub use footprint::Footprint;
pub use iterator::FilterIterator;
pub use offsets::OffsetTable;
pub use options::FilterOptions;
