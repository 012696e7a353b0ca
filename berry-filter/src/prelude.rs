//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::extend::ExtendMode;
pub use crate::footprint::{compress, Footprint};
pub use crate::iterator::FilterIterator;
pub use crate::options::FilterOptions;
pub use crate::traverse::{PosIter, RowMajorCursor, Traversal};
pub use crate::{FilterError, FilterResult};
