//! 表驱动邻域访问与逐元素暴力边界解析的消融对比.
//!
//! 用法: `stepping [scale]`. `scale` 默认为 1.

mod algos;
mod result;
mod runner;

use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .expect("Logger init error");

    let scale = std::env::args()
        .nth(1)
        .map(|s| s.parse::<usize>().expect("`scale` must be a positive integer"))
        .unwrap_or(1);

    runner::run(scale).analyze();
}
