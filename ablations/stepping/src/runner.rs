//! 程序运行函数.

use crate::result::AblationResult;
use berry_filter::ExtendMode;
use log::info;
use std::thread;
use utils::sweep;

/// 实际运行.
///
/// 每种扩展模式下分别运行两种算法, 所有任务在作用域线程中并发执行.
pub fn run(scale: usize) -> AblationResult {
    let cases = sweep::default_sweep(scale);
    info!(
        "Running ablation studies: {} cases x {} modes on {} cpus...",
        cases.len(),
        ExtendMode::ALL.len(),
        utils::cpus()
    );

    thread::scope(|s| {
        use super::algos::*;

        let cases = &cases;
        let handles = ExtendMode::ALL.map(|mode| {
            (
                mode,
                s.spawn(move || table_driven(cases, mode)),
                s.spawn(move || brute_force(cases, mode)),
            )
        });

        AblationResult::from_iter(handles.into_iter().map(|(mode, t, b)| {
            (
                mode,
                t.join().expect("Thread joining error"),
                b.join().expect("Thread joining error"),
            )
        }))
    })
}
