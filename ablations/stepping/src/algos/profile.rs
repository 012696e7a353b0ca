//! 算法运行统计.

use std::time::{Duration, Instant};

/// ablation/benchmark 计时器.
///
/// 该计时器支持 "中途中断" 与 "结束中断, 继续开始计时".
#[derive(Clone, Debug)]
struct AccTimer {
    consumed: Duration,
    since: Instant,
}

impl AccTimer {
    /// 初始化计时器. 初始化时会视为已经开始计时 (`self.start()`).
    #[inline]
    pub fn new() -> Self {
        Self {
            consumed: Duration::from_secs(0),
            since: Instant::now(),
        }
    }

    /// 开始计时.
    #[inline]
    pub fn start(&mut self) {
        self.since = Instant::now();
    }

    /// 结束计时, 并将这一区间的时间累加.
    ///
    /// # 注意
    ///
    /// 上一次调用必须是 `self.start()`, 否则计算时间值无意义.
    #[inline]
    pub fn elapsed(&mut self) {
        self.consumed += self.since.elapsed();
    }

    /// 获得总共累计下来的时间综合 (以微秒为单位).
    #[inline]
    pub fn get_total_us(&self) -> u64 {
        self.consumed.as_micros() as u64
    }

    /// 获得总共累计下来的时间综合 (以纳秒为单位).
    #[inline]
    pub fn get_total_ns(&self) -> u128 {
        self.consumed.as_nanos()
    }
}

impl Default for AccTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// ablation/benchmark 数据统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 已完成的几何参数组数.
    cases: u64,

    /// 访问过的元素个数.
    elements: u64,

    /// 解析过的抽头个数 (含无有效源的抽头).
    taps: u64,

    /// 无有效源的抽头个数.
    invalid: u64,

    /// 建表等准备工作花费的时间.
    setup_time: AccTimer,

    /// 遍历花费的时间.
    target_time: AccTimer,

    /// 整个任务花费的总时间.
    real_time: AccTimer,

    /// 每组参数的校验和, 用于比对不同算法的结果.
    checksums: Vec<u64>,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new() -> Self {
        Self {
            cases: 0,
            elements: 0,
            taps: 0,
            invalid: 0,
            setup_time: AccTimer::default(),
            target_time: AccTimer::default(),
            real_time: AccTimer::default(),
            checksums: Vec::with_capacity(64),
        }
    }

    /// 开始一次准备计时.
    #[inline]
    pub fn setup_start(&mut self) {
        self.setup_time.start();
    }

    /// 结束一次准备计时.
    #[inline]
    pub fn setup_elapsed(&mut self) {
        self.setup_time.elapsed();
    }

    /// 开始一次遍历计时.
    #[inline]
    pub fn target_start(&mut self) {
        self.target_time.start();
    }

    /// 结束一次遍历计时, 并记录该组参数的统计值.
    #[inline]
    pub fn target_elapsed(&mut self, elements: u64, taps: u64, invalid: u64, checksum: u64) {
        self.target_time.elapsed();
        self.cases += 1;
        self.elements += elements;
        self.taps += taps;
        self.invalid += invalid;
        self.checksums.push(checksum);
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.elapsed();
        self
    }

    /// 获得已完成的参数组数.
    #[inline]
    pub fn get_cases(&self) -> u64 {
        self.cases
    }

    /// 获得访问过的元素个数.
    #[inline]
    pub fn get_elements(&self) -> u64 {
        self.elements
    }

    /// 获得解析过的抽头个数.
    #[inline]
    pub fn get_taps(&self) -> u64 {
        self.taps
    }

    /// 获得无有效源的抽头个数.
    #[inline]
    pub fn get_invalid(&self) -> u64 {
        self.invalid
    }

    /// 以微秒为单位获得准备工作的总时间.
    #[inline]
    pub fn get_setup_time_us(&self) -> u64 {
        self.setup_time.get_total_us()
    }

    /// 以微秒为单位获得遍历的总时间.
    #[inline]
    pub fn get_target_time_us(&self) -> u64 {
        self.target_time.get_total_us()
    }

    /// 以微秒为单位获得算法运行到目前的总自然时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.get_total_us()
    }

    /// 以纳秒为单位获得每个抽头的平均遍历时间.
    #[inline]
    pub fn get_avg_tap_time_ns(&self) -> Option<f64> {
        match self.taps {
            0 => None,
            taps => Some(self.target_time.get_total_ns() as f64 / taps as f64),
        }
    }

    /// 每组参数的校验和.
    #[inline]
    pub fn checksums(&self) -> &[u64] {
        &self.checksums
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}
