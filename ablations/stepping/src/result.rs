//! 实验结果.

use crate::algos::Profile;
use berry_filter::ExtendMode;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.6}"),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Cases: {}", p.get_cases())?;
    writeln!(w, "{S4}Elements visited: {}", p.get_elements())?;
    writeln!(w, "{S4}Taps resolved: {}", p.get_taps())?;
    writeln!(w, "{S4}Taps without source: {}", p.get_invalid())?;
    writeln!(w, "{S4}Setup time: {} us", p.get_setup_time_us())?;
    writeln!(w, "{S4}Traversal time: {} us", p.get_target_time_us())?;
    writeln!(
        w,
        "{S4}Average time: {} ns per tap",
        f64_to_display(p.get_avg_tap_time_ns())
    )?;
    write!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    data: Vec<(ExtendMode, Profile, Profile)>,
}

impl AblationResult {
    pub fn from_iter<I: IntoIterator<Item = (ExtendMode, Profile, Profile)>>(it: I) -> Self {
        Self {
            data: it.into_iter().collect(),
        }
    }

    /// 两种算法逐案例结果不一致的次数.
    pub fn mismatches(&self) -> usize {
        self.data
            .iter()
            .map(|(_, t, b)| {
                t.checksums()
                    .iter()
                    .zip(b.checksums())
                    .filter(|(x, y)| x != y)
                    .count()
            })
            .sum()
    }

    /// 分析运行结果.
    pub fn analyze(&self) {
        utils::sep();
        let mut buf = Vec::with_capacity(512);

        for (mode, table, brute) in self.data.iter() {
            for (algo, profile) in [("table", table), ("brute", brute)] {
                let key = format!("{}/{algo}", mode.name());
                describe_into(&key, profile, &mut buf).unwrap();
                println!("{}", std::str::from_utf8(&buf).unwrap());
                buf.clear();
            }
            if let (Some(t), Some(b)) = (table.get_avg_tap_time_ns(), brute.get_avg_tap_time_ns()) {
                println!("Speedup `{}`: {:.2}x", mode.name(), b / t);
            }
            utils::sep();
        }
        println!("Mismatched cases: {}", self.mismatches());
    }
}
