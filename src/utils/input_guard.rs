//! 脚本输入守卫：在进入解析 / 正则分析前
//! 保证输入不会拖垮引擎（绝对大小上限是第一道 DoS 防线）

use std::fmt;

/// 超限信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeViolation {
    pub actual: usize,
    pub max: usize,
}

impl fmt::Display for SizeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes > {} bytes", self.actual, self.max)
    }
}

pub struct ScriptInputGuard;

impl ScriptInputGuard {
    /// 按 UTF-8 字节数检查上限，恰好等于上限视为合法
    #[inline(always)]
    pub fn check_size(script: &str, max: usize) -> Result<(), SizeViolation> {
        let actual = script.len();
        if actual > max {
            return Err(SizeViolation { actual, max });
        }
        Ok(())
    }

    /// 是否为空白脚本
    #[inline(always)]
    pub fn is_blank(script: &str) -> bool {
        script.trim().is_empty()
    }
}
