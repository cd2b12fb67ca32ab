//! 工具模块：输入守卫、违规去重、整数解析
pub mod input_guard;
pub mod violation_collector;
pub mod js_int;

pub use self::input_guard::{ScriptInputGuard, SizeViolation};
pub use self::violation_collector::ViolationCollector;
pub use self::js_int::{parse_js_int, parse_number_literal, truncate_to_js_int, JsInt};
