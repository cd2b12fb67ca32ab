//! JavaScript 数值解析
//! 1. `parse_js_int`：与 `parseInt(text, 10)` 一致，跳过前导空白，可选正负号，取最长的十进制数字前缀
//! 2. `parse_number_literal`：按数值字面量语法求真实值（分隔符、进制前缀、小数、指数、BigInt 后缀）

/// 解析结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsInt {
    Number(i64),
    NaN,
}

/// 解析整数前缀，超出 i64 范围时饱和
pub fn parse_js_int(text: &str) -> JsInt {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        let digit = i64::from(byte - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    if seen_digit {
        JsInt::Number(value)
    } else {
        JsInt::NaN
    }
}

/// 数值字面量的真实值；不是合法字面量时返回 None
pub fn parse_number_literal(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '_').collect();
    let body = cleaned.strip_suffix('n').unwrap_or(&cleaned);

    let radix = match body.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => 10,
    };
    if radix != 10 {
        return parse_radix_digits(&body[2..], radix);
    }

    // 旧式八进制：0 开头且全部为 0-7
    if body.len() > 1 && body.starts_with('0') && body.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return parse_radix_digits(&body[1..], 8);
    }

    if !body.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    body.parse::<f64>().ok()
}

fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for c in digits.chars() {
        let digit = c.to_digit(radix)?;
        value = value * f64::from(radix) + f64::from(digit);
    }
    Some(value)
}

/// 向零截断并饱和到 i64
pub fn truncate_to_js_int(value: f64) -> JsInt {
    if value.is_nan() {
        JsInt::NaN
    } else {
        JsInt::Number(value.trunc() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_js_int("500"), JsInt::Number(500));
        assert_eq!(parse_js_int("  42"), JsInt::Number(42));
        assert_eq!(parse_js_int("-7"), JsInt::Number(-7));
        assert_eq!(parse_js_int("+7"), JsInt::Number(7));
        assert_eq!(parse_js_int("007"), JsInt::Number(7));
    }

    #[test]
    fn test_prefix_semantics() {
        assert_eq!(parse_js_int("10.9"), JsInt::Number(10));
        assert_eq!(parse_js_int("5e3"), JsInt::Number(5));
        assert_eq!(parse_js_int("0x10"), JsInt::Number(0));
        assert_eq!(parse_js_int("100 * 10"), JsInt::Number(100));
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(parse_js_int("'abc'"), JsInt::NaN);
        assert_eq!(parse_js_int("abc"), JsInt::NaN);
        assert_eq!(parse_js_int(""), JsInt::NaN);
        assert_eq!(parse_js_int("-"), JsInt::NaN);
        assert_eq!(parse_js_int("__ENV.VUS"), JsInt::NaN);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(parse_js_int("99999999999999999999999"), JsInt::Number(i64::MAX));
        assert_eq!(parse_js_int("-99999999999999999999999"), JsInt::Number(i64::MIN));
    }

    #[test]
    fn test_number_literal_forms() {
        assert_eq!(parse_number_literal("1e6"), Some(1_000_000.0));
        assert_eq!(parse_number_literal("5E2"), Some(500.0));
        assert_eq!(parse_number_literal("0x3E8"), Some(1000.0));
        assert_eq!(parse_number_literal("0o1750"), Some(1000.0));
        assert_eq!(parse_number_literal("0b1111101000"), Some(1000.0));
        assert_eq!(parse_number_literal("1_000_000"), Some(1_000_000.0));
        assert_eq!(parse_number_literal("501.9"), Some(501.9));
        assert_eq!(parse_number_literal(".5"), Some(0.5));
        assert_eq!(parse_number_literal("1000n"), Some(1000.0));
        assert_eq!(parse_number_literal("0777"), Some(511.0));
        assert_eq!(parse_number_literal("0"), Some(0.0));
    }

    #[test]
    fn test_number_literal_rejects_non_numbers() {
        assert_eq!(parse_number_literal("'abc'"), None);
        assert_eq!(parse_number_literal("0x"), None);
        assert_eq!(parse_number_literal("0xZZ"), None);
        assert_eq!(parse_number_literal("inf"), None);
        assert_eq!(parse_number_literal(""), None);
    }

    #[test]
    fn test_truncate_to_js_int() {
        assert_eq!(truncate_to_js_int(501.9), JsInt::Number(501));
        assert_eq!(truncate_to_js_int(-1.5), JsInt::Number(-1));
        assert_eq!(truncate_to_js_int(f64::INFINITY), JsInt::Number(i64::MAX));
        assert_eq!(truncate_to_js_int(1e300), JsInt::Number(i64::MAX));
        assert_eq!(truncate_to_js_int(f64::NAN), JsInt::NaN);
    }
}
