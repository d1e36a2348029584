//! 欠損値（NaN）の扱い
//!
//! 数値列の欠損値は浮動小数点の NaN で表現する。比較には許容誤差つきの
//! `element_equal` を使い、NaN 同士は等しいとみなす。

/// 欠損値を表す番兵値
pub const NAN: f64 = f64::NAN;

/// 欠損値を持ち得る要素型の共通トレイト
pub trait NaNAware {
    /// 欠損値かどうか
    fn is_nan_value(&self) -> bool;
}

macro_rules! impl_never_nan {
    ($($t:ty),*) => {
        $(
            impl NaNAware for $t {
                #[inline]
                fn is_nan_value(&self) -> bool {
                    false
                }
            }
        )*
    };
}

impl_never_nan!(bool, i32, i64, u64, String);

impl NaNAware for f64 {
    #[inline]
    fn is_nan_value(&self) -> bool {
        self.is_nan()
    }
}

/// 浮動小数点の許容誤差つき比較
///
/// 両方が NaN なら等しい。それ以外は相対誤差 `f64::EPSILON` で比較する。
pub fn element_equal(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a == b {
        return true;
    }
    if a.is_infinite() || b.is_infinite() {
        return false;
    }
    let scale = 1.0_f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= f64::EPSILON * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_equals_nan() {
        assert!(element_equal(NAN, NAN));
        assert!(!element_equal(NAN, 1.0));
        assert!(!element_equal(1.0, NAN));
    }

    #[test]
    fn tolerant_compare() {
        assert!(element_equal(0.1 + 0.2, 0.3));
        assert!(!element_equal(1.0, 1.0001));
        assert!(element_equal(f64::INFINITY, f64::INFINITY));
        assert!(!element_equal(f64::INFINITY, f64::NEG_INFINITY));
    }

    #[test]
    fn nan_awareness() {
        assert!(NAN.is_nan_value());
        assert!(!3_i64.is_nan_value());
        assert!(!String::from("x").is_nan_value());
    }
}
