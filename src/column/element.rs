use std::fmt::Debug;

use ndarray::ArrayD;

use crate::column::Array;
use crate::core::{DType, FromValue, Value, WideString};
use crate::na::NaNAware;

/// 列に格納できる要素型
///
/// 型ごとのコンストラクタの重複を避けるため、`Array` のバリアントとの
/// 対応をこのトレイトにまとめる。
pub trait Element: FromValue + NaNAware + Clone + Debug + 'static {
    /// 要素型のタグ
    const DTYPE: DType;

    /// セル値に変換
    fn into_value(self) -> Value;

    /// 型付き配列を `Array` に包む
    fn wrap(data: ArrayD<Self>) -> Array;

    /// `Array` が同じ要素型ならその中身を参照
    fn view(array: &Array) -> Option<&ArrayD<Self>>;

    /// `Array` が同じ要素型ならその中身を可変参照
    fn view_mut(array: &mut Array) -> Option<&mut ArrayD<Self>>;
}

macro_rules! impl_element {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$variant;

                fn into_value(self) -> Value {
                    Value::from(self)
                }

                fn wrap(data: ArrayD<Self>) -> Array {
                    Array::$variant(data)
                }

                fn view(array: &Array) -> Option<&ArrayD<Self>> {
                    match array {
                        Array::$variant(data) => Some(data),
                        _ => None,
                    }
                }

                fn view_mut(array: &mut Array) -> Option<&mut ArrayD<Self>> {
                    match array {
                        Array::$variant(data) => Some(data),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_element!(
    bool => Bool,
    i32 => Int32,
    i64 => Int64,
    u64 => UInt64,
    f64 => Float64,
    String => Str,
    WideString => Unicode,
    Value => Value,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_and_view_roundtrip() {
        let array = f64::wrap(ArrayD::from_elem(ndarray::IxDyn(&[3]), 1.5));
        assert_eq!(array.dtype(), DType::Float64);
        assert!(f64::view(&array).is_some());
        assert!(i64::view(&array).is_none());
    }

    #[test]
    fn into_value_uses_matching_kind() {
        assert_eq!(7_u64.into_value(), Value::UInt64(7));
        assert!(String::from("a").into_value().is_str());
        assert!(WideString::from("a").into_value().is_unicode());
    }
}
