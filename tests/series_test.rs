use pdframe::{DType, Series, Value};

#[test]
fn test_series_slicing() {
    let s = Series::with_name(vec![148_i64, 85, 183, 89, 137], "Glucose").unwrap();
    let middle = s.iloc_expr("1:4").unwrap();
    assert_eq!(middle.len(), 3);
    assert_eq!(middle.name(), &Value::from("Glucose"));
    // 暗黙のインデックスは0から振り直す
    assert_eq!(middle.index().label(0).unwrap(), Value::Int64(0));
    assert_eq!(middle.iloc(0).unwrap(), Value::Int64(85));

    let picked = s.iloc_expr("0,4").unwrap();
    assert_eq!(picked.iloc(1).unwrap(), Value::Int64(137));
}

#[test]
fn test_replace_idempotence() {
    let s = Series::with_name(vec![1.5_f64, 0.0, 2.5], "BMI").unwrap();
    assert_eq!(s.replace(0.0_f64, 0.0_f64).unwrap(), s);
    assert_eq!(s.replace(42.0_f64, 42.0_f64).unwrap(), s);

    let ints = Series::new(vec![1_i64, 2, 3]).unwrap();
    assert_eq!(ints.replace(2_i64, 2_i64).unwrap(), ints);
}

#[test]
fn test_replace_zero_with_mean() {
    let s = Series::with_name(vec![2_i64, 0, 4], "Insulin").unwrap();
    let with_nan = s.replace(0_i64, f64::NAN).unwrap();
    assert_eq!(with_nan.dtype(), DType::Float64);
    let mean = with_nan.mean(true).unwrap();
    assert_eq!(mean, 3.0);
    let filled = with_nan.replace(f64::NAN, mean).unwrap();
    assert_eq!(filled.iloc(1).unwrap(), Value::Float64(3.0));

    // 型の合わない置換は拒否する
    assert!(s.replace("0", 1_i64).is_err());
}

#[test]
fn test_mean_skipna() {
    let s = Series::new(vec![1.0_f64, f64::NAN, 3.0]).unwrap();
    assert_eq!(s.mean(true).unwrap(), 2.0);
    assert!(s.mean(false).unwrap().is_nan());
}

#[test]
fn test_series_arithmetic() {
    let a = Series::with_name(vec![1_i32, 2, 3], "x").unwrap();
    let b = Series::with_name(vec![10_i64, 20, 30], "x").unwrap();
    let sum = (&a + &b).unwrap();
    assert_eq!(sum.dtype(), DType::Int64);
    assert_eq!(sum.iloc(2).unwrap(), Value::Int64(33));
    assert_eq!(a.dot(&a).unwrap(), Value::Int32(14));

    let other = Series::with_name(vec![1_i32, 2, 3], "y").unwrap();
    assert!(a.add(&other).is_err());
}

#[test]
fn test_text_series() {
    let s = Series::with_name(vec!["a", "b"], "letters").unwrap();
    assert_eq!(s.dtype(), DType::Str);
    assert!(s.mean(true).is_err());
    let replaced = s.replace("a", "z").unwrap();
    assert_eq!(replaced.iloc(0).unwrap(), Value::from("z"));
}
