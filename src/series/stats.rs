// 記述統計

use crate::error::Result;
use crate::series::Series;

impl Series {
    /// 平均値を計算
    ///
    /// `skipna` が真なら NaN を除外する。数値以外の列はエラー。
    pub fn mean(&self, skipna: bool) -> Result<f64> {
        let mean = self.values().mean(skipna)?;
        log::trace!("mean of {} rows (skipna={}): {}", self.len(), skipna, mean);
        Ok(mean)
    }

    /// 分散（母分散）を計算
    pub fn var(&self, skipna: bool) -> Result<f64> {
        self.values().var(skipna)
    }

    /// 標準偏差（母標準偏差）を計算
    pub fn std(&self, skipna: bool) -> Result<f64> {
        self.values().std(skipna)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::Value;
    use crate::series::Series;

    #[test]
    fn mean_skips_nan_on_request() {
        let s = Series::new(vec![1.0_f64, f64::NAN, 3.0]).unwrap();
        assert!(s.mean(false).unwrap().is_nan());
        assert_eq!(s.mean(true).unwrap(), 2.0);
    }

    #[test]
    fn std_is_sqrt_of_var() {
        let s = Series::new(vec![2_i64, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert_eq!(s.var(true).unwrap(), 4.0);
        assert_eq!(s.std(true).unwrap(), 2.0);
    }

    #[test]
    fn strings_have_no_mean() {
        let s = Series::new(vec!["a", "b"]).unwrap();
        assert!(s.mean(true).is_err());
        let mixed = Series::new(vec![Value::Int64(4), Value::from("x")]).unwrap();
        assert_eq!(mixed.mean(true).unwrap(), 4.0);
    }
}
