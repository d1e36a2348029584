use crate::core::Value;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// インデックス構造体
///
/// DataFrameやSeriesの行・列ラベルを表現する。ラベルを持たない場合は
/// 件数だけを保持し、位置 `0..count` が暗黙のラベルになる。
#[derive(Debug, Clone)]
pub enum Index {
    /// 暗黙の整数範囲
    Anonymous(usize),

    /// 明示的なラベル
    Named {
        /// ラベル値
        labels: Vec<Value>,

        /// ラベルから最初の出現位置へのマッピング
        positions: HashMap<Value, usize>,
    },
}

impl Default for Index {
    fn default() -> Self {
        Index::Anonymous(0)
    }
}

impl Index {
    /// 新しいインデックスを作成
    ///
    /// ラベルと件数の両方を指定するとエラーになる。
    pub fn new(labels: Vec<Value>, count: usize) -> Result<Self> {
        if !labels.is_empty() && count != 0 {
            return Err(Error::Index(format!(
                "ラベル ({} 件) と件数 ({}) は同時に指定できません",
                labels.len(),
                count
            )));
        }
        if labels.is_empty() {
            Ok(Index::Anonymous(count))
        } else {
            Ok(Index::from_labels(labels))
        }
    }

    /// 整数範囲のインデックスを作成
    pub fn range(count: usize) -> Self {
        Index::Anonymous(count)
    }

    /// ラベルからインデックスを作成
    pub fn from_labels(labels: Vec<Value>) -> Self {
        let mut positions = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            positions.entry(label.clone()).or_insert(i);
        }
        Index::Named { labels, positions }
    }

    /// インデックス長を取得
    pub fn len(&self) -> usize {
        match self {
            Index::Anonymous(count) => *count,
            Index::Named { labels, .. } => labels.len(),
        }
    }

    /// インデックスが空かどうか
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ラベルを持つかどうか
    pub fn is_named(&self) -> bool {
        matches!(self, Index::Named { .. })
    }

    /// 位置からラベルを取得
    pub fn get(&self, pos: usize) -> Option<Value> {
        match self {
            Index::Anonymous(count) if pos < *count => Some(Value::Int64(pos as i64)),
            Index::Anonymous(_) => None,
            Index::Named { labels, .. } => labels.get(pos).cloned(),
        }
    }

    /// 位置からラベルを取得（範囲外はエラー）
    pub fn label(&self, pos: usize) -> Result<Value> {
        self.get(pos).ok_or(Error::IndexOutOfBounds {
            index: pos,
            size: self.len(),
        })
    }

    /// キーに対応する位置を取得
    ///
    /// ラベルとの一致を優先し、見つからなければ整数キーを位置として扱う。
    pub fn position(&self, key: &Value) -> Option<usize> {
        match self {
            Index::Named { positions, labels } => positions
                .get(key)
                .copied()
                .or_else(|| key.as_position().filter(|p| *p < labels.len())),
            Index::Anonymous(count) => key.as_position().filter(|p| p < count),
        }
    }

    /// キーを実際のラベルに解決する
    ///
    /// ラベルが存在すればそれ自身、整数キーなら該当位置のラベルを返す。
    /// どちらでもなければキーをそのまま返す。
    pub fn resolve(&self, key: &Value) -> Value {
        match self {
            Index::Anonymous(_) => key.clone(),
            Index::Named { positions, labels } => {
                if positions.contains_key(key) {
                    return key.clone();
                }
                key.as_position()
                    .and_then(|p| labels.get(p))
                    .cloned()
                    .unwrap_or_else(|| key.clone())
            }
        }
    }

    /// キーがラベル（または暗黙の位置）として存在するか
    pub fn contains(&self, key: &Value) -> bool {
        match self {
            Index::Anonymous(count) => key.as_position().map_or(false, |p| p < *count),
            Index::Named { positions, .. } => positions.contains_key(key),
        }
    }

    /// 全てのラベルを取得
    pub fn labels(&self) -> Vec<Value> {
        match self {
            Index::Anonymous(count) => (0..*count).map(|i| Value::Int64(i as i64)).collect(),
            Index::Named { labels, .. } => labels.clone(),
        }
    }

    /// 暗黙のラベルを 1 つ追加
    pub fn push_anonymous(&mut self) {
        match self {
            Index::Anonymous(count) => *count += 1,
            Index::Named { .. } => {
                let next = Value::Int64(self.len() as i64);
                self.push(next);
            }
        }
    }

    /// ラベルを追加
    ///
    /// 暗黙のインデックスにラベルを追加すると、既存の位置もラベル化される。
    pub fn push(&mut self, label: Value) {
        if let Index::Anonymous(_) = self {
            *self = Index::from_labels(self.labels());
        }
        if let Index::Named { labels, positions } = self {
            positions.entry(label.clone()).or_insert(labels.len());
            labels.push(label);
        }
    }

    /// 別のインデックスを末尾に連結
    pub fn append(&mut self, other: &Index) {
        match other {
            Index::Anonymous(b) => {
                if let Index::Anonymous(a) = self {
                    *a += *b;
                } else {
                    for _ in 0..*b {
                        self.push_anonymous();
                    }
                }
            }
            Index::Named { labels, .. } => {
                for label in labels {
                    self.push(label.clone());
                }
            }
        }
    }

    /// 位置のラベルを削除
    pub fn remove(&mut self, pos: usize) -> Result<Value> {
        let label = self.label(pos)?;
        if let Index::Anonymous(count) = self {
            if pos + 1 == *count {
                *count -= 1;
                return Ok(label);
            }
        }
        let mut labels = self.labels();
        labels.remove(pos);
        *self = Index::from_labels(labels);
        Ok(label)
    }

    /// `[start, stop)` の部分インデックス
    pub fn slice(&self, start: usize, stop: usize) -> Result<Index> {
        if start > stop || stop > self.len() {
            return Err(Error::InvalidRange(format!(
                "incorrect range {}:{} for index of length {}",
                start,
                stop,
                self.len()
            )));
        }
        match self {
            Index::Anonymous(_) => Ok(Index::Anonymous(stop - start)),
            Index::Named { labels, .. } => Ok(Index::from_labels(labels[start..stop].to_vec())),
        }
    }

    /// 指定位置の部分インデックス
    pub fn take(&self, positions: &[usize]) -> Result<Index> {
        match self {
            Index::Anonymous(_) => {
                if let Some(&p) = positions.iter().find(|p| **p >= self.len()) {
                    return Err(Error::IndexOutOfBounds {
                        index: p,
                        size: self.len(),
                    });
                }
                Ok(Index::Anonymous(positions.len()))
            }
            Index::Named { .. } => {
                let labels = positions
                    .iter()
                    .map(|p| self.label(*p))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Index::from_labels(labels))
            }
        }
    }
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Index::Anonymous(a), Index::Anonymous(b)) => a == b,
            _ => self.len() == other.len() && self.labels() == other.labels(),
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Anonymous(count) => write!(f, "RangeIndex(start=0, stop={}, step=1)", count),
            Index::Named { labels, .. } => {
                let items: Vec<String> = labels.iter().map(|l| format!("{:?}", l.to_string())).collect();
                write!(f, "Index([{}])", items.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_construction_fails() {
        assert!(Index::new(vec![Value::from("a")], 3).is_err());
        assert_eq!(Index::new(vec![], 3).unwrap().len(), 3);
        assert!(Index::new(vec![Value::from("a")], 0).unwrap().is_named());
    }

    #[test]
    fn anonymous_lookup() {
        let idx = Index::range(3);
        assert!(idx.contains(&Value::Int64(2)));
        assert!(!idx.contains(&Value::Int64(3)));
        assert!(!idx.contains(&Value::from("a")));
        assert_eq!(idx.resolve(&Value::Int32(1)), Value::Int32(1));
        assert_eq!(idx.labels(), vec![Value::Int64(0), Value::Int64(1), Value::Int64(2)]);
    }

    #[test]
    fn named_lookup_prefers_labels() {
        let idx = Index::from_labels(vec![Value::from("a"), Value::Int64(0), Value::from("c")]);
        assert_eq!(idx.position(&Value::Int64(0)), Some(1));
        assert_eq!(idx.position(&Value::Int64(2)), Some(2));
        assert_eq!(idx.resolve(&Value::Int64(2)), Value::from("c"));
        assert_eq!(idx.resolve(&Value::from("zz")), Value::from("zz"));
        assert!(idx.contains(&Value::from("a")));
    }

    #[test]
    fn push_materializes_anonymous() {
        let mut idx = Index::range(2);
        idx.push(Value::from("x"));
        assert_eq!(
            idx.labels(),
            vec![Value::Int64(0), Value::Int64(1), Value::from("x")]
        );
        let mut empty = Index::default();
        empty.push(Value::from("a"));
        assert_eq!(empty.labels(), vec![Value::from("a")]);
    }

    #[test]
    fn append_and_remove() {
        let mut idx = Index::range(2);
        idx.append(&Index::range(3));
        assert_eq!(idx, Index::Anonymous(5));

        assert_eq!(idx.remove(4).unwrap(), Value::Int64(4));
        assert_eq!(idx, Index::Anonymous(4));
        idx.remove(0).unwrap();
        assert!(idx.is_named());
        assert_eq!(idx.labels(), vec![Value::Int64(1), Value::Int64(2), Value::Int64(3)]);
    }

    #[test]
    fn slicing() {
        let idx = Index::from_labels(vec![Value::from("a"), Value::from("b"), Value::from("c")]);
        assert_eq!(idx.slice(1, 3).unwrap().labels(), vec![Value::from("b"), Value::from("c")]);
        assert_eq!(Index::range(5).slice(1, 3).unwrap(), Index::range(2));
        assert!(Index::range(5).slice(3, 6).is_err());
        assert_eq!(Index::range(5).take(&[0, 4]).unwrap(), Index::range(2));
    }
}
