mod display;
mod ops;
mod stats;

use crate::column::Array;
use crate::core::{DType, Value};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::indexing;

/// Series構造体: 名前とラベルを持つ一次元の列
#[derive(Debug, Clone)]
pub struct Series {
    /// Seriesのデータ値
    values: Array,

    /// インデックスラベル
    index: Index,

    /// 名前（`Value::Empty` なら名前なし）
    name: Value,
}

// 基本実装
impl Series {
    /// 新しいSeriesを配列から作成
    pub fn new(values: impl Into<Array>) -> Result<Self> {
        Self::with_name(values, Value::Empty)
    }

    /// 名前付きのSeriesを作成
    pub fn with_name(values: impl Into<Array>, name: impl Into<Value>) -> Result<Self> {
        let values = values.into();
        let index = Index::range(values.len());
        Self::from_parts(values, index, name.into())
    }

    /// ラベル付きでSeriesを作成
    ///
    /// `index` が空なら暗黙の整数インデックスになる。
    pub fn with_index(
        values: impl Into<Array>,
        index: Vec<Value>,
        name: impl Into<Value>,
    ) -> Result<Self> {
        let values = values.into();
        let index = if index.is_empty() {
            Index::range(values.len())
        } else {
            Index::from_labels(index)
        };
        Self::from_parts(values, index, name.into())
    }

    /// セル値の列から作成（共通の要素型に揃える）
    pub fn from_values(values: Vec<Value>, name: impl Into<Value>) -> Result<Self> {
        Self::with_name(Array::from_values(values), name)
    }

    pub(crate) fn from_parts(values: Array, index: Index, name: Value) -> Result<Self> {
        if values.ndim() != 1 {
            return Err(Error::DimensionMismatch(format!(
                "Series requires a 1-D array, found {} dimensions",
                values.ndim()
            )));
        }
        if index.len() != values.len() {
            return Err(Error::LengthMismatch {
                expected: values.len(),
                actual: index.len(),
            });
        }
        Ok(Series {
            values,
            index,
            name,
        })
    }

    /// Seriesの長さを取得
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 要素数（`len` と同じ）
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Seriesが空かどうか
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }

    pub fn dtype(&self) -> DType {
        self.values.dtype()
    }

    /// データ値を取得
    pub fn values(&self) -> &Array {
        &self.values
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// 名前を取得
    pub fn name(&self) -> &Value {
        &self.name
    }

    /// 名前を設定
    pub fn set_name(&mut self, name: impl Into<Value>) {
        self.name = name.into();
    }

    /// 新しい名前でコピー
    pub fn rename(&self, name: impl Into<Value>) -> Self {
        let mut renamed = self.clone();
        renamed.name = name.into();
        renamed
    }

    /// インデックスを差し替える（長さは一致している必要がある）
    pub(crate) fn set_index(&mut self, index: Index) -> Result<()> {
        if index.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: index.len(),
            });
        }
        self.index = index;
        Ok(())
    }

    /// 位置から値を取得
    pub fn get(&self, row: usize) -> Option<Value> {
        self.values.get(row).ok()
    }

    /// 位置から値を取得（範囲外はエラー）
    pub fn iloc(&self, row: usize) -> Result<Value> {
        self.values.get(row)
    }

    /// `iloc` の別名
    pub fn at(&self, row: usize) -> Result<Value> {
        self.iloc(row)
    }

    /// ラベルから値を取得
    pub fn loc(&self, label: impl Into<Value>) -> Result<Value> {
        let label = label.into();
        let pos = self
            .index
            .position(&label)
            .ok_or_else(|| Error::Index(format!("ラベル '{}' が見つかりません", label)))?;
        self.values.get(pos)
    }

    /// 位置へ値を書き込む
    ///
    /// 値は格納型に変換される。変換できない場合はエラー。
    pub fn set(&mut self, row: usize, value: impl Into<Value>) -> Result<()> {
        self.values.set(row, &value.into())
    }

    /// 位置の列で行を取り出す
    pub(crate) fn take(&self, positions: &[usize]) -> Result<Series> {
        let values = self.values.select(positions)?;
        let index = self.index.take(positions)?;
        Self::from_parts(values, index, self.name.clone())
    }

    /// 文字列式で行を取り出す（`"1:3"`, `":2"`, `"4"` など）
    pub fn iloc_expr(&self, expr: &str) -> Result<Series> {
        let slice = indexing::parse_slice(expr)?;
        let positions = slice.resolve(self.len())?;
        self.take(&positions)
    }

    /// 真偽値マスクで行を取り出す
    pub fn iloc_mask(&self, mask: &[bool]) -> Result<Series> {
        if mask.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        let positions: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, keep)| keep.then_some(i))
            .collect();
        self.take(&positions)
    }
}

impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.index == other.index && self.values == other.values
    }
}
