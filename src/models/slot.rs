//! 槽位快照模型
//!
//! 固定 [`SLOT_COUNT`] 个位置，每个位置要么为空，要么保存一条科目进度记录。
//! 外部输入先经 [`SlotSnapshot::from_json`] 校验并规范化，规范形式
//! （[`CanonicalSnapshot`]）只包含被占用的槽位，键为槽位下标的字符串。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::{AppError, Result};

/// 槽位数量
pub const SLOT_COUNT: usize = 5;

/// 条目表中保存序列化快照的保留键
pub const SNAPSHOT_KEY: &str = "subjects";

/// 单个槽位中的科目进度记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SlotRecord {
    /// 科目名称
    pub subject: String,
    /// 当前状态
    pub current: String,
    /// 目标状态
    pub target: String,
}

impl SlotRecord {
    /// 创建记录，三个字段都去掉首尾空白
    pub fn new(
        subject: impl AsRef<str>,
        current: impl AsRef<str>,
        target: impl AsRef<str>,
    ) -> Self {
        Self {
            subject: subject.as_ref().trim().to_string(),
            current: current.as_ref().trim().to_string(),
            target: target.as_ref().trim().to_string(),
        }
    }

    /// 从任意 JSON 对象构造，缺失字段视为空串
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self::new(
            coerce_text(object.get("subject")),
            coerce_text(object.get("current")),
            coerce_text(object.get("target")),
        )
    }
}

/// 规范形式：槽位下标字符串 -> 记录，只包含被占用的槽位
pub type CanonicalSnapshot = BTreeMap<String, SlotRecord>;

/// 把 JSON 标量转换成文本（不去空白）
///
/// 字符串原样返回；缺失或 `null` 为空串；其余值取紧凑 JSON 文本。
pub fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// 长度恒为 [`SLOT_COUNT`] 的槽位快照
///
/// 序列化为 JSON 数组，空槽位为 `null`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlotSnapshot(Vec<Option<SlotRecord>>);

impl Default for SlotSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

impl SlotSnapshot {
    /// 全空快照
    pub fn empty() -> Self {
        Self(vec![None; SLOT_COUNT])
    }

    /// 校验并规范化外部输入
    ///
    /// 输入必须是长度为 [`SLOT_COUNT`] 的数组，元素为 `null` 或对象。
    pub fn from_json(input: &Value) -> Result<Self> {
        let items = input
            .as_array()
            .ok_or_else(|| AppError::Shape("Snapshot must be a list.".to_string()))?;

        if items.len() != SLOT_COUNT {
            return Err(AppError::Shape(format!(
                "Expected {} slots, got {}.",
                SLOT_COUNT,
                items.len()
            )));
        }

        let slots = items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Null => Ok(None),
                Value::Object(object) => Ok(Some(SlotRecord::from_object(object))),
                _ => Err(AppError::Shape(format!(
                    "slot {} must be an object or null.",
                    index
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self(slots))
    }

    /// 从规范形式重建，不在 `0..SLOT_COUNT` 内的键被忽略
    pub fn from_canonical(canonical: &CanonicalSnapshot) -> Self {
        Self(
            (0..SLOT_COUNT)
                .map(|index| canonical.get(&index.to_string()).cloned())
                .collect(),
        )
    }

    /// 从 (下标, 记录) 序列重建，越界下标被忽略
    pub fn from_occupied(records: impl IntoIterator<Item = (usize, SlotRecord)>) -> Self {
        let mut snapshot = Self::empty();
        for (index, record) in records {
            if let Some(slot) = snapshot.0.get_mut(index) {
                *slot = Some(record);
            }
        }
        snapshot
    }

    /// 转换为规范形式
    pub fn to_canonical(&self) -> CanonicalSnapshot {
        self.occupied()
            .map(|(index, record)| (index.to_string(), record.clone()))
            .collect()
    }

    /// 被占用的槽位
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &SlotRecord)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|record| (index, record)))
    }

    pub fn get(&self, index: usize) -> Option<&SlotRecord> {
        self.0.get(index).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<SlotRecord>] {
        &self.0
    }

    /// 是否所有槽位都为空
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

/// 解析存储中的序列化快照
///
/// 顶层不是对象时得到空映射；值不是对象的键被丢弃，其余记录重新规范化。
pub fn decode_canonical(raw: &str) -> std::result::Result<CanonicalSnapshot, serde_json::Error> {
    let stored: Value = serde_json::from_str(raw)?;
    let Value::Object(entries) = stored else {
        return Ok(CanonicalSnapshot::new());
    };

    Ok(entries
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_object()
                .map(|object| (key.clone(), SlotRecord::from_object(object)))
        })
        .collect())
}
