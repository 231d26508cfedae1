use crate::kafka::key::{Offset, PartitionKey};
use log::warn;
use std::fmt;

/// レコードがバッチから除外された理由。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DropReason {
    NullValue,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::NullValue => write!(f, "null-value"),
        }
    }
}

/// 除外された1件のレコードを表すイベント。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DropEvent {
    pub key: PartitionKey,
    pub offset: Offset,
    pub reason: DropReason,
}

impl DropEvent {
    pub fn new(key: PartitionKey, offset: Offset, reason: DropReason) -> Self {
        Self {
            key,
            offset,
            reason,
        }
    }
}

/// 除外されたレコードの通知先。
///
/// 通知先がログでもメトリクスでも、[IDropObserver::observe]の失敗が
/// フィルタの結果に影響することはない。
pub trait IDropObserver: 'static + Send + Sync {
    fn observe(&self, event: &DropEvent) -> Result<(), &'static str>;
}

pub struct DefaultDropObserver;

impl IDropObserver for DefaultDropObserver {
    fn observe(&self, _event: &DropEvent) -> Result<(), &'static str> {
        // noop
        Ok(())
    }
}

/// 除外されたレコードを1件ずつwarnログへ書き出すObserver。
pub struct LogDropObserver;

impl IDropObserver for LogDropObserver {
    fn observe(&self, event: &DropEvent) -> Result<(), &'static str> {
        warn!(
            "Dropped record due to {}.(topic: {}, partition: {}, offset: {})",
            event.reason, event.key.topic, event.key.partition, event.offset
        );
        Ok(())
    }
}
