use crate::batch::Batch;
use crate::observer::{DropEvent, DropReason, IDropObserver};
use log::warn;
use std::panic::{self, AssertUnwindSafe};

/// pollされたバッチを下流へ渡す前に変換するインターセプタ。
pub trait IBatchInterceptor: 'static + Send + Sync {
    fn intercept(&self, batch: Batch) -> Batch;
}

pub struct DefaultInterceptor;

impl IBatchInterceptor for DefaultInterceptor {
    fn intercept(&self, batch: Batch) -> Batch {
        // noop
        batch
    }
}

/// payloadを持たないレコードをバッチから除外するインターセプタ。
///
/// partitionのグルーピングとpartition内の順序は維持され、除外した1件ごとに
/// [IDropObserver::observe]が同期的に呼び出される。除外の結果レコードが1件も
/// 残らなかったpartitionは結果のバッチには含まれない。
pub struct NullValueFilter {
    observer: Box<dyn IDropObserver>,
}

impl NullValueFilter {
    pub fn new(observer: impl IDropObserver) -> Self {
        Self {
            observer: Box::new(observer),
        }
    }
}

impl IBatchInterceptor for NullValueFilter {
    fn intercept(&self, batch: Batch) -> Batch {
        filter_batch(batch, self.observer.as_ref())
    }
}

/// [NullValueFilter]の本体。
///
/// バッチ間で共有する状態を持たず、呼び出しごとに独立して動作する。
pub fn filter_batch(batch: Batch, observer: &dyn IDropObserver) -> Batch {
    let mut filtered = Batch::new();
    for group in batch.into_groups() {
        let (key, records) = group.into_parts();
        for record in records {
            if record.has_payload() {
                filtered.push(record);
            } else {
                notify_drop(
                    observer,
                    &DropEvent::new(key.clone(), record.offset(), DropReason::NullValue),
                );
            }
        }
    }
    filtered
}

fn notify_drop(observer: &dyn IDropObserver, event: &DropEvent) {
    match panic::catch_unwind(AssertUnwindSafe(|| observer.observe(event))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!("Failed to notify drop observer.({})", e),
        Err(_) => warn!("Failed to notify drop observer.(panicked)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kafka::key::PartitionKey;
    use crate::kafka::record::testing::create_record;
    use crate::observer::testing::CollectingDropObserver;
    use crate::observer::DefaultDropObserver;

    fn mixed_batch() -> Batch {
        Batch::from_records(vec![
            create_record("events", 0, 0, Some("a")),
            create_record("events", 0, 1, None),
            create_record("events", 0, 2, Some("c")),
            create_record("events", 1, 0, None),
        ])
    }

    #[test]
    fn test_no_absent_payload_survives() {
        let filtered = filter_batch(mixed_batch(), &DefaultDropObserver);
        assert!(filtered.iter().all(|r| r.has_payload()));
    }

    #[test]
    fn test_drops_and_reassembles_expected_groups() {
        let observer = CollectingDropObserver::new();
        let filtered = filter_batch(mixed_batch(), &observer);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.partition_count(), 1);
        let p0 = filtered.records(&PartitionKey::new("events", 0)).unwrap();
        assert_eq!(
            p0.iter().map(|r| r.offset()).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert!(filtered.records(&PartitionKey::new("events", 1)).is_none());

        assert_eq!(
            observer.events(),
            vec![
                DropEvent::new(PartitionKey::new("events", 0), 1, DropReason::NullValue),
                DropEvent::new(PartitionKey::new("events", 1), 0, DropReason::NullValue),
            ]
        );
    }

    #[test]
    fn test_surviving_records_keep_content() {
        let filtered = filter_batch(mixed_batch(), &DefaultDropObserver);
        let payloads = filtered
            .iter()
            .map(|r| r.payload::<str>().unwrap().unwrap().to_string())
            .collect::<Vec<_>>();
        assert_eq!(payloads, vec!["a", "c"]);
    }

    #[test]
    fn test_empty_batch() {
        let observer = CollectingDropObserver::new();
        let filtered = filter_batch(Batch::new(), &observer);
        assert!(filtered.is_empty());
        assert!(observer.events().is_empty());
    }

    #[test]
    fn test_clean_batch_keeps_content_and_order() {
        let observer = CollectingDropObserver::new();
        let filtered = filter_batch(
            Batch::from_records(vec![
                create_record("events", 0, 10, Some("a")),
                create_record("metrics", 0, 3, Some("b")),
                create_record("events", 0, 11, Some("c")),
            ]),
            &observer,
        );

        assert!(observer.events().is_empty());
        assert_eq!(
            filtered.partitions().cloned().collect::<Vec<_>>(),
            vec![
                PartitionKey::new("events", 0),
                PartitionKey::new("metrics", 0),
            ]
        );
        let events = filtered.records(&PartitionKey::new("events", 0)).unwrap();
        assert_eq!(
            events.iter().map(|r| r.offset()).collect::<Vec<_>>(),
            vec![10, 11]
        );
        let metrics = filtered.records(&PartitionKey::new("metrics", 0)).unwrap();
        assert_eq!(
            metrics.iter().map(|r| r.offset()).collect::<Vec<_>>(),
            vec![3]
        );
    }

    #[test]
    fn test_topics_sharing_partition_number_stay_separate() {
        let observer = CollectingDropObserver::new();
        let filtered = filter_batch(
            Batch::from_records(vec![
                create_record("events", 0, 0, Some("a")),
                create_record("metrics", 0, 0, None),
            ]),
            &observer,
        );

        assert_eq!(filtered.len(), 1);
        assert!(filtered.records(&PartitionKey::new("events", 0)).is_some());
        assert_eq!(
            observer.events(),
            vec![DropEvent::new(
                PartitionKey::new("metrics", 0),
                0,
                DropReason::NullValue
            )]
        );
    }

    #[test]
    fn test_observer_failure_does_not_affect_result() {
        struct FailingObserver;

        impl IDropObserver for FailingObserver {
            fn observe(&self, _event: &DropEvent) -> Result<(), &'static str> {
                Err("sink is unavailable")
            }
        }

        let filtered = filter_batch(mixed_batch(), &FailingObserver);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.has_payload()));
    }

    #[test]
    fn test_observer_panic_does_not_affect_result() {
        struct PanickingObserver;

        impl IDropObserver for PanickingObserver {
            fn observe(&self, _event: &DropEvent) -> Result<(), &'static str> {
                panic!("sink is broken");
            }
        }

        let filtered = filter_batch(mixed_batch(), &PanickingObserver);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_null_value_filter_intercept() {
        let observer = CollectingDropObserver::new();
        let filter = NullValueFilter::new(observer.clone());
        let filtered = filter.intercept(mixed_batch());

        assert_eq!(filtered.len(), 2);
        assert_eq!(observer.events().len(), 2);
    }

    #[test]
    fn test_default_interceptor_is_passthrough() {
        let batch = DefaultInterceptor.intercept(mixed_batch());
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.partition_count(), 2);
    }
}
