pub type Topic = String;
pub type Partition = i32;
pub type Offset = i64;

/// topicとpartitionの組で表されるレコードのグルーピングキー。
///
/// partition番号だけをキーにすると複数topicを購読した際に別topicのレコードが
/// 同じグループへ混ざるため、必ずtopicを含めてグルーピングする。
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PartitionKey {
    pub topic: Topic,
    pub partition: Partition,
}

impl PartitionKey {
    pub fn new(topic: &str, partition: Partition) -> Self {
        Self {
            topic: topic.to_string(),
            partition,
        }
    }
}

macro_rules! partition_key {
    ($record: expr) => {
        $crate::kafka::key::PartitionKey {
            topic: $record.topic().to_string(),
            partition: $record.partition(),
        }
    };
}

pub(crate) use partition_key;
