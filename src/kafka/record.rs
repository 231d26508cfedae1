use crate::kafka::key::{Offset, Partition};
use rdkafka::message::{FromBytes, Message as IMessage};

pub use rdkafka::message::OwnedMessage;

/// 上流のpollで受信した1件のレコード。
///
/// [crate::filter::IBatchInterceptor]と[crate::processor::IRecordProcessor]のImplementorで処理するデータ型。
#[derive(Clone, Debug)]
pub struct Record {
    base: OwnedMessage,
}

impl Record {
    pub fn new(base: OwnedMessage) -> Self {
        Self { base }
    }

    pub fn topic(&self) -> &str {
        self.base.topic()
    }

    pub fn partition(&self) -> Partition {
        self.base.partition()
    }

    pub fn offset(&self) -> Offset {
        self.base.offset()
    }

    pub fn key(&self) -> Option<&[u8]> {
        self.base.key()
    }

    /// payloadを持つかどうかを返す。持たないレコードはtombstoneとして扱う。
    pub fn has_payload(&self) -> bool {
        self.base.payload().is_some()
    }

    pub fn payload<P: ?Sized + FromBytes>(&self) -> Option<Result<&P, P::Error>> {
        self.base.payload_view::<P>()
    }

    pub fn into_inner(self) -> OwnedMessage {
        self.base
    }
}
