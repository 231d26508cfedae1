//! kafkaからpollしたバッチを整形し、下流のプロセッサへ引き渡すライブラリ。
//!
//! ### Features
//!
//! - [filter::NullValueFilter]でvalueを持たないレコードをバッチから除外できる
//! - [observer::IDropObserver]を実装することで除外されたレコードの通知先を差し替えることができる
//! - [processor::IRecordProcessor]を実装することでフィルタ通過後のレコードの処理部分を組み込むことができる
//!
//! topicの購読、partitionの割り当て、offsetの管理は行わない。バッチの取得は
//! 呼び出し側の責務であり、[batchproc::BatchProc::run]へstreamとして渡す。
//!
//! ### Examples
//!
//! ```no_run
//! use async_trait::async_trait;
//! use batchproc::prelude::*;
//! use tokio::signal;
//! use tokio::sync::mpsc;
//! use tokio_stream::wrappers::ReceiverStream;
//!
//! struct Processor;
//!
//! #[async_trait]
//! impl IRecordProcessor for Processor {
//!     async fn execute(&self, record: Record) -> Result<(), &'static str> {
//!         println!("{:?}", record);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     env_logger::init();
//!     // 上流のpollループがtxへバッチを送る
//!     let (_tx, rx) = mpsc::channel::<Batch>(64);
//!     let batchproc = BatchProcConfig::new()
//!         .interceptor(NullValueFilter::new(LogDropObserver))
//!         .processor(Processor)
//!         .create()
//!         .unwrap();
//!     batchproc.run(ReceiverStream::new(rx), signal::ctrl_c()).await;
//! }
//! ```
pub mod batch;
pub mod batchproc;
mod context;
mod dispatch;
pub mod error;
pub mod filter;
pub mod kafka;
pub mod observer;
pub mod processor;

pub mod prelude {
    pub use super::batch::*;
    pub use super::batchproc::*;
    pub use super::filter::*;
    pub use super::kafka::key::*;
    pub use super::kafka::record::*;
    pub use super::observer::*;
    pub use super::processor::*;
}
