use crate::batch::Batch;
use crate::context::Context;
use crate::dispatch::{Dispatcher, DispatcherBase, DispatcherMut, IDispatcher};
use crate::error::BatchProcError;
use crate::filter::IBatchInterceptor;
use crate::processor::{IRecordProcessor, IRecordProcessorMut, Processor, ProcessorMut};
use std::future::Future;
use std::mem;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_stream::Stream;

const DEFAULT_BUFFER_SIZE: usize = 16;

/// [BatchProc]を組み立てるためのビルダ。
///
/// [BatchProcConfig::processor]と[BatchProcConfig::processor_mut]はいずれか片方のみ
/// 設定できる。インターセプタは登録順に適用される。
pub struct BatchProcConfig {
    interceptors: Vec<Box<dyn IBatchInterceptor>>,
    processor: Option<Box<dyn IRecordProcessor>>,
    processor_mut: Option<Box<dyn IRecordProcessorMut>>,
    buffer_size: usize,
}

impl BatchProcConfig {
    pub fn new() -> Self {
        Self {
            interceptors: vec![],
            processor: None,
            processor_mut: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn interceptor(&mut self, interceptor: impl IBatchInterceptor) -> &mut Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    pub fn processor(&mut self, processor: impl IRecordProcessor) -> &mut Self {
        self.processor = Some(Box::new(processor));
        self
    }

    pub fn processor_mut(&mut self, processor_mut: impl IRecordProcessorMut) -> &mut Self {
        self.processor_mut = Some(Box::new(processor_mut));
        self
    }

    pub fn buffer_size(&mut self, buffer_size: usize) -> &mut Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn create(&mut self) -> Result<BatchProc, BatchProcError> {
        let context = Context::new();
        let (shutdown_complete_tx, shutdown_complete_rx) = mpsc::channel(1);
        let base = DispatcherBase::new(
            mem::take(&mut self.interceptors),
            context.clone(),
            shutdown_complete_rx,
            shutdown_complete_tx.clone(),
        );
        let dispatcher = match (self.processor.take(), self.processor_mut.take()) {
            (Some(processor), None) => DispatcherKind::Shared(Dispatcher::new(
                base,
                Processor::new(Arc::new(processor), context.clone(), shutdown_complete_tx),
            )),
            (None, Some(processor_mut)) => DispatcherKind::Mut(DispatcherMut::new(
                base,
                ProcessorMut::new(
                    Arc::new(Mutex::new(processor_mut)),
                    context.clone(),
                    shutdown_complete_tx,
                ),
                self.buffer_size,
            )),
            (None, None) => {
                return Err(BatchProcError::ConfigError(
                    "processor is not set.".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(BatchProcError::ConfigError(
                    "processor and processor_mut are both set.".to_string(),
                ))
            }
        };
        Ok(BatchProc {
            dispatcher,
            context,
        })
    }
}

enum DispatcherKind {
    Shared(Dispatcher),
    Mut(DispatcherMut),
}

impl DispatcherKind {
    async fn run_main_dispatch<S>(&mut self, batches: S)
    where
        S: Stream<Item = Batch> + Unpin + Send,
    {
        match self {
            DispatcherKind::Shared(dispatcher) => dispatcher.run_main_dispatch(batches).await,
            DispatcherKind::Mut(dispatcher) => dispatcher.run_main_dispatch(batches).await,
        }
    }

    async fn wait(&mut self) {
        match self {
            DispatcherKind::Shared(dispatcher) => dispatcher.wait().await,
            DispatcherKind::Mut(dispatcher) => dispatcher.wait().await,
        }
    }
}

/// pollされたバッチのstreamへインターセプタを適用し、残ったレコードを
/// 登録されたプロセッサへ順序を保って引き渡すランナー。
pub struct BatchProc {
    dispatcher: DispatcherKind,
    context: Context,
}

impl BatchProc {
    /// streamが尽きるか、shutdownが完了するか、プロセッサがエラーを返すまでバッチを処理する。
    ///
    /// streamが尽きた場合は受け取り済みのレコードを処理し切ってから返る。
    /// shutdownが完了した場合は処理中のレコードも中断される。
    pub async fn run<S, F>(mut self, batches: S, shutdown: F)
    where
        S: Stream<Item = Batch> + Unpin + Send,
        F: Future,
    {
        tokio::select! {
            _ = self.dispatcher.run_main_dispatch(batches) => {}
            _ = shutdown => {
                self.context.cancel();
            }
        }
        self.dispatcher.wait().await;
    }
}
