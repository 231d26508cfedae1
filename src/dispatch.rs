use crate::batch::Batch;
use crate::context::Context;
use crate::filter::IBatchInterceptor;
use crate::kafka::record::Record;
use crate::processor::{Processor, ProcessorMut};
use anyhow::anyhow;
use async_trait::async_trait;
use log::{debug, error};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task;
use tokio_stream::{Stream, StreamExt};

#[derive(Error, Debug)]
#[error("DispatchError occurred.")]
pub(crate) struct DispatchError {
    msg: String,
    #[source]
    source: anyhow::Error,
}

macro_rules! raise_dispatch_error {
    ($msg: expr, $source: expr) => {
        return Err(DispatchError {
            msg: $msg.to_string(),
            source: $source.into(),
        });
    };
}

macro_rules! dispatch_loop {
    (($stream: expr, $context: expr) => $proc: expr) => {
        loop {
            if $context.is_shutdown() {
                break;
            }
            match $stream.next().await {
                Some(batch) => {
                    debug!("Read batch from stream.");
                    if $proc(batch).await.is_err() {
                        error!("Dispatch Error occurred.");
                        break;
                    }
                }
                None => {
                    debug!("Batch stream is closed.");
                    break;
                }
            }
        }
    };
}

pub(crate) struct DispatcherBase {
    interceptors: Vec<Box<dyn IBatchInterceptor>>,
    context: Context,
    shutdown_complete_rx: Option<mpsc::Receiver<()>>,
    shutdown_complete_tx: Option<mpsc::Sender<()>>,
}

impl DispatcherBase {
    pub(crate) fn new(
        interceptors: Vec<Box<dyn IBatchInterceptor>>,
        context: Context,
        shutdown_complete_rx: mpsc::Receiver<()>,
        shutdown_complete_tx: mpsc::Sender<()>,
    ) -> Self {
        Self {
            interceptors,
            context,
            shutdown_complete_rx: Some(shutdown_complete_rx),
            shutdown_complete_tx: Some(shutdown_complete_tx),
        }
    }

    fn intercept(&self, batch: Batch) -> Batch {
        self.interceptors
            .iter()
            .fold(batch, |batch, interceptor| interceptor.intercept(batch))
    }
}

#[async_trait]
pub(crate) trait IDispatcher {
    type TProcessor;
    async fn run_main_dispatch<S>(&mut self, batches: S)
    where
        S: Stream<Item = Batch> + Unpin + Send;
    async fn wait(&mut self);
}

pub(crate) struct Dispatcher {
    base: DispatcherBase,
    processor: Option<Processor>,
}

impl Dispatcher {
    pub(crate) fn new(base: DispatcherBase, processor: Processor) -> Self {
        Self {
            base,
            processor: Some(processor),
        }
    }

    async fn dispatch(&self, batch: Batch) -> Result<(), DispatchError> {
        let processor = match self.processor.as_ref() {
            Some(processor) => processor,
            None => {
                raise_dispatch_error!("Processor is already released.", anyhow!("shut down"));
            }
        };
        let batch = self.base.intercept(batch);
        for record in batch {
            let topic = record.topic().to_string();
            let partition = record.partition();
            let offset = record.offset();
            if let Err(e) = processor.run(record).await {
                error!(
                    "Failed to run processor.(topic: {}, partition: {}, offset: {})",
                    topic, partition, offset
                );
                raise_dispatch_error!("Failed to run processor.", anyhow!(e));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl IDispatcher for Dispatcher {
    type TProcessor = Processor;

    async fn run_main_dispatch<S>(&mut self, mut batches: S)
    where
        S: Stream<Item = Batch> + Unpin + Send,
    {
        dispatch_loop!((batches, self.base.context) => |batch: Batch| self.dispatch(batch));
    }

    async fn wait(&mut self) {
        drop(self.processor.take());

        let shutdown_complete_tx = self.base.shutdown_complete_tx.take().unwrap();
        drop(shutdown_complete_tx);

        let mut shutdown_complete_rx = self.base.shutdown_complete_rx.take().unwrap();
        let _ = shutdown_complete_rx.recv().await;
    }
}

pub(crate) struct DispatcherMut {
    base: DispatcherBase,
    processor_mut: Option<ProcessorMut>,
    buffer_size: usize,
}

impl DispatcherMut {
    pub(crate) fn new(base: DispatcherBase, processor_mut: ProcessorMut, buffer_size: usize) -> Self {
        Self {
            base,
            processor_mut: Some(processor_mut),
            buffer_size,
        }
    }
}

#[async_trait]
impl IDispatcher for DispatcherMut {
    type TProcessor = ProcessorMut;

    async fn run_main_dispatch<S>(&mut self, mut batches: S)
    where
        S: Stream<Item = Batch> + Unpin + Send,
    {
        let processor_mut = match self.processor_mut.as_ref() {
            Some(processor_mut) => processor_mut.clone(),
            None => return,
        };
        let (record_tx, mut record_rx) = mpsc::channel::<Record>(self.buffer_size);
        task::spawn({
            let context = self.base.context.clone();
            async move {
                while let Some(record) = record_rx.recv().await {
                    if let Err(e) = processor_mut.run(record).await {
                        error!("Failed to run processor.({})", e);
                        context.cancel();
                        break;
                    }
                }
            }
        });

        dispatch_loop!((batches, self.base.context) => |batch: Batch| async {
            let batch = self.base.intercept(batch);
            for record in batch {
                if let Err(e) = record_tx.send(record).await {
                    raise_dispatch_error!("Failed to dispatch record.", e);
                }
            }
            Ok::<(), DispatchError>(())
        });
    }

    async fn wait(&mut self) {
        drop(self.processor_mut.take());

        let shutdown_complete_tx = self.base.shutdown_complete_tx.take().unwrap();
        drop(shutdown_complete_tx);

        let mut shutdown_complete_rx = self.base.shutdown_complete_rx.take().unwrap();
        let _ = shutdown_complete_rx.recv().await;
    }
}
