use crate::context::Context;
use crate::kafka::record::Record;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::Mutex;

/// フィルタを通過したレコードを1件ずつ処理するユーザ定義のプロセッサ。
#[async_trait]
pub trait IRecordProcessor: 'static + Send + Sync {
    async fn execute(&self, record: Record) -> Result<(), &'static str>;
}

pub struct DefaultProcessor;

#[async_trait]
impl IRecordProcessor for DefaultProcessor {
    async fn execute(&self, _record: Record) -> Result<(), &'static str> {
        // noop
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct Processor {
    proc: Arc<Box<dyn IRecordProcessor>>,
    context: Context,
    _shutdown_complete_tx: mpsc::Sender<()>,
}

impl Processor {
    pub(crate) fn new(
        proc: Arc<Box<dyn IRecordProcessor>>,
        context: Context,
        shutdown_complete_tx: mpsc::Sender<()>,
    ) -> Self {
        Self {
            proc,
            context,
            _shutdown_complete_tx: shutdown_complete_tx,
        }
    }

    pub(crate) async fn run(&self, record: Record) -> Result<(), &'static str> {
        tokio::select! {
            res = self.proc.execute(record) => { res }
            _ = self.context.done() => { Err("Already canceled.") }
        }
    }
}

#[async_trait]
pub trait IRecordProcessorMut: 'static + Send + Sync {
    async fn execute(&mut self, record: Record) -> Result<(), &'static str>;
}

pub struct DefaultProcessorMut;

#[async_trait]
impl IRecordProcessorMut for DefaultProcessorMut {
    async fn execute(&mut self, _record: Record) -> Result<(), &'static str> {
        // noop
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) struct ProcessorMut {
    proc: Arc<Mutex<Box<dyn IRecordProcessorMut>>>,
    context: Context,
    _shutdown_complete_tx: mpsc::Sender<()>,
}

impl ProcessorMut {
    pub(crate) fn new(
        proc: Arc<Mutex<Box<dyn IRecordProcessorMut>>>,
        context: Context,
        shutdown_complete_tx: mpsc::Sender<()>,
    ) -> Self {
        Self {
            proc,
            context,
            _shutdown_complete_tx: shutdown_complete_tx,
        }
    }

    pub(crate) async fn run(&self, record: Record) -> Result<(), &'static str> {
        let mut processor_mut = self.proc.lock().await;
        tokio::select! {
            res = processor_mut.execute(record) => { res }
            _ = self.context.done() => { Err("Already canceled.") }
        }
    }
}
