//! Publish — drive segmenter → parser and hand samples to the consumer.

use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

use crate::conf::SamplerConfig;
use crate::parser::metrics::PipelineMetrics;
use crate::parser::{get_parser, RecordParser, Sample};

use super::error::SampleError;
use super::segment::Segmenter;

/// Start the pipeline on a background task.
///
/// Returns the receiving end of the sample channel and the task handle.
/// The task ends with `Ok(())` at end of input or when the receiver is
/// dropped, and with an error if reading the input fails.
pub fn spawn<R>(
    reader: R,
    config: &SamplerConfig,
    metrics: Arc<PipelineMetrics>,
) -> (mpsc::Receiver<Sample>, JoinHandle<Result<(), SampleError>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let segmenter = Segmenter::from_config(reader, config, Arc::clone(&metrics));
    let handle = tokio::spawn(run(segmenter, tx, metrics));
    (rx, handle)
}

/// Run the pipeline to completion on the current task.
pub async fn run<R>(
    segmenter: Segmenter<R>,
    tx: mpsc::Sender<Sample>,
    metrics: Arc<PipelineMetrics>,
) -> Result<(), SampleError>
where
    R: AsyncRead + Unpin,
{
    let records = segmenter.into_stream();
    tokio::pin!(records);

    // Layout is fixed per stream, so the parser is resolved once
    let mut parser: Option<Box<dyn RecordParser>> = None;

    while let Some(record) = records.next().await {
        let record = record?;
        let parser = parser.get_or_insert_with(|| get_parser(record.layout));

        let parsed = parser.parse(&record.bytes);
        metrics.record_parse(parsed.sample.len(), parsed.discarded_lines);

        if !publish(&tx, parsed.sample, &metrics).await {
            tracing::debug!("publish: receiver dropped, stopping");
            return Ok(());
        }
    }

    tracing::info!(
        published = metrics.snapshot().samples_published,
        "publish: end of input"
    );
    Ok(())
}

/// Send a sample, waiting for channel capacity. Empty samples are dropped.
///
/// Returns false once the receiver has gone away.
pub async fn publish(tx: &mpsc::Sender<Sample>, sample: Sample, metrics: &PipelineMetrics) -> bool {
    if sample.is_empty() {
        tracing::trace!("publish: dropping empty sample");
        return true;
    }

    if tx.send(sample).await.is_err() {
        return false;
    }
    metrics.record_published();
    true
}
