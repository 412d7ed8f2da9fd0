//! Serve — open the input, run the pipeline, write samples as JSON lines.

use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{info, error};

use crate::conf::SamplerConfig;
use crate::parser::metrics::PipelineMetrics;
use crate::parser::Sample;
use crate::samples;

/// Run the pipeline over the configured input until it is exhausted.
///
/// A read failure on the input is fatal and returned to the caller.
pub async fn serve(config: SamplerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let metrics = Arc::new(PipelineMetrics::new());

    let (rx, handle) = match &config.input_path {
        Some(path) => {
            let file = File::open(path).await.map_err(|e| {
                error!("Failed to open input {}: {}", path, e);
                e
            })?;
            info!("Reading status snapshots from: {}", path);
            samples::spawn(file, &config, Arc::clone(&metrics))
        }
        None => {
            info!("Reading status snapshots from stdin");
            samples::spawn(tokio::io::stdin(), &config, Arc::clone(&metrics))
        }
    };

    let written = write_samples(rx, tokio::io::stdout()).await?;
    let result = handle.await?;

    info!(written, metrics = ?metrics.snapshot(), "Pipeline finished");

    result.map_err(|e| {
        error!("Pipeline failed: {}", e);
        e.into()
    })
}

/// Write every received sample as one JSON object per line.
///
/// Returns the number of samples written.
pub async fn write_samples<W>(mut rx: mpsc::Receiver<Sample>, mut out: W) -> std::io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(sample) = rx.recv().await {
        let mut line = serde_json::to_vec(&sample)?;
        line.push(b'\n');
        out.write_all(&line).await?;
        written += 1;
    }
    out.flush().await?;
    Ok(written)
}
