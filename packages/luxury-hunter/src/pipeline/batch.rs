//! Concurrent batch processing.
//!
//! Every image in a batch is decoded and analyzed concurrently. Each image
//! becomes exactly one item, whatever happens to it; items are recorded in
//! completion order and progress advances with each one.

use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use super::decode::decode;
use crate::adapter::ExtractionAdapter;
use crate::registry::Registry;
use crate::types::{ImageInput, Item};

/// Outcome counts for one finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total: usize,
    pub priced: usize,
    pub unpriced: usize,

    /// Images that fell back to the sentinel (decode, provider, timeout, panic)
    pub fallbacks: usize,

    pub duration_ms: u64,
}

/// Analyze `inputs` and record one item per input in `registry`.
///
/// Returns once every image has been recorded and progress is done. An empty
/// batch completes immediately with `{0, 0, done}` progress.
pub async fn run_batch(
    adapter: &ExtractionAdapter,
    registry: &Registry,
    inputs: Vec<ImageInput>,
) -> BatchReport {
    let started = Instant::now();
    let total = inputs.len();

    registry.begin_batch(total);
    info!(image_count = total, "Starting batch analysis");

    let tasks = inputs
        .iter()
        .enumerate()
        .map(|(idx, input)| process_one(adapter, registry, idx, input));
    let outcomes = join_all(tasks).await;

    registry.finish_batch();

    let mut report = BatchReport {
        total,
        duration_ms: started.elapsed().as_millis() as u64,
        ..BatchReport::default()
    };
    for (has_price, fell_back) in outcomes {
        if has_price {
            report.priced += 1;
        } else {
            report.unpriced += 1;
        }
        if fell_back {
            report.fallbacks += 1;
        }
    }

    info!(
        total = report.total,
        priced = report.priced,
        unpriced = report.unpriced,
        fallbacks = report.fallbacks,
        duration_ms = report.duration_ms,
        "Batch analysis complete"
    );

    report
}

/// Decode, analyze and record one image. Returns `(has_price, fell_back)`.
async fn process_one(
    adapter: &ExtractionAdapter,
    registry: &Registry,
    idx: usize,
    input: &ImageInput,
) -> (bool, bool) {
    let outcome = match decode(input).await {
        Ok(image) => adapter.analyze_detailed(&image).await,
        Err(e) => adapter.fallback(&input.label(), e),
    };
    let fell_back = outcome.is_fallback();

    let item = Item::from_extraction(input.source.clone(), outcome.into_result());
    let has_price = item.has_price();
    debug!(
        idx,
        item_id = %item.id(),
        has_price,
        fell_back,
        "Image recorded"
    );
    registry.record(item);

    (has_price, fell_back)
}
