use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Handle of a spawned stage worker.
pub(crate) struct StageWorker {
    pub(crate) stage: &'static str,
    pub(crate) handle: JoinHandle<()>,
}

/// Wait for every stage worker and report the ones that did not finish cleanly.
///
/// Semantics:
/// - Workers are awaited in pipeline order.
/// - A panicked worker is logged and its stage name returned; the remaining
///   workers are still awaited.
/// - An aborted worker (runtime shutting down) is logged at debug level only.
pub(crate) async fn settle_workers(
    pipeline: &str,
    workers: Vec<StageWorker>,
) -> Vec<&'static str> {
    let mut failed = Vec::new();

    for worker in workers {
        match worker.handle.await {
            Ok(()) => {}
            Err(join_error) if join_error.is_cancelled() => {
                debug!(pipeline, stage = worker.stage, "Stage worker was cancelled");
            }
            Err(join_error) => {
                error!(
                    pipeline,
                    stage = worker.stage,
                    error = %join_error,
                    "Stage worker panicked"
                );
                failed.push(worker.stage);
            }
        }
    }

    failed
}
