use async_trait::async_trait;
use tracing::debug;

use crate::stage::{ItemReceiver, ItemSender, Stage};

/// Forwards every item unchanged, in arrival order.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassThroughStage;

#[async_trait]
impl<T> Stage<T> for PassThroughStage
where
    T: Send + 'static,
{
    fn name(&self) -> &'static str {
        "PassThrough"
    }

    async fn run(&self, input: ItemReceiver<T>, output: ItemSender<T>) {
        while let Ok(item) = input.recv_async().await {
            if output.send_async(item).await.is_err() {
                debug!(stage = "PassThrough", "Downstream closed, stopping");
                return;
            }
        }
    }
}
