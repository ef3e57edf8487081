//! Bounded async worker pool: a bounded channel feeding a fixed number of
//! tokio tasks draining it concurrently, with graceful shutdown. Observation
//! synthesis is CPU-light and I/O-bound on an LLM call, so a task pool fits
//! better here than a single serialized writer thread.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use hindsight_core::config::ExecutorConfig;
use hindsight_core::errors::ExecutorError;
use hindsight_core::BankId;

/// Background work the pool can run. Only one variant today
///; kept as an enum so the pool can grow other
/// background edge-building work without changing its shape.
#[derive(Debug, Clone)]
pub enum Task {
    ObservationRegenerate { bank_id: BankId, entity_id: String },
}

/// Object-safe so `WorkerPool` can hold one `Arc<dyn TaskHandler>` wired up
/// by the facade crate, rather than a generic parameter threaded through
/// every caller of `WorkerPool::new`.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, task: Task);
}

/// A fixed-size pool of tokio tasks draining one bounded channel.
/// `submit` is the backpressure point: once `queue_capacity` tasks are
/// buffered, callers await until a worker drains one.
pub struct WorkerPool {
    sender: mpsc::Sender<Task>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(config: &ExecutorConfig, handler: Arc<dyn TaskHandler>) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let mut handles = Vec::with_capacity(config.worker_count);
        for worker_id in 0..config.worker_count {
            let receiver = Arc::clone(&receiver);
            let handler = Arc::clone(&handler);
            handles.push(tokio::spawn(async move {
                loop {
                    let task = {
                        let mut rx = receiver.lock().await;
                        rx.recv().await
                    };
                    match task {
                        Some(task) => handler.handle(task).await,
                        None => {
                            tracing::debug!(worker_id, "worker pool channel closed, exiting");
                            break;
                        }
                    }
                }
            }));
        }

        Self { sender, handles }
    }

    /// Enqueue a task, suspending if the channel is at capacity.
    pub async fn submit(&self, task: Task) -> Result<(), ExecutorError> {
        self.sender.send(task).await.map_err(|_| ExecutorError::QueueDisconnected)
    }

    /// Close the channel and wait for in-flight tasks to drain.
    pub async fn shutdown(self) {
        drop(self.sender);
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "observation worker task panicked during shutdown");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler(Arc<AtomicUsize>);

    #[async_trait]
    impl TaskHandler for CountingHandler {
        async fn handle(&self, _task: Task) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn submitted_tasks_are_handled() {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(CountingHandler(Arc::clone(&count)));
        let pool = WorkerPool::new(&ExecutorConfig { worker_count: 2, queue_capacity: 8 }, handler);

        for i in 0..5 {
            pool.submit(Task::ObservationRegenerate { bank_id: BankId::new("b1"), entity_id: format!("e{i}") })
                .await
                .unwrap();
        }
        pool.shutdown().await;
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }
}
