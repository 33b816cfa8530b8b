use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use fundamentals_core::errors::Result;
use log::{debug, error};
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A job runs against the writer's connection and returns a core Result,
// since that's what callers expect.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;

type ErasedReply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    // Each job is a boxed closure paired with a oneshot sender for the reply.
    // Box<dyn Any + Send> erases the job's return type.
    tx: mpsc::Sender<(Job<Box<dyn Any + Send + 'static>>, ErasedReply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection,
    /// inside an immediate transaction.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| StorageError::WriterUnavailable("writer channel closed".to_string()))?;

        let boxed = ret_rx.await.map_err(|_| {
            StorageError::WriterUnavailable("writer dropped the reply".to_string())
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            StorageError::CoreError("writer returned an unexpected result type".to_string())
                .into()
        })
    }
}

/// Spawns a background Tokio task that acts as the single writer to the
/// database. The actor owns one pooled connection for its lifetime and runs
/// jobs serially.
///
/// The connection is taken before spawning so that an exhausted or broken
/// pool is reported to the caller.
pub fn spawn_writer(pool: DbPool) -> Result<WriteHandle> {
    let (tx, mut rx) = mpsc::channel::<(Job<Box<dyn Any + Send + 'static>>, ErasedReply)>(1024);

    let mut conn = pool.get().map_err(StorageError::from)?;

    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result: Result<Box<dyn Any + Send + 'static>> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| {
                    error!("Write job failed: {}", e);
                    e.into()
                });

            // The requester may have gone away; nothing to do then.
            let _ = reply_tx.send(result);
        }
        debug!("All write handles dropped, writer stopping");
    });

    Ok(WriteHandle { tx })
}
