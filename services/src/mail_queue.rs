//! Hand-off of notification mails to a background worker.
//!
//! Pushing never waits: a full or closed queue is reported to the caller
//! immediately so that saving a message is never held up by mail delivery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::error::QueueError;

/// A request to tell someone about a new ticket message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailJob {
    pub message_id: i64,
    pub sender: String,
    pub recipient: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[async_trait]
pub trait MailQueue: Send + Sync {
    async fn push(&self, job: MailJob) -> Result<JobId, QueueError>;
}

#[derive(Debug, Clone)]
pub struct QueuedMail {
    pub id: JobId,
    pub job: MailJob,
}

/// In-process queue backed by a bounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelMailQueue {
    tx: mpsc::Sender<QueuedMail>,
}

/// Creates a queue and the receiving end a `MailWorker` drains.
pub fn mail_queue(capacity: usize) -> (ChannelMailQueue, mpsc::Receiver<QueuedMail>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (ChannelMailQueue { tx }, rx)
}

#[async_trait]
impl MailQueue for ChannelMailQueue {
    async fn push(&self, job: MailJob) -> Result<JobId, QueueError> {
        let id = JobId::new();
        self.tx
            .try_send(QueuedMail { id, job })
            .map_err(|err| match err {
                TrySendError::Full(_) => QueueError::Full,
                TrySendError::Closed(_) => QueueError::Closed,
            })?;
        Ok(id)
    }
}
