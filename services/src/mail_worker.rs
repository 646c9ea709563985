use std::sync::Arc;

use db::repositories::TicketMessageRepository;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{error, info, warn};

use crate::mail_queue::QueuedMail;
use crate::mailer::{Mailer, OutgoingMail};
use crate::sanitizer::plain_text;

/// Drains the mail queue and delivers one notification per job.
///
/// Jobs are attempted once. Failures are logged and the job is dropped.
pub struct MailWorker {
    receiver: mpsc::Receiver<QueuedMail>,
    messages: Arc<dyn TicketMessageRepository>,
    mailer: Arc<dyn Mailer>,
}

impl MailWorker {
    pub fn new(
        receiver: mpsc::Receiver<QueuedMail>,
        messages: Arc<dyn TicketMessageRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            receiver,
            messages,
            mailer,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until every `ChannelMailQueue` handle has been dropped.
    pub async fn run(mut self) {
        while let Some(queued) = self.receiver.recv().await {
            self.deliver(queued).await;
        }
        info!("Mail queue closed, worker stopping");
    }

    async fn deliver(&self, queued: QueuedMail) {
        let QueuedMail { id, job } = queued;

        let message = match self.messages.find_message(job.message_id).await {
            Ok(Some(message)) => message,
            Ok(None) => {
                warn!(job = %id, message_id = job.message_id, "Message vanished before mail was sent");
                return;
            }
            Err(err) => {
                error!(job = %id, message_id = job.message_id, error = %err, "Failed to load message for mail");
                return;
            }
        };

        let mail = OutgoingMail {
            from: job.sender,
            to: job.recipient,
            subject: format!("[Ticket #{}] New reply", message.ticket_id),
            text_body: plain_text(&message.content),
            html_body: format!(
                "<html><body><p>A new reply was added to ticket #{}:</p><div>{}</div></body></html>",
                message.ticket_id, message.content
            ),
        };
        let recipient = mail.to.clone();

        match self.mailer.send(mail).await {
            Ok(()) => info!(job = %id, to = %recipient, "Notification mail sent"),
            Err(err) => error!(job = %id, to = %recipient, error = %err, "Notification mail failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MailError;
    use crate::mail_queue::{MailJob, MailQueue, mail_queue};
    use async_trait::async_trait;
    use db::models::ticket_messages::new_active_model;
    use db::models::tickets::Model as TicketModel;
    use db::models::user::Model as UserModel;
    use db::repositories::SqlRepository;
    use db::test_utils::setup_test_db;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, mail: OutgoingMail) -> Result<(), MailError> {
            self.sent.lock().await.push(mail);
            Ok(())
        }
    }

    #[tokio::test]
    async fn worker_sends_queued_notification() {
        let db = setup_test_db().await;
        let repo = Arc::new(SqlRepository::new(db.clone()));
        let owner = UserModel::create(&db, "owner", "owner@example.com", false).await.unwrap();
        let ticket = TicketModel::create(&db, None, owner.id, "Broken link").await.unwrap();
        let message = repo
            .insert(new_active_model(ticket.id, None, "<p>Fixed it</p>".into(), None))
            .await
            .unwrap();

        let mailer = Arc::new(RecordingMailer::default());
        let (queue, rx) = mail_queue(8);
        queue
            .push(MailJob {
                message_id: message.id,
                sender: "support@example.com".into(),
                recipient: "owner@example.com".into(),
            })
            .await
            .unwrap();
        queue
            .push(MailJob {
                message_id: message.id + 50,
                sender: "support@example.com".into(),
                recipient: "nobody@example.com".into(),
            })
            .await
            .unwrap();
        drop(queue);

        MailWorker::new(rx, repo, mailer.clone()).run().await;

        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[0].from, "support@example.com");
        assert_eq!(sent[0].subject, format!("[Ticket #{}] New reply", ticket.id));
        assert_eq!(sent[0].text_body, "Fixed it");
        assert!(sent[0].html_body.contains("<p>Fixed it</p>"));
    }
}
