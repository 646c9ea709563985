//! Ticket message rules: validation, author labels and reply notifications.
//!
//! `TicketMessageService::save` is the only write path. It validates the
//! input, stores the message and, once the row exists, hands a notification
//! mail to the queue. Notification problems never undo a stored message; they
//! are logged and reported through `NotificationOutcome`.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use db::models::ticket_messages::{self, Model as TicketMessageModel};
use db::models::tickets::Model as TicketModel;
use db::models::user::Model as UserModel;
use db::repositories::{
    AttachmentRepository, SqlRepository, TicketMessageRepository, TicketRepository,
    UserRepository,
};
use sea_orm::ActiveValue::Set;
use serde::Serialize;
use tracing::{debug, error, info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{FieldError, ServiceError};
use crate::mail_queue::{JobId, MailJob, MailQueue};
use crate::sanitizer::HtmlSanitizer;
use crate::settings::SupportSettings;

pub use db::models::ticket_messages::{MessageStatus, status_label, status_options};

/// Input for a new message, as posted by a customer or an agent.
#[derive(Debug, Clone, Default, Validate)]
pub struct NewTicketMessage {
    #[validate(required(message = "Ticket is required"))]
    pub ticket_id: Option<i64>,
    pub user_id: Option<i64>,
    #[validate(custom(function = "not_blank"))]
    pub content: String,
    pub status: Option<i32>,
    pub mail_id: Option<String>,
    pub info: Option<String>,
    pub fetch_date: Option<DateTime<Utc>>,
    /// Set when this message is the opening message of a ticket created in
    /// the same request. Opening messages do not trigger a notification.
    pub new_ticket: bool,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("Content is required")));
    }
    Ok(())
}

fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    for (field, errs) in errors.field_errors() {
        for err in errs.iter() {
            let reason = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            out.push(FieldError::new(field.to_string(), reason));
        }
    }
    out
}

/// What happened to the notification of a saved message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Queued(JobId),
    Skipped(&'static str),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SavedMessage {
    pub message: TicketMessageModel,
    pub ticket: TicketModel,
    pub notification: NotificationOutcome,
}

/// How a message is shown in a ticket thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    pub id: i64,
    pub content: String,
    pub is_own: bool,
    pub username: String,
    pub status: &'static str,
    pub media_count: u64,
    /// `dd.mm.yy HH:MM:SS`
    pub created_at: String,
}

pub fn format_created_at(created_at: &DateTime<Utc>) -> String {
    created_at.format("%d.%m.%y %H:%M:%S").to_string()
}

/// Author label of `message`.
///
/// Replies by anyone other than the ticket starter are masked with
/// `username_support` unless `show_username_support` is set.
pub fn resolve_display_username(
    message: &TicketMessageModel,
    ticket: &TicketModel,
    author: Option<&UserModel>,
    settings: &SupportSettings,
) -> String {
    if !message.is_own(ticket) && !settings.show_username_support {
        return settings.username_support.clone();
    }
    match author {
        Some(user) => user.display_value(&settings.user_display_field).to_owned(),
        None => ticket.name_email(),
    }
}

#[derive(Clone)]
pub struct Stores {
    pub tickets: Arc<dyn TicketRepository>,
    pub users: Arc<dyn UserRepository>,
    pub attachments: Arc<dyn AttachmentRepository>,
    pub messages: Arc<dyn TicketMessageRepository>,
}

impl Stores {
    pub fn sql(repo: SqlRepository) -> Self {
        let repo = Arc::new(repo);
        Self {
            tickets: repo.clone(),
            users: repo.clone(),
            attachments: repo.clone(),
            messages: repo,
        }
    }
}

#[derive(Clone)]
pub struct TicketMessageService {
    stores: Stores,
    sanitizer: Arc<dyn HtmlSanitizer>,
    queue: Arc<dyn MailQueue>,
    settings: SupportSettings,
}

impl TicketMessageService {
    pub fn new(
        stores: Stores,
        sanitizer: Arc<dyn HtmlSanitizer>,
        queue: Arc<dyn MailQueue>,
        settings: SupportSettings,
    ) -> Self {
        Self {
            stores,
            sanitizer,
            queue,
            settings,
        }
    }

    pub fn settings(&self) -> &SupportSettings {
        &self.settings
    }

    /// Checks `input` and sanitizes its content in place.
    ///
    /// Every violated constraint is reported, not just the first one.
    pub async fn validate(&self, input: &mut NewTicketMessage) -> Result<(), ServiceError> {
        self.check(input).await.map(|_| ())
    }

    async fn check(&self, input: &mut NewTicketMessage) -> Result<TicketModel, ServiceError> {
        let mut errors = match input.validate() {
            Ok(()) => Vec::new(),
            Err(errs) => collect_field_errors(&errs),
        };

        // Presence is judged on the raw input; a body reduced to nothing by
        // the sanitizer is still accepted.
        input.content = self.sanitizer.sanitize(&input.content);

        if let Some(user_id) = input.user_id {
            if self.stores.users.find_user(user_id).await?.is_none() {
                errors.push(FieldError::new("user_id", "User does not exist"));
            }
        }

        let mut ticket = None;
        if let Some(ticket_id) = input.ticket_id {
            ticket = self.stores.tickets.find_ticket(ticket_id).await?;
            if ticket.is_none() {
                errors.push(FieldError::new("ticket_id", "Ticket does not exist"));
            }
        }

        match ticket {
            Some(ticket) if errors.is_empty() => Ok(ticket),
            _ => {
                errors.sort_by(|a, b| a.field.cmp(&b.field));
                debug!(errors = ?errors, "Ticket message rejected");
                Err(ServiceError::Validation(errors))
            }
        }
    }

    /// Validates, stores and announces a new message.
    pub async fn save(&self, mut input: NewTicketMessage) -> Result<SavedMessage, ServiceError> {
        let ticket = self.check(&mut input).await?;

        let mut active = ticket_messages::new_active_model(
            ticket.id,
            input.user_id,
            input.content,
            input.status,
        );
        active.mail_id = Set(input.mail_id);
        active.info = Set(input.info);
        active.fetch_date = Set(input.fetch_date);

        let message = self.stores.messages.insert(active).await?;
        info!(message_id = message.id, ticket_id = ticket.id, "Ticket message stored");

        let notification = self.on_inserted(&message, &ticket, input.new_ticket).await;

        Ok(SavedMessage {
            message,
            ticket,
            notification,
        })
    }

    /// Queues the reply notification for a freshly inserted message.
    pub async fn on_inserted(
        &self,
        message: &TicketMessageModel,
        ticket: &TicketModel,
        new_ticket: bool,
    ) -> NotificationOutcome {
        if !self.settings.notify_by_email {
            return NotificationOutcome::Skipped("email notifications are disabled");
        }
        if new_ticket {
            return NotificationOutcome::Skipped("message opens a new ticket");
        }

        let own = message.is_own(ticket);

        let sender = match self.sender_address(ticket, own).await {
            Ok(sender) => sender,
            Err(err) => {
                error!(message_id = message.id, error = %err, "Could not resolve notification sender");
                return NotificationOutcome::Failed(err.to_string());
            }
        };

        let recipient = if own {
            Some(sender.clone())
        } else {
            match self.starter_address(ticket).await {
                Ok(recipient) => recipient,
                Err(err) => {
                    error!(message_id = message.id, error = %err, "Could not resolve notification recipient");
                    return NotificationOutcome::Failed(err.to_string());
                }
            }
        };
        let Some(recipient) = recipient else {
            warn!(message_id = message.id, ticket_id = ticket.id, "Ticket starter has no mail address");
            return NotificationOutcome::Skipped("no recipient address");
        };

        let job = MailJob {
            message_id: message.id,
            sender,
            recipient,
        };
        match self.queue.push(job).await {
            Ok(id) => {
                info!(job = %id, message_id = message.id, "Notification mail queued");
                NotificationOutcome::Queued(id)
            }
            Err(err) => {
                error!(message_id = message.id, error = %err, "Failed to queue notification mail");
                NotificationOutcome::Failed(err.to_string())
            }
        }
    }

    /// Starter replies go out from the category mailbox when there is one;
    /// everything else uses the default support address.
    async fn sender_address(&self, ticket: &TicketModel, own: bool) -> Result<String, ServiceError> {
        if own {
            if let Some(category_id) = ticket.category_id {
                let category = self.stores.tickets.find_category(category_id).await?;
                if let Some(receiver) = category.as_ref().and_then(|c| c.receiver_address()) {
                    return Ok(receiver.to_owned());
                }
            }
        }
        Ok(self.settings.support_email.clone())
    }

    async fn starter_address(&self, ticket: &TicketModel) -> Result<Option<String>, ServiceError> {
        if let Some(user_id) = ticket.user_id {
            if let Some(user) = self.stores.users.find_user(user_id).await? {
                return Ok(Some(user.email));
            }
        }
        Ok(ticket
            .user_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_owned))
    }

    pub fn is_own_message(message: &TicketMessageModel, ticket: &TicketModel) -> bool {
        message.is_own(ticket)
    }

    pub async fn media_count(&self, message: &TicketMessageModel) -> Result<u64, ServiceError> {
        Ok(self.stores.attachments.count_for_message(message.id).await?)
    }

    pub async fn display_username(
        &self,
        message: &TicketMessageModel,
        ticket: &TicketModel,
    ) -> Result<String, ServiceError> {
        let author = match message.user_id {
            Some(user_id) => self.stores.users.find_user(user_id).await?,
            None => None,
        };
        Ok(resolve_display_username(message, ticket, author.as_ref(), &self.settings))
    }

    pub async fn view(
        &self,
        message: &TicketMessageModel,
        ticket: &TicketModel,
    ) -> Result<MessageView, ServiceError> {
        Ok(MessageView {
            id: message.id,
            content: message.content.clone(),
            is_own: message.is_own(ticket),
            username: self.display_username(message, ticket).await?,
            status: message.status_text(),
            media_count: self.media_count(message).await?,
            created_at: format_created_at(&message.created_at),
        })
    }

    /// Thread of a ticket, oldest message first.
    pub async fn thread(&self, ticket_id: i64) -> Result<Vec<MessageView>, ServiceError> {
        let ticket = self
            .stores
            .tickets
            .find_ticket(ticket_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Ticket {ticket_id}")))?;

        let messages = self.stores.messages.find_for_ticket(ticket_id).await?;
        let mut views = Vec::with_capacity(messages.len());
        for message in &messages {
            views.push(self.view(message, &ticket).await?);
        }
        Ok(views)
    }
}
