pub mod error;
pub mod mail_queue;
pub mod mail_worker;
pub mod mailer;
pub mod sanitizer;
pub mod settings;
pub mod ticket_message_service;
