pub mod m202510010001_create_users;
pub mod m202510010002_create_ticket_categories;
pub mod m202510010003_create_tickets;
pub mod m202510010004_create_ticket_messages;
pub mod m202510010005_create_ticket_attachments;
