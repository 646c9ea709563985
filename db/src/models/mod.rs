pub mod ticket_attachments;
pub mod ticket_category;
pub mod ticket_messages;
pub mod tickets;
pub mod user;

pub use ticket_attachments::Entity as TicketAttachment;
pub use ticket_category::Entity as TicketCategory;
pub use ticket_messages::Entity as TicketMessage;
pub use tickets::Entity as Ticket;
pub use user::Entity as User;
