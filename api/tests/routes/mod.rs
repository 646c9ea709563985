mod health_test;
mod ticket_messages_test;
