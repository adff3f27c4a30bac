/// An outbound message to a single recipient
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}
