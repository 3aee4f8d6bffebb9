use crate::id::UserId;

/// The single active login of a user.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id      : UserId,
    pub token        : String,
    /// Target for push notifications
    pub device_token : Option<String>,
}
