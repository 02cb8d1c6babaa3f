use crate::ext::timestamp::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid template: {0}")]
    InvalidTemplate(#[from] TemplateError),
    #[error("This message was not sent by me.")]
    NotOwnMessage,
    #[error("This message is not an /echo message.")]
    NotEchoMessage,
    #[error("Timezone offset `{0}` is outside -12..=12 hours.")]
    TimezoneRange(String),
    #[error("Could not read the submitted form: {0}")]
    Form(&'static str),
    #[error("Missing configuration: {0}")]
    Config(&'static str),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Serenity(#[from] serenity::Error),
}

impl Error {
    /// Errors that are the invoking user's to fix, shown to them as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::InvalidTemplate(_)
                | Error::NotOwnMessage
                | Error::NotEchoMessage
                | Error::TimezoneRange(_)
        )
    }
}
