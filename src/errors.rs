use serenity::model::prelude::ChannelId;
use thiserror::Error;

use crate::bot::helpers::HelperError;

pub type Result<T> = std::result::Result<T, Error>;

// The Display strings are shown verbatim to the user as ephemeral notices.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    UserError(#[from] UserError),
    #[error("An unexpected error occurred.")]
    SystemError(#[from] SystemError),
    #[error("An unexpected error occurred.")]
    SerenityError(#[from] serenity::Error),
    #[error("An unexpected error occurred.")]
    HelperError(#[from] HelperError),
}

impl Error {
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::UserError(_))
    }
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("You already have an open ticket: <#{0}>")]
    TicketAlreadyOpen(ChannelId),
    #[error("This ticket category is currently unavailable. Please try again later.")]
    CategoryUnavailable,
}

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("missing modal field: {0}")]
    MissingModalField(&'static str),
    #[error("unexpected error: {0}")]
    UnexpectedError(String),
}
