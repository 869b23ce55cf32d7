pub mod channels;
pub mod interactions;
pub mod messages;

#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    #[error("{0}")]
    SerenityError(#[from] serenity::Error),
}

pub type HelperResult<T> = std::result::Result<T, HelperError>;
