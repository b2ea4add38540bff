use thiserror::Error;

/// Reasons a run cannot be set up
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("offset of {offset} days plus {days} reported days does not fit in a day counter")]
    HorizonOverflow { offset: u32, days: u32 },
}
