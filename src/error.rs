use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

/// Errors that may be returned by the lottery program.
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum LotteryError {
    /// Lottery account has not been initialized
    #[error("Lottery account has not been initialized")]
    NotInitialized,

    /// Entry value is below the entry fee
    #[error("Entry value is below the entry fee")]
    InsufficientValue,

    /// Entries are rejected while a draw is in progress
    #[error("Round is not open for entries")]
    RoundNotOpen,

    /// Entry list is at capacity
    #[error("Entry list is at capacity")]
    LotteryFull,

    /// The upkeep conditions do not all hold
    #[error("Upkeep is not needed")]
    UpkeepNotNeeded,

    /// Callback identifier does not match the outstanding request
    #[error("Unknown randomness request")]
    UnknownRequest,

    /// Oracle callback carried no random values
    #[error("Oracle callback carried no random values")]
    MissingRandomValue,

    /// Oracle account does not match the configured oracle
    #[error("Oracle account does not match the configured oracle")]
    OracleMismatch,

    /// Prize transfer could not be completed
    #[error("Prize transfer failed")]
    TransferFailed,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl From<LotteryError> for ProgramError {
    fn from(e: LotteryError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for LotteryError {
    fn type_of() -> &'static str {
        "Lottery Error"
    }
}

impl PrintProgramError for LotteryError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
