use num_derive::FromPrimitive;
use solana_program::{
    decode_error::DecodeError,
    msg,
    program_error::{PrintProgramError, ProgramError},
};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, FromPrimitive, PartialEq, Eq)]
pub enum ClmsrError {
    // Fixed-point kernel (0-9)
    #[error("Invalid parameter")]
    InvalidParameter = 0,

    #[error("Exponential input out of range")]
    InputOutOfRange = 1,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow = 2,

    // Distribution tree (10-19)
    #[error("Tree not initialized")]
    NotInitialized = 10,

    #[error("Tree already initialized")]
    AlreadyInitialized = 11,

    #[error("Invalid bin range")]
    InvalidRange = 12,

    #[error("Invalid range factor")]
    InvalidFactor = 13,

    // Pricing engine (20-29)
    #[error("Trade did not move the distribution in the expected direction")]
    NonIncreasingSum = 20,

    #[error("Distribution sum is zero after trade")]
    SumAfterZero = 21,

    #[error("Chunked trade made no progress")]
    NoChunkProgress = 22,

    #[error("Quantity left over after the chunk budget")]
    ResidualQuantity = 23,

    #[error("Affected range has zero weight")]
    AffectedSumZero = 24,

    // Vault accounting (30-39)
    #[error("Net asset value would drop below zero")]
    NavUnderflow = 30,

    #[error("Vault has no outstanding shares")]
    ZeroShares = 31,

    #[error("Share price is zero")]
    ZeroPrice = 32,

    #[error("Insufficient shares")]
    InsufficientShares = 33,

    #[error("Insufficient net asset value")]
    InsufficientNav = 34,
}

impl PrintProgramError for ClmsrError {
    fn print<E>(&self) {
        msg!("ClmsrError: {}", self);
    }
}

impl From<ClmsrError> for ProgramError {
    fn from(e: ClmsrError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for ClmsrError {
    fn type_of() -> &'static str {
        "ClmsrError"
    }
}

impl TryFrom<ProgramError> for ClmsrError {
    type Error = ProgramError;

    fn try_from(error: ProgramError) -> Result<Self, Self::Error> {
        match error {
            ProgramError::Custom(code) => {
                num_traits::FromPrimitive::from_u32(code).ok_or(error)
            }
            _ => Err(error),
        }
    }
}
