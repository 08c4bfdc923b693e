//! Checked arithmetic for offset and length math
//!
//! Malformed files can carry counts and offsets that overflow naive
//! arithmetic. Parsers use these extensions instead of bare operators.

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("Addition overflow")]
    AdditionOverflow,
    #[error("Subtraction overflow")]
    SubtractionOverflow,
    #[error("Multiplication overflow")]
    MultiplicationOverflow,
    #[error("Conversion overflow")]
    ConversionOverflow,
}

pub trait U32Ext {
    fn usize(self) -> usize;
    fn u64(self) -> u64;
    fn safe_add(self, rhs: u32) -> Result<u32, MathError>;
    fn safe_sub(self, rhs: u32) -> Result<u32, MathError>;
    fn safe_mul(self, rhs: u32) -> Result<u32, MathError>;
}

impl U32Ext for u32 {
    fn usize(self) -> usize {
        // Assume that systems are at least 32bit
        self.try_into().unwrap()
    }

    fn u64(self) -> u64 {
        self.into()
    }

    fn safe_add(self, rhs: u32) -> Result<u32, MathError> {
        self.checked_add(rhs).ok_or(MathError::AdditionOverflow)
    }

    fn safe_sub(self, rhs: u32) -> Result<u32, MathError> {
        self.checked_sub(rhs).ok_or(MathError::SubtractionOverflow)
    }

    fn safe_mul(self, rhs: u32) -> Result<u32, MathError> {
        self.checked_mul(rhs)
            .ok_or(MathError::MultiplicationOverflow)
    }
}

pub trait UsizeExt {
    fn u32(self) -> Result<u32, MathError>;
    fn safe_add(self, rhs: usize) -> Result<usize, MathError>;
}

impl UsizeExt for usize {
    fn u32(self) -> Result<u32, MathError> {
        self.try_into().map_err(|_| MathError::ConversionOverflow)
    }

    fn safe_add(self, rhs: usize) -> Result<usize, MathError> {
        self.checked_add(rhs).ok_or(MathError::AdditionOverflow)
    }
}
