use crate::error::LedgerError;

// Amounts never wrap and never saturate: any violation fails the invocation

#[inline]
pub fn checked_add(a: u64, b: u64) -> Result<u64, LedgerError> {
    a.checked_add(b).ok_or(LedgerError::ArithmeticOverflow)
}

#[inline]
pub fn checked_sub(a: u64, b: u64) -> Result<u64, LedgerError> {
    a.checked_sub(b).ok_or(LedgerError::ArithmeticUnderflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add() {
        assert_eq!(checked_add(1, 2), Ok(3));
        assert_eq!(checked_add(u64::MAX, 0), Ok(u64::MAX));
        assert_eq!(checked_add(u64::MAX, 1), Err(LedgerError::ArithmeticOverflow));
        assert_eq!(
            checked_add(u64::MAX / 2 + 1, u64::MAX / 2 + 1),
            Err(LedgerError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_checked_sub() {
        assert_eq!(checked_sub(5, 5), Ok(0));
        assert_eq!(checked_sub(5, 3), Ok(2));
        assert_eq!(checked_sub(0, 1), Err(LedgerError::ArithmeticUnderflow));
        assert_eq!(checked_sub(100, 150), Err(LedgerError::ArithmeticUnderflow));
    }
}
