use crate::crypto::ADDRESS_SIZE;

// Token metadata, fixed at compile time and never stored
pub const TOKEN_SYMBOL: &str = "QASH";
pub const TOKEN_DECIMALS: u8 = 6;

// The symbol is returned packed into a single u64 word
pub const SYMBOL_WORD_SIZE: usize = 8;
const _: () = assert!(TOKEN_SYMBOL.len() <= SYMBOL_WORD_SIZE);

// Storage keys and prefixes
// Every key carries its NUL terminator so that a prefix can never be
// read as the start of another kind's key.
pub const OWNER_KEY: &[u8] = b"OWNER\0";
pub const PAUSE_KEY: &[u8] = b"PAUSE\0";
pub const TOTAL_SUPPLY_KEY: &[u8] = b"TOTAL_SUPPLY\0";
pub const BALANCES_PREFIX: &[u8] = b"BALANCES\0";
pub const ALLOWANCES_PREFIX: &[u8] = b"ALLOWANCES\0";

// Legacy token layout: different pause key, balances keyed by raw address
pub const LEGACY_PAUSE_KEY: &[u8] = b"IS_PAUSE\0";

pub const BALANCE_KEY_SIZE: usize = BALANCES_PREFIX.len() + ADDRESS_SIZE;
pub const LEGACY_BALANCE_KEY_SIZE: usize = ADDRESS_SIZE;
pub const ALLOWANCE_KEY_SIZE: usize = ALLOWANCES_PREFIX.len() + ADDRESS_SIZE * 2;

// Stored value widths
// u64 little endian for every amount
pub const AMOUNT_SIZE: usize = 8;
// Legacy read helper only honored the low 32 bits
pub const LEGACY_AMOUNT_READ_SIZE: usize = 4;
pub const PAUSE_FLAG_SIZE: usize = 1;

/// Pack the token symbol into a little endian word, zero padded.
pub const fn symbol_word() -> u64 {
    let symbol = TOKEN_SYMBOL.as_bytes();
    let mut word = [0u8; SYMBOL_WORD_SIZE];
    let mut i = 0;
    while i < symbol.len() {
        word[i] = symbol[i];
        i += 1;
    }
    u64::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_word() {
        let word = symbol_word();
        let bytes = word.to_le_bytes();
        assert_eq!(&bytes[..4], b"QASH");
        assert_eq!(&bytes[4..], &[0u8; 4]);
    }

    #[test]
    fn test_key_sizes() {
        assert_eq!(BALANCE_KEY_SIZE, 9 + 35);
        assert_eq!(ALLOWANCE_KEY_SIZE, 11 + 70);
        assert_eq!(LEGACY_BALANCE_KEY_SIZE, 35);
    }
}
