mod address;
mod error;

pub use address::{Address, ADDRESS_SIZE};
pub use error::AddressError;
