//! Guest entrypoints.
//!
//! Declares the sandbox imports and exports one `extern "C"` function per
//! ledger operation. Addresses cross the boundary as pointers to
//! [`ADDRESS_SIZE`] bytes in guest memory, amounts as `u64`.
//!
//! Any [`LedgerError`] terminates the invocation with the error code as
//! exit status; the host decides what happens to writes issued before the
//! failure.
//!
//! The exit status travels through WASI `proc_exit`, so the module is only
//! built for `wasm32-wasi*` targets. On `wasm32-unknown-unknown`,
//! `process::exit` traps and the code would be lost.

use std::process;

use qash_common::{
    config::symbol_word,
    crypto::{Address, ADDRESS_SIZE},
    error::LedgerError,
    event::LedgerEvent,
    host::{Environment, EventSink, Storage},
    policy::LedgerConfig,
};

use crate::Ledger;

cfg_if::cfg_if! {
    if #[cfg(feature = "legacy-token")] {
        const CONFIG: LedgerConfig = LedgerConfig::legacy_token();
    } else {
        const CONFIG: LedgerConfig = LedgerConfig::qash();
    }
}

mod ffi {
    extern "C" {
        pub fn chain_storage_size_get(key: *const u8, key_size: usize) -> usize;
        pub fn chain_storage_get(key: *const u8, key_size: usize, value: *mut u8) -> *mut u8;
        pub fn chain_storage_set(
            key: *const u8,
            key_size: usize,
            value: *const u8,
            value_size: usize,
        ) -> i32;
        pub fn chain_get_caller(address: *mut u8);
        pub fn chain_get_creator(address: *mut u8);

        #[link_name = "Owner"]
        pub fn event_owner(owner: *const u8) -> i32;
        #[link_name = "ChangeOwner"]
        pub fn event_change_owner(old_owner: *const u8, new_owner: *const u8) -> i32;
        #[link_name = "Mint"]
        pub fn event_mint(to: *const u8, value: u64) -> i32;
        #[link_name = "Transfer"]
        pub fn event_transfer(from: *const u8, to: *const u8, value: u64, memo: u64) -> i32;
        #[link_name = "Approval"]
        pub fn event_approval(owner: *const u8, spender: *const u8, value: u64) -> i32;
        #[link_name = "Pause"]
        pub fn event_pause() -> i32;
        #[link_name = "Unpause"]
        pub fn event_unpause() -> i32;
    }
}

/// The sandbox, seen through the host traits
struct GuestHost;

impl Storage for GuestHost {
    fn storage_size(&self, key: &[u8]) -> usize {
        unsafe { ffi::chain_storage_size_get(key.as_ptr(), key.len()) }
    }

    fn storage_get(&self, key: &[u8], buffer: &mut [u8]) {
        unsafe {
            ffi::chain_storage_get(key.as_ptr(), key.len(), buffer.as_mut_ptr());
        }
    }

    fn storage_set(&mut self, key: &[u8], value: &[u8]) -> i32 {
        unsafe { ffi::chain_storage_set(key.as_ptr(), key.len(), value.as_ptr(), value.len()) }
    }
}

impl Environment for GuestHost {
    fn caller(&self) -> Address {
        let mut bytes = [0u8; ADDRESS_SIZE];
        unsafe { ffi::chain_get_caller(bytes.as_mut_ptr()) };
        Address::new(bytes)
    }

    fn creator(&self) -> Address {
        let mut bytes = [0u8; ADDRESS_SIZE];
        unsafe { ffi::chain_get_creator(bytes.as_mut_ptr()) };
        Address::new(bytes)
    }
}

// Event delivery is fire-and-forget, the returned status is ignored
impl EventSink for GuestHost {
    fn emit(&mut self, event: LedgerEvent) {
        unsafe {
            match event {
                LedgerEvent::Owner { owner } => {
                    ffi::event_owner(owner.as_bytes().as_ptr());
                }
                LedgerEvent::ChangeOwner {
                    old_owner,
                    new_owner,
                } => {
                    ffi::event_change_owner(
                        old_owner.as_bytes().as_ptr(),
                        new_owner.as_bytes().as_ptr(),
                    );
                }
                LedgerEvent::Mint { to, amount } => {
                    ffi::event_mint(to.as_bytes().as_ptr(), amount);
                }
                LedgerEvent::Transfer {
                    from,
                    to,
                    amount,
                    memo,
                } => {
                    ffi::event_transfer(
                        from.as_bytes().as_ptr(),
                        to.as_bytes().as_ptr(),
                        amount,
                        memo,
                    );
                }
                LedgerEvent::Approval {
                    owner,
                    spender,
                    amount,
                } => {
                    ffi::event_approval(
                        owner.as_bytes().as_ptr(),
                        spender.as_bytes().as_ptr(),
                        amount,
                    );
                }
                LedgerEvent::Pause => {
                    ffi::event_pause();
                }
                LedgerEvent::Unpause => {
                    ffi::event_unpause();
                }
            }
        }
    }
}

fn run<T>(operation: impl FnOnce(&mut Ledger<'_, GuestHost>) -> Result<T, LedgerError>) -> T {
    let mut host = GuestHost;
    let mut ledger = Ledger::new(&mut host, CONFIG);
    match operation(&mut ledger) {
        Ok(value) => value,
        Err(e) => process::exit(e.code() as i32),
    }
}

/// # Safety
/// `ptr` must point to `ADDRESS_SIZE` readable bytes.
unsafe fn read_address(ptr: *const u8) -> Address {
    let mut bytes = [0u8; ADDRESS_SIZE];
    std::ptr::copy_nonoverlapping(ptr, bytes.as_mut_ptr(), ADDRESS_SIZE);
    Address::new(bytes)
}

#[no_mangle]
pub extern "C" fn initialize(supply: u64) {
    run(|ledger| ledger.initialize(supply))
}

// The owner is reported through the Owner event
#[no_mangle]
pub extern "C" fn get_owner() {
    let owner = run(|ledger| ledger.get_owner());
    GuestHost.emit(LedgerEvent::Owner { owner });
}

#[no_mangle]
pub extern "C" fn is_owner() -> u8 {
    run(|ledger| ledger.is_owner()) as u8
}

/// # Safety
/// `new_owner` must point to `ADDRESS_SIZE` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn change_owner(new_owner: *const u8) {
    let new_owner = read_address(new_owner);
    run(|ledger| ledger.change_owner(&new_owner))
}

/// # Safety
/// `address` must point to `ADDRESS_SIZE` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn get_balance(address: *const u8) -> u64 {
    let address = read_address(address);
    run(|ledger| ledger.get_balance(&address))
}

#[no_mangle]
pub extern "C" fn pause() {
    run(|ledger| ledger.pause())
}

#[no_mangle]
pub extern "C" fn unpause() {
    run(|ledger| ledger.unpause())
}

#[no_mangle]
pub extern "C" fn mint(amount: u64) {
    run(|ledger| ledger.mint(amount))
}

/// # Safety
/// `to` must point to `ADDRESS_SIZE` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn transfer(to: *const u8, amount: u64, memo: u64) {
    let to = read_address(to);
    run(|ledger| ledger.transfer(&to, amount, memo))
}

/// # Safety
/// `spender` must point to `ADDRESS_SIZE` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn approve(spender: *const u8, amount: u64) {
    let spender = read_address(spender);
    run(|ledger| ledger.approve(&spender, amount))
}

/// # Safety
/// `from` and `to` must each point to `ADDRESS_SIZE` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn transfer_from(from: *const u8, to: *const u8, amount: u64, memo: u64) {
    let from = read_address(from);
    let to = read_address(to);
    run(|ledger| ledger.transfer_from(&from, &to, amount, memo))
}

/// # Safety
/// `owner` and `spender` must each point to `ADDRESS_SIZE` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn get_allowance(owner: *const u8, spender: *const u8) -> u64 {
    let owner = read_address(owner);
    let spender = read_address(spender);
    run(|ledger| ledger.get_allowance(&owner, &spender))
}

#[no_mangle]
pub extern "C" fn get_decimals() -> u8 {
    run(|ledger| Ok(ledger.get_decimals()))
}

// ASCII symbol packed little endian into one word
#[no_mangle]
pub extern "C" fn get_symbol() -> u64 {
    symbol_word()
}

#[no_mangle]
pub extern "C" fn get_total_supply() -> u64 {
    run(|ledger| ledger.get_total_supply())
}
