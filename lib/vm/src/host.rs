//! The VM surface contracts execute against.
use alloy_primitives::{Address, Bytes, LogData, B256};
use alloy_sol_types::SolEvent;

use crate::CallResult;

/// The VM surface a contract executes against.
///
/// A [`Host`] is always bound to one frame of execution: an account whose
/// storage and identity are in use, the account whose code is running, and
/// the caller. During a delegated call the first and the second differ.
pub trait Host {
    /// Returns the account whose storage and identity the frame uses.
    fn contract_address(&self) -> Address;

    /// Returns the caller of the current frame.
    fn msg_sender(&self) -> Address;

    /// Reads the word at `key` from the current contract's storage.
    ///
    /// Storage is sparse: a key that was never written reads as
    /// [`B256::ZERO`].
    fn storage_load(&self, key: B256) -> B256;

    /// Writes `value` at `key` in the current contract's storage.
    fn storage_store(&mut self, key: B256, value: B256);

    /// Returns the runtime code of `account`, empty if it has none.
    fn code(&self, account: Address) -> Bytes;

    /// Returns the code that is currently executing.
    ///
    /// Inside a delegated call this is the callee's code, not the code of
    /// [`Host::contract_address`]. While a constructor runs it is empty.
    fn own_code(&self) -> Bytes;

    /// Returns whether `account` is a deployed contract with nonempty code.
    fn has_code(&self, account: Address) -> bool {
        !self.code(account).is_empty()
    }

    /// Deploys `payload` as the creation payload of a new account.
    ///
    /// Returns the new account's address, or [`Address::ZERO`] if the
    /// deployment failed for any reason. A failed deployment leaves no
    /// trace besides the deployer's nonce.
    fn create(&mut self, payload: &[u8]) -> Address;

    /// Calls `target` with `calldata` in `target`'s own context.
    ///
    /// # Errors
    ///
    /// * The callee's revert data, empty if it failed without any.
    fn call(&mut self, target: Address, calldata: &[u8]) -> CallResult;

    /// Runs `target`'s code with `calldata` against the current contract's
    /// storage, keeping the current contract address and caller.
    ///
    /// # Errors
    ///
    /// * The callee's revert data, empty if it failed without any.
    fn delegate_call(&mut self, target: Address, calldata: &[u8])
        -> CallResult;

    /// Appends a log record attributed to the current contract.
    fn emit_log(&mut self, data: LogData);
}

/// Emits a Solidity event from the current contract.
pub fn log<H: Host + ?Sized, E: SolEvent>(host: &mut H, event: E) {
    host.emit_log(event.encode_log_data());
}
