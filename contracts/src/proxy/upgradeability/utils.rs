//! Implementation registry of the zOS proxy protocol: the storage slot that
//! holds the current implementation, and the operations that change it.
//!
//! The slot is derived from a namespaced string instead of taking a position
//! in the sequential storage layout, so the logic running behind the proxy
//! never writes to it by accident.
use alloy_primitives::{b256, keccak256, Address, B256};
use alloy_sol_types::SolError;
use log::debug;
pub use sol::*;
use zos_vm::Host;

use crate::utils::{
    address::{self, AddressUtils},
    storage_slot::StorageSlot,
};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when the implementation is upgraded.
        ///
        /// * `implementation` - Address of the new implementation.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        event Upgraded(address indexed implementation);
    }

    sol! {
        /// The `implementation` of the proxy is not a deployed contract.
        ///
        /// * `implementation` - Address of the invalid implementation.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error ProxyInvalidImplementation(address implementation);

        /// Deploying the initializer built from `template` failed.
        ///
        /// * `template` - Address whose code prefixed the payload.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error ProxyDeploymentFailed(address template);

        /// The one-shot initializer call into `unit` failed.
        ///
        /// * `unit` - Address of the deployed initializer.
        /// * `reason` - The revert data returned by the call.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error ProxyInitializationFailed(address unit, bytes reason);

        /// The hardcoded implementation slot does not match its namespace.
        ///
        /// * `expected` - The hardcoded slot.
        /// * `actual` - The digest of the namespace.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error ProxyInvalidSlot(bytes32 expected, bytes32 actual);
    }
}

/// An [`ImplementationRegistry`] error.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The implementation of the proxy is not a deployed contract.
    InvalidImplementation(ProxyInvalidImplementation),
    /// Deploying the initializer failed.
    DeploymentFailed(ProxyDeploymentFailed),
    /// The one-shot initializer call failed.
    InitializationFailed(ProxyInitializationFailed),
    /// The hardcoded implementation slot does not match its namespace.
    InvalidSlot(ProxyInvalidSlot),
    /// There's no code at `target` (it is not a contract).
    EmptyCode(address::AddressEmptyCode),
    /// A call to an address target failed. The target may have reverted
    /// without a revert reason.
    FailedCall(address::FailedCall),
    /// A call to an address target failed. The target may have reverted
    /// with a reason.
    FailedCallWithReason(address::FailedCallWithReason),
}

impl From<ProxyInvalidImplementation> for Error {
    fn from(value: ProxyInvalidImplementation) -> Self {
        Error::InvalidImplementation(value)
    }
}

impl From<ProxyDeploymentFailed> for Error {
    fn from(value: ProxyDeploymentFailed) -> Self {
        Error::DeploymentFailed(value)
    }
}

impl From<ProxyInitializationFailed> for Error {
    fn from(value: ProxyInitializationFailed) -> Self {
        Error::InitializationFailed(value)
    }
}

impl From<ProxyInvalidSlot> for Error {
    fn from(value: ProxyInvalidSlot) -> Self {
        Error::InvalidSlot(value)
    }
}

impl From<address::Error> for Error {
    fn from(value: address::Error) -> Self {
        match value {
            address::Error::EmptyCode(e) => Error::EmptyCode(e),
            address::Error::FailedCall(e) => Error::FailedCall(e),
            address::Error::FailedCallWithReason(e) => {
                Error::FailedCallWithReason(e)
            }
        }
    }
}

impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        match value {
            Error::InvalidImplementation(e) => e.abi_encode(),
            Error::DeploymentFailed(e) => e.abi_encode(),
            Error::InitializationFailed(e) => e.abi_encode(),
            Error::InvalidSlot(e) => e.abi_encode(),
            Error::EmptyCode(e) => e.abi_encode(),
            Error::FailedCall(e) => e.abi_encode(),
            Error::FailedCallWithReason(e) => e.abi_encode(),
        }
    }
}

/// Namespace hashed into [`IMPLEMENTATION_SLOT`].
pub const IMPLEMENTATION_SLOT_NAMESPACE: &str =
    "org.zeppelinos.proxy.implementation";

/// Storage slot with the address of the current implementation.
/// This is the keccak-256 hash of "org.zeppelinos.proxy.implementation".
pub const IMPLEMENTATION_SLOT: B256 = b256!(
    "0x7050c9e0f4ca769c69bd3a8ef740bc37934f8e2c036e5a723fd8ee048ed3f8c3"
);

/// Getters and event emitting update functions for the implementation slot.
pub struct ImplementationRegistry;

impl ImplementationRegistry {
    /// Returns the current implementation address, [`Address::ZERO`] if it
    /// was never set.
    ///
    /// # Arguments
    ///
    /// * `host` - Read access to the contract's state.
    #[must_use]
    pub fn get(host: &(impl Host + ?Sized)) -> Address {
        StorageSlot::get_slot(host, IMPLEMENTATION_SLOT)
    }

    /// Stores `implementation` in the implementation slot as is.
    ///
    /// Callers are expected to have checked that `implementation` is a
    /// deployed contract, see [`Self::upgrade_to`].
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `implementation` - The address to store.
    pub fn set(host: &mut (impl Host + ?Sized), implementation: Address) {
        StorageSlot::set_slot(host, IMPLEMENTATION_SLOT, implementation);
    }

    /// Checks that [`IMPLEMENTATION_SLOT`] is the digest of
    /// [`IMPLEMENTATION_SLOT_NAMESPACE`].
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidSlot`] - If the hardcoded slot does not match.
    pub fn check_slot() -> Result<(), Error> {
        let actual = keccak256(IMPLEMENTATION_SLOT_NAMESPACE);
        if actual != IMPLEMENTATION_SLOT {
            return Err(ProxyInvalidSlot {
                expected: IMPLEMENTATION_SLOT,
                actual,
            }
            .into());
        }
        Ok(())
    }

    /// Upgrades the implementation to `new_implementation`.
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `new_implementation` - The new implementation address.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidImplementation`] - If `new_implementation` has no
    ///   code. The slot is left untouched.
    ///
    /// # Events
    ///
    /// * [`Upgraded`].
    pub fn upgrade_to(
        host: &mut (impl Host + ?Sized),
        new_implementation: Address,
    ) -> Result<(), Error> {
        Self::_set_implementation(host, new_implementation)?;
        debug!(
            "{} upgraded to {new_implementation}",
            host.contract_address()
        );
        zos_vm::log(host, Upgraded { implementation: new_implementation });
        Ok(())
    }

    /// Performs an implementation upgrade with an additional setup call if
    /// `data` is nonempty. The setup call runs in the proxy's context.
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `new_implementation` - The new implementation address.
    /// * `data` - The data to pass to the setup call.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidImplementation`] - If `new_implementation` has no
    ///   code.
    /// * [`Error::FailedCall`] - If the setup call failed without a revert
    ///   reason.
    /// * [`Error::FailedCallWithReason`] - If the setup call failed with a
    ///   revert reason.
    ///
    /// # Events
    ///
    /// * [`Upgraded`].
    pub fn upgrade_to_and_call(
        host: &mut (impl Host + ?Sized),
        new_implementation: Address,
        data: &[u8],
    ) -> Result<(), Error> {
        Self::upgrade_to(host, new_implementation)?;

        if !data.is_empty() {
            AddressUtils::function_delegate_call(
                host,
                new_implementation,
                data,
            )?;
        }

        Ok(())
    }

    /// Stores a new address in the implementation slot, without emitting
    /// [`Upgraded`].
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `new_implementation` - The new implementation address.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidImplementation`] - If `new_implementation` has no
    ///   code.
    pub(crate) fn _set_implementation(
        host: &mut (impl Host + ?Sized),
        new_implementation: Address,
    ) -> Result<(), Error> {
        if !host.has_code(new_implementation) {
            return Err(ProxyInvalidImplementation {
                implementation: new_implementation,
            }
            .into());
        }

        Self::set(host, new_implementation);

        Ok(())
    }
}
