//! This is a low-level set of contracts implementing an upgradeable proxy
//! whose bookkeeping lives in namespaced storage slots.
use alloy_primitives::Address;
use zos_vm::{CallResult, Host};

pub mod abi;
pub mod admin;
pub mod upgradeability;

/// This trait provides a fallback function that delegates all calls to another
/// contract using a delegated call. We refer to the second contract as the
/// _implementation_ behind the proxy, and it has to be specified by
/// overriding the [`IProxy::implementation`] function.
///
/// Additionally, delegation to the implementation can be triggered manually
/// through the [`IProxy::do_fallback`] function, or to a different contract
/// through the [`IProxy::delegate`] function.
///
/// The success and return data of the delegated call will be returned back
/// to the caller of the proxy.
pub trait IProxy {
    /// Delegates the current call to `implementation`.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy.
    /// * `host` - Write access to the contract's state.
    /// * `implementation` - The address of the implementation contract.
    /// * `calldata` - The calldata to delegate to the implementation contract.
    ///
    /// # Errors
    ///
    /// * The revert data of the implementation, unmodified.
    fn delegate(
        &self,
        host: &mut dyn Host,
        implementation: Address,
        calldata: &[u8],
    ) -> CallResult {
        host.delegate_call(implementation, calldata)
    }

    /// Returns the address to which the fallback function and
    /// [`IProxy::do_fallback`] should delegate.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy.
    /// * `host` - Read access to the contract's state.
    ///
    /// # Errors
    ///
    /// * Revert data if no implementation can be resolved.
    fn implementation(&self, host: &dyn Host) -> Result<Address, Vec<u8>>;

    /// Fallback function that delegates calls to the address returned
    /// by [`IProxy::implementation`]. Will run if no other function in the
    /// contract matches the call data.
    ///
    /// # Arguments
    ///
    /// * `&self` - The proxy.
    /// * `host` - Write access to the contract's state.
    /// * `calldata` - The calldata to delegate to the implementation contract.
    ///
    /// # Errors
    ///
    /// * The revert data of the implementation, unmodified.
    fn do_fallback(&self, host: &mut dyn Host, calldata: &[u8]) -> CallResult {
        let implementation = self.implementation(host)?;
        self.delegate(host, implementation, calldata)
    }
}
