//! Module with a contract that implements an upgradeable proxy.
//!
//! It is upgradeable because calls are delegated to an implementation address
//! that can be changed. This address is stored in storage at a slot derived
//! from the "org.zeppelinos.proxy.implementation" namespace, so that it
//! doesn't conflict with the storage layout of the implementation behind the
//! proxy.
//!
//! The proxy is constructed from three arguments: a template, the initial
//! implementation and the encoded arguments for the template. The template's
//! code, extended with the arguments, is deployed and run once against the
//! proxy's storage before the initial implementation is recorded.
use alloy_primitives::{Address, Bytes};
use alloy_sol_types::SolValue;
use zos_vm::{CallResult, Host, Program};

use crate::proxy::IProxy;

pub mod initializer;
pub mod utils;

pub use initializer::Initializer;
pub use utils::{
    Error, ImplementationRegistry, Upgraded, IMPLEMENTATION_SLOT,
    IMPLEMENTATION_SLOT_NAMESPACE,
};

/// Arguments of an [`UpgradeabilityProxy`] constructor, ABI-encoded as the
/// parameters `(address template, address implementation, bytes args)`.
pub type ConstructorArgs = (Address, Address, Bytes);

/// An upgradeable proxy.
///
/// Every call is forwarded to the current implementation. Upgrades are only
/// reachable from Rust through [`UpgradeabilityProxy::upgrade_to`]; exposing
/// them to callers is left to a wrapping contract that decides who may
/// upgrade, such as [`crate::proxy::admin::AdminUpgradeabilityProxy`].
pub struct UpgradeabilityProxy;

impl UpgradeabilityProxy {
    /// Constructor.
    ///
    /// Deploys `template`'s code extended with `args`, runs it once against
    /// the proxy's storage and then records `implementation`. No
    /// [`Upgraded`] event is emitted for the initial implementation.
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `template` - Address whose code prefixes the initializer.
    /// * `implementation` - The initial implementation.
    /// * `args` - Encoded initialization arguments.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidSlot`] - If the implementation slot does not match
    ///   its namespace.
    /// * [`Error::DeploymentFailed`] - If the initializer could not be
    ///   deployed.
    /// * [`Error::InitializationFailed`] - If the initializer call reverted.
    /// * [`Error::InvalidImplementation`] - If `implementation` has no code.
    pub fn constructor(
        host: &mut (impl Host + ?Sized),
        template: Address,
        implementation: Address,
        args: &[u8],
    ) -> Result<(), Error> {
        ImplementationRegistry::check_slot()?;
        Initializer::deploy_and_initialize(host, template, args)?;
        ImplementationRegistry::_set_implementation(host, implementation)
    }

    /// Returns the current implementation.
    ///
    /// # Arguments
    ///
    /// * `host` - Read access to the contract's state.
    #[must_use]
    pub fn implementation(host: &(impl Host + ?Sized)) -> Address {
        ImplementationRegistry::get(host)
    }

    /// Upgrades the proxy to `new_implementation`.
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `new_implementation` - The new implementation.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidImplementation`] - If `new_implementation` has no
    ///   code.
    ///
    /// # Events
    ///
    /// * [`Upgraded`].
    pub fn upgrade_to(
        host: &mut (impl Host + ?Sized),
        new_implementation: Address,
    ) -> Result<(), Error> {
        ImplementationRegistry::upgrade_to(host, new_implementation)
    }

    /// Builds the creation payload of a proxy whose code is `code`.
    ///
    /// # Arguments
    ///
    /// * `code` - Code the proxy program is installed under.
    /// * `template` - Address whose code prefixes the initializer.
    /// * `implementation` - The initial implementation.
    /// * `args` - Encoded initialization arguments.
    #[must_use]
    pub fn creation_payload(
        code: &[u8],
        template: Address,
        implementation: Address,
        args: &[u8],
    ) -> Vec<u8> {
        let params: ConstructorArgs =
            (template, implementation, Bytes::copy_from_slice(args));
        [code, &params.abi_encode_params()].concat()
    }

    /// Decodes constructor arguments from the payload suffix.
    ///
    /// # Errors
    ///
    /// * Empty revert data if `args` is not a valid encoding.
    pub(crate) fn decode_args(
        args: &[u8],
    ) -> Result<ConstructorArgs, Vec<u8>> {
        <ConstructorArgs as SolValue>::abi_decode_params(args)
            .map_err(|_| Vec::new())
    }
}

impl IProxy for UpgradeabilityProxy {
    fn implementation(&self, host: &dyn Host) -> Result<Address, Vec<u8>> {
        Ok(Self::implementation(host))
    }
}

impl Program for UpgradeabilityProxy {
    fn construct(
        &self,
        host: &mut dyn Host,
        code: &[u8],
        args: &[u8],
    ) -> CallResult {
        let (template, implementation, args) = Self::decode_args(args)?;
        Self::constructor(host, template, implementation, &args)?;
        Ok(code.to_vec())
    }

    fn call(&self, host: &mut dyn Host, calldata: &[u8]) -> CallResult {
        self.do_fallback(host, calldata)
    }
}
