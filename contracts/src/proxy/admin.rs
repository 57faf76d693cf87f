//! An upgradeable proxy with an authorization mechanism for administrative
//! tasks.
//!
//! The admin is recorded at a slot derived from the
//! "org.zeppelinos.proxy.admin" namespace. The proxy is transparent: calls
//! from any other account are forwarded to the implementation, whatever
//! their selector, while the admin can only reach the entry points of
//! [`crate::proxy::abi::IAdminUpgradeabilityProxy`] and never the
//! implementation.
use alloy_primitives::{Address, B256};
use alloy_sol_types::{SolError, SolInterface, SolValue};
pub use sol::*;
use zos_vm::{CallResult, Host, Program};

use crate::{
    proxy::{
        abi::IAdminUpgradeabilityProxy::IAdminUpgradeabilityProxyCalls,
        upgradeability::{self, ImplementationRegistry, UpgradeabilityProxy},
        IProxy,
    },
    utils::storage_slot::StorageSlot,
};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when the admin account has changed.
        ///
        /// * `previous_admin` - Address of the previous admin.
        /// * `new_admin` - Address of the new admin.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        event AdminChanged(address previous_admin, address new_admin);
    }

    sol! {
        /// The admin tried to reach the implementation through the proxy.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error ProxyDeniedAdminAccess();

        /// The `admin` of the proxy is invalid.
        ///
        /// * `admin` - Address of the invalid admin.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error ProxyInvalidAdmin(address admin);
    }
}

/// An [`AdminUpgradeabilityProxy`] error.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The admin tried to reach the implementation through the proxy.
    DeniedAdminAccess(ProxyDeniedAdminAccess),
    /// The admin of the proxy is invalid.
    InvalidAdmin(ProxyInvalidAdmin),
    /// An error of the underlying [`UpgradeabilityProxy`].
    Upgradeability(upgradeability::Error),
}

impl From<ProxyDeniedAdminAccess> for Error {
    fn from(value: ProxyDeniedAdminAccess) -> Self {
        Error::DeniedAdminAccess(value)
    }
}

impl From<ProxyInvalidAdmin> for Error {
    fn from(value: ProxyInvalidAdmin) -> Self {
        Error::InvalidAdmin(value)
    }
}

impl From<upgradeability::Error> for Error {
    fn from(value: upgradeability::Error) -> Self {
        Error::Upgradeability(value)
    }
}

impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        match value {
            Error::DeniedAdminAccess(e) => e.abi_encode(),
            Error::InvalidAdmin(e) => e.abi_encode(),
            Error::Upgradeability(e) => e.into(),
        }
    }
}

/// Namespace hashed into [`ADMIN_SLOT`].
pub const ADMIN_SLOT_NAMESPACE: &str = "org.zeppelinos.proxy.admin";

/// Storage slot with the admin of the proxy.
/// This is the keccak-256 hash of "org.zeppelinos.proxy.admin".
pub const ADMIN_SLOT: B256 = B256::new(
    keccak_const::Keccak256::new()
        .update(ADMIN_SLOT_NAMESPACE.as_bytes())
        .finalize(),
);

/// An [`UpgradeabilityProxy`] whose upgrades are reserved to an admin.
pub struct AdminUpgradeabilityProxy;

impl AdminUpgradeabilityProxy {
    /// Constructor. The deployer becomes the admin.
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
    /// * [`Error::Upgradeability`] - If [`UpgradeabilityProxy::constructor`]
    ///   fails.
    pub fn constructor(
        host: &mut (impl Host + ?Sized),
        template: Address,
        implementation: Address,
        args: &[u8],
    ) -> Result<(), Error> {
        UpgradeabilityProxy::constructor(host, template, implementation, args)?;
        let deployer = host.msg_sender();
        Self::_set_admin(host, deployer);
        Ok(())
    }

    /// Returns the current admin.
    ///
    /// # Arguments
    ///
    /// * `host` - Read access to the contract's state.
    #[must_use]
    pub fn admin(host: &(impl Host + ?Sized)) -> Address {
        StorageSlot::get_slot(host, ADMIN_SLOT)
    }

    /// Changes the admin of the proxy.
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `new_admin` - The new admin address.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAdmin`] - If `new_admin` is [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`AdminChanged`].
    pub fn change_admin(
        host: &mut (impl Host + ?Sized),
        new_admin: Address,
    ) -> Result<(), Error> {
        if new_admin.is_zero() {
            return Err(ProxyInvalidAdmin { admin: new_admin }.into());
        }

        let previous_admin = Self::admin(&*host);
        zos_vm::log(host, AdminChanged { previous_admin, new_admin });
        Self::_set_admin(host, new_admin);
        Ok(())
    }

    fn _set_admin(host: &mut (impl Host + ?Sized), new_admin: Address) {
        StorageSlot::set_slot(host, ADMIN_SLOT, new_admin);
    }

    /// Serves a call made by the admin.
    ///
    /// # Errors
    ///
    /// * [`Error::DeniedAdminAccess`] - If `calldata` does not select an
    ///   administrative entry point.
    /// * Empty revert data if the arguments of the entry point are malformed.
    fn dispatch_admin(host: &mut dyn Host, calldata: &[u8]) -> CallResult {
        let selector = calldata
            .get(..4)
            .and_then(|selector| <[u8; 4]>::try_from(selector).ok());
        let is_admin_call = selector
            .is_some_and(IAdminUpgradeabilityProxyCalls::valid_selector);
        if !is_admin_call {
            return Err(Error::from(ProxyDeniedAdminAccess {}).into());
        }

        let call = IAdminUpgradeabilityProxyCalls::abi_decode(calldata)
            .map_err(|_| Vec::new())?;
        match call {
            IAdminUpgradeabilityProxyCalls::admin(_) => {
                Ok(Self::admin(&*host).abi_encode())
            }
            IAdminUpgradeabilityProxyCalls::implementation(_) => {
                Ok(UpgradeabilityProxy::implementation(&*host).abi_encode())
            }
            IAdminUpgradeabilityProxyCalls::upgradeTo(call) => {
                ImplementationRegistry::upgrade_to(host, call.newImplementation)
                    .map_err(Error::from)?;
                Ok(Vec::new())
            }
            IAdminUpgradeabilityProxyCalls::upgradeToAndCall(call) => {
                ImplementationRegistry::upgrade_to_and_call(
                    host,
                    call.newImplementation,
                    &call.data,
                )
                .map_err(Error::from)?;
                Ok(Vec::new())
            }
            IAdminUpgradeabilityProxyCalls::changeAdmin(call) => {
                Self::change_admin(host, call.newAdmin)?;
                Ok(Vec::new())
            }
        }
    }
}

impl IProxy for AdminUpgradeabilityProxy {
    fn implementation(&self, host: &dyn Host) -> Result<Address, Vec<u8>> {
        Ok(UpgradeabilityProxy::implementation(host))
    }
}

impl Program for AdminUpgradeabilityProxy {
    fn construct(
        &self,
        host: &mut dyn Host,
        code: &[u8],
        args: &[u8],
    ) -> CallResult {
        let (template, implementation, args) =
            UpgradeabilityProxy::decode_args(args)?;
        Self::constructor(host, template, implementation, &args)?;
        Ok(code.to_vec())
    }

    fn call(&self, host: &mut dyn Host, calldata: &[u8]) -> CallResult {
        if host.msg_sender() == Self::admin(&*host) {
            Self::dispatch_admin(host, calldata)
        } else {
            self.do_fallback(host, calldata)
        }
    }
}
