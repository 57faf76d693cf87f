//! One-shot initialization of a proxy from a template.
//!
//! The deployment primitive takes a single opaque payload and nothing else.
//! To run initialization logic with arguments, the template's code is used
//! as a prefix and the encoded arguments are appended to it. The resulting
//! unit is deployed, then delegated to exactly once so that everything its
//! code writes lands in the proxy's storage. The unit is never used again.
use alloy_primitives::{Address, Bytes};
use log::debug;
use zos_vm::Host;

use super::utils::{Error, ProxyDeploymentFailed, ProxyInitializationFailed};

/// Deploy-and-initialize step run while a proxy is constructed.
pub struct Initializer;

impl Initializer {
    /// Concatenates `template_code` and `args` into a creation payload.
    ///
    /// Lengths and byte order are preserved; no padding or length prefix is
    /// added.
    ///
    /// # Arguments
    ///
    /// * `template_code` - Runtime code of the template.
    /// * `args` - Encoded initialization arguments.
    #[must_use]
    pub fn compose_payload(template_code: &[u8], args: &[u8]) -> Vec<u8> {
        let mut payload = Vec::with_capacity(template_code.len() + args.len());
        payload.extend_from_slice(template_code);
        payload.extend_from_slice(args);
        payload
    }

    /// Deploys `template`'s code extended with `args` and runs the deployed
    /// unit once in the context of the current contract.
    ///
    /// Returns the address of the throwaway unit. It is not recorded
    /// anywhere.
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `template` - Address whose code prefixes the payload.
    /// * `args` - Encoded initialization arguments.
    ///
    /// # Errors
    ///
    /// * [`Error::DeploymentFailed`] - If the template has no code or the
    ///   unit could not be deployed.
    /// * [`Error::InitializationFailed`] - If the initializer call reverted.
    pub fn deploy_and_initialize(
        host: &mut (impl Host + ?Sized),
        template: Address,
        args: &[u8],
    ) -> Result<Address, Error> {
        let template_code = host.code(template);
        if template_code.is_empty() {
            return Err(ProxyDeploymentFailed { template }.into());
        }

        let payload = Self::compose_payload(&template_code, args);
        let unit = host.create(&payload);
        if unit.is_zero() {
            return Err(ProxyDeploymentFailed { template }.into());
        }
        debug!("deployed initializer {unit} from template {template}");

        host.delegate_call(unit, &[]).map_err(|reason| {
            ProxyInitializationFailed { unit, reason: Bytes::from(reason) }
        })?;

        Ok(unit)
    }
}
