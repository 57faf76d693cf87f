//! A collection of utilities for working with [`Address`].

use alloy_primitives::Address;
use alloy_sol_types::SolError;
pub use sol::*;
use zos_vm::{CallResult, Host};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// There's no code at `target` (it is not a contract).
        ///
        /// * `target` - Address of the target contract.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error AddressEmptyCode(address target);

        /// A call to an address target failed. The target may have reverted
        /// without a revert reason.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error FailedCall();

        /// A call to an address target failed. The target may have reverted
        /// with a reason.
        ///
        /// * `reason` - The revert reason that was returned by the call.
        #[derive(Debug, PartialEq)]
        #[allow(missing_docs)]
        error FailedCallWithReason(bytes reason);
    }
}

/// An [`AddressUtils`] error.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// There's no code at `target` (it is not a contract).
    EmptyCode(AddressEmptyCode),
    /// A call to an address target failed. The target may have reverted
    /// without a revert reason.
    FailedCall(FailedCall),
    /// A call to an address target failed. The target may have reverted
    /// with a reason.
    FailedCallWithReason(FailedCallWithReason),
}

impl From<AddressEmptyCode> for Error {
    fn from(value: AddressEmptyCode) -> Self {
        Error::EmptyCode(value)
    }
}

impl From<FailedCall> for Error {
    fn from(value: FailedCall) -> Self {
        Error::FailedCall(value)
    }
}

impl From<FailedCallWithReason> for Error {
    fn from(value: FailedCallWithReason) -> Self {
        Error::FailedCallWithReason(value)
    }
}

impl From<Error> for Vec<u8> {
    fn from(value: Error) -> Self {
        match value {
            Error::EmptyCode(e) => e.abi_encode(),
            Error::FailedCall(e) => e.abi_encode(),
            Error::FailedCallWithReason(e) => e.abi_encode(),
        }
    }
}

/// A collection of utilities for working with [`Address`].
pub struct AddressUtils;

impl AddressUtils {
    /// Performs a delegate call to `target` with the given `data`.
    ///
    /// # Arguments
    ///
    /// * `host` - Write access to the contract's state.
    /// * `target` - The address of the target contract.
    /// * `data` - The data to pass to the target contract.
    ///
    /// # Errors
    ///
    /// * [`Error::FailedCall`] - If the call to the target contract fails
    ///   without a revert reason.
    /// * [`Error::FailedCallWithReason`] - If the call to the target contract
    ///   fails with a revert reason.
    /// * [`Error::EmptyCode`] - If the target contract has no code.
    pub fn function_delegate_call(
        host: &mut (impl Host + ?Sized),
        target: Address,
        data: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let result = host.delegate_call(target, data);
        Self::verify_call_result_from_target(&*host, target, result)
    }

    /// Helper function to verify that a low level call to smart-contract was
    /// successful.
    ///
    /// Reverts if the target was not a contract or if the call fails for any
    /// other reason. Bubbles up the revert reason (falling back to
    /// [`Error::FailedCall`]) in case of an unsuccessful call.
    ///
    /// # Arguments
    ///
    /// * `host` - Read access to the contract's state.
    /// * `target` - The address of the target contract.
    /// * `result` - The result of the call.
    ///
    /// # Errors
    ///
    /// * [`Error::EmptyCode`] - If the target contract has no code.
    /// * [`Error::FailedCallWithReason`] - If the call to the target contract
    ///   fails with a revert reason.
    /// * [`Error::FailedCall`] - If the call to the target contract fails
    ///   without a revert reason.
    pub fn verify_call_result_from_target(
        host: &(impl Host + ?Sized),
        target: Address,
        result: CallResult,
    ) -> Result<Vec<u8>, Error> {
        match result {
            Ok(returndata) => {
                if returndata.is_empty() && !host.has_code(target) {
                    return Err(AddressEmptyCode { target }.into());
                }
                Ok(returndata)
            }
            Err(reason) => Err(Self::revert(reason)),
        }
    }
}

impl AddressUtils {
    /// Reverts with `reason` if it is not empty. Otherwise reverts with
    /// [`Error::FailedCall`].
    fn revert(reason: Vec<u8>) -> Error {
        if reason.is_empty() {
            FailedCall {}.into()
        } else {
            FailedCallWithReason { reason: reason.into() }.into()
        }
    }
}
