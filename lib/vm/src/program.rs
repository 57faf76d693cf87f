//! Logic bound to deployed code.
use crate::Host;

/// Result of executing a program: return data on success, revert data on
/// failure.
pub type CallResult = Result<Vec<u8>, Vec<u8>>;

/// Executable logic bound to a code payload.
///
/// See [`crate::World::install`].
pub trait Program: Send + Sync {
    /// Runs once when a payload resolving to this program is deployed.
    ///
    /// Returns the runtime code stored at the new account. The default
    /// implementation keeps `code` as the runtime code and ignores `args`.
    ///
    /// # Arguments
    ///
    /// * `host` - The frame of the account being deployed.
    /// * `code` - The installed code this payload resolved to.
    /// * `args` - The remainder of the payload that follows `code`.
    ///
    /// # Errors
    ///
    /// * Revert data if the deployment has to be aborted.
    fn construct(
        &self,
        host: &mut dyn Host,
        code: &[u8],
        args: &[u8],
    ) -> CallResult {
        let _ = (host, args);
        Ok(code.to_vec())
    }

    /// Handles a call into an account running this program.
    ///
    /// # Arguments
    ///
    /// * `host` - The frame the call executes in.
    /// * `calldata` - The call's input.
    ///
    /// # Errors
    ///
    /// * Revert data if the call has to be aborted.
    fn call(&self, host: &mut dyn Host, calldata: &[u8]) -> CallResult;
}

impl<F> Program for F
where
    F: Fn(&mut dyn Host, &[u8]) -> CallResult + Send + Sync,
{
    fn call(&self, host: &mut dyn Host, calldata: &[u8]) -> CallResult {
        self(host, calldata)
    }
}
