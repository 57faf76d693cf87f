//! An initializer template that mints the initial supply of a token proxy.
use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use eyre::Result;
use zos_vm::{CallResult, Host, Program, World};

use super::token;

pub const SUPPLY_CODE: &[u8] = b"mock:initial-supply";

/// Deployed with `(address holder, uint256 amount)` appended to its code.
///
/// Delegating to a deployed unit mints `amount` to `holder` in the storage
/// of the caller.
pub struct InitialSupply;

impl Program for InitialSupply {
    fn construct(
        &self,
        _host: &mut dyn Host,
        code: &[u8],
        args: &[u8],
    ) -> CallResult {
        Ok([code, args].concat())
    }

    fn call(&self, host: &mut dyn Host, _calldata: &[u8]) -> CallResult {
        let code = host.own_code();
        let args = code.get(SUPPLY_CODE.len()..).unwrap_or_default();
        let (holder, amount) = <(Address, U256)>::abi_decode_params(args)
            .map_err(|_| Vec::new())?;
        token::mint(host, holder, amount);
        Ok(Vec::new())
    }
}

/// Encodes the arguments of an [`InitialSupply`] unit.
pub fn args(holder: Address, amount: U256) -> Vec<u8> {
    (holder, amount).abi_encode_params()
}

/// Installs [`InitialSupply`] and deploys its bare code from `deployer`.
pub fn deploy(world: &mut World, deployer: Address) -> Result<Address> {
    world.install(SUPPLY_CODE, InitialSupply);
    Ok(world.deploy(deployer, SUPPLY_CODE)?)
}
