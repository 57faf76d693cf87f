//! Mock programs shared by unit tests.
use alloy_primitives::{Address, B256, U256};
use alloy_sol_macro::sol;
use alloy_sol_types::{SolCall, SolInterface, SolValue};
use zos_vm::{CallResult, Host, Program, World};

sol! {
    interface ILogic {
        function setValue(uint256 value) external;
        function value() external view returns (uint256);
        function fail() external;
    }
}

/// Slot the mock logic keeps its only field in.
pub(crate) const VALUE_SLOT: B256 = B256::ZERO;

/// Code of [`Logic`].
pub(crate) const LOGIC_CODE: &[u8] = b"zos:logic";

/// Code of [`InitializerTemplate`].
pub(crate) const TEMPLATE_CODE: &[u8] = b"zos:initializer-template";

/// Code of [`BrokenTemplate`].
pub(crate) const BROKEN_TEMPLATE_CODE: &[u8] = b"zos:broken-template";

/// Value [`InitializerTemplate`] writes when it has no arguments.
pub(crate) const DEFAULT_VALUE: u64 = 42;

pub(crate) fn alice() -> Address {
    Address::repeat_byte(0xA1)
}

pub(crate) fn set_value_call(value: u64) -> Vec<u8> {
    ILogic::setValueCall { value: U256::from(value) }.abi_encode()
}

pub(crate) fn fail_call() -> Vec<u8> {
    ILogic::failCall {}.abi_encode()
}

/// A logic contract with a single `uint256` field at [`VALUE_SLOT`].
pub(crate) struct Logic;

impl Program for Logic {
    fn call(&self, host: &mut dyn Host, calldata: &[u8]) -> CallResult {
        let call =
            ILogic::ILogicCalls::abi_decode(calldata).map_err(|_| Vec::new())?;
        match call {
            ILogic::ILogicCalls::setValue(call) => {
                host.storage_store(VALUE_SLOT, call.value.into());
                Ok(Vec::new())
            }
            ILogic::ILogicCalls::value(_) => {
                let value = host.storage_load(VALUE_SLOT);
                Ok(U256::from_be_bytes(value.0).abi_encode())
            }
            ILogic::ILogicCalls::fail(_) => Err(b"logic failed".to_vec()),
        }
    }
}

/// A template whose deployed unit writes its constructor arguments (or
/// [`DEFAULT_VALUE`]) to [`VALUE_SLOT`] of whoever delegates to it.
///
/// Arguments equal to `fail` make the initializer call revert.
pub(crate) struct InitializerTemplate;

impl Program for InitializerTemplate {
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
        let args = &code[TEMPLATE_CODE.len()..];
        if args == b"fail" {
            return Err(b"initializer failed".to_vec());
        }
        let value = initialized_value(args);
        host.storage_store(VALUE_SLOT, value.into());
        Ok(Vec::new())
    }
}

/// Value [`InitializerTemplate`] writes for `args`. Arguments wider than a
/// word saturate.
pub(crate) fn initialized_value(args: &[u8]) -> U256 {
    if args.is_empty() {
        U256::from(DEFAULT_VALUE)
    } else {
        U256::try_from_be_slice(args).unwrap_or(U256::MAX)
    }
}

/// A template whose deployment always fails.
pub(crate) struct BrokenTemplate;

impl Program for BrokenTemplate {
    fn construct(
        &self,
        _host: &mut dyn Host,
        _code: &[u8],
        _args: &[u8],
    ) -> CallResult {
        Err(b"cannot deploy".to_vec())
    }

    fn call(&self, _host: &mut dyn Host, _calldata: &[u8]) -> CallResult {
        Ok(Vec::new())
    }
}

/// Installs and deploys [`Logic`].
pub(crate) fn deploy_logic(world: &mut World) -> Address {
    world.install(LOGIC_CODE, Logic);
    world.deploy(alice(), LOGIC_CODE).expect("should deploy logic")
}

/// Installs [`InitializerTemplate`] and places it at a fresh address.
pub(crate) fn deploy_template(world: &mut World) -> Address {
    world.install(TEMPLATE_CODE, InitializerTemplate);
    world.deploy(alice(), TEMPLATE_CODE).expect("should deploy template")
}

/// Installs [`BrokenTemplate`] and places its code at a fixed address.
pub(crate) fn deploy_broken_template(world: &mut World) -> Address {
    let template = Address::repeat_byte(0xB0);
    world.install(BROKEN_TEMPLATE_CODE, BrokenTemplate);
    world.set_code(template, BROKEN_TEMPLATE_CODE);
    template
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logic_reads_back_stored_value() {
        let mut world = World::new();
        let logic = deploy_logic(&mut world);

        world
            .transact(alice(), logic, &set_value_call(7))
            .expect("should set value");
        let value = world
            .transact(alice(), logic, &ILogic::valueCall {}.abi_encode())
            .expect("should read value");

        assert_eq!(value, U256::from(7).abi_encode());
    }
}
