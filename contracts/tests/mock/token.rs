//! A minimal token, in two versions, kept behind the proxies under test.
use alloy_primitives::{keccak256, Address, B256, U256};
use alloy_sol_macro::sol;
use alloy_sol_types::{SolError, SolInterface, SolValue};
use eyre::Result;
use zos_vm::{CallResult, Host, Program, World};

sol! {
    interface IToken {
        function version() external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function mint(address to, uint256 amount) external;
        function transfer(address to, uint256 amount) external returns (bool);
        function burn(uint256 amount) external;

        event Transfer(address indexed from, address indexed to, uint256 value);

        error InsufficientBalance(
            address sender,
            uint256 balance,
            uint256 needed
        );
        error UnsupportedCall();
    }
}

pub use IToken::*;

pub const TOKEN_V1_CODE: &[u8] = b"mock:token-v1";
pub const TOKEN_V2_CODE: &[u8] = b"mock:token-v2";

const TOTAL_SUPPLY_SLOT: B256 = B256::ZERO;

/// Balances live in a mapping at slot one.
fn balance_slot(account: Address) -> B256 {
    let key = account.into_word();
    let slot = B256::with_last_byte(1);
    keccak256([key.as_slice(), slot.as_slice()].concat())
}

pub fn total_supply(host: &dyn Host) -> U256 {
    host.storage_load(TOTAL_SUPPLY_SLOT).into()
}

pub fn balance_of(host: &dyn Host, account: Address) -> U256 {
    host.storage_load(balance_slot(account)).into()
}

/// Credits `amount` new tokens to `to`.
pub fn mint(host: &mut dyn Host, to: Address, amount: U256) {
    let supply = total_supply(host) + amount;
    let balance = balance_of(host, to) + amount;
    host.storage_store(TOTAL_SUPPLY_SLOT, supply.into());
    host.storage_store(balance_slot(to), balance.into());
    zos_vm::log(host, Transfer { from: Address::ZERO, to, value: amount });
}

fn debit(host: &mut dyn Host, from: Address, amount: U256) -> CallResult {
    let balance = balance_of(host, from);
    if balance < amount {
        return Err(InsufficientBalance {
            sender: from,
            balance,
            needed: amount,
        }
        .abi_encode());
    }
    host.storage_store(balance_slot(from), (balance - amount).into());
    Ok(Vec::new())
}

/// Serves the calls both versions have in common, leaving `burn` to `v2`.
fn dispatch(host: &mut dyn Host, calldata: &[u8], version: u64) -> CallResult {
    let call = ITokenCalls::abi_decode(calldata).map_err(|_| Vec::new())?;
    match call {
        ITokenCalls::version(_) => Ok(U256::from(version).abi_encode()),
        ITokenCalls::totalSupply(_) => Ok(total_supply(host).abi_encode()),
        ITokenCalls::balanceOf(call) => {
            Ok(balance_of(host, call.account).abi_encode())
        }
        ITokenCalls::mint(call) => {
            mint(host, call.to, call.amount);
            Ok(Vec::new())
        }
        ITokenCalls::transfer(call) => {
            let from = host.msg_sender();
            debit(host, from, call.amount)?;
            let balance = balance_of(host, call.to) + call.amount;
            host.storage_store(balance_slot(call.to), balance.into());
            zos_vm::log(
                host,
                Transfer { from, to: call.to, value: call.amount },
            );
            Ok(true.abi_encode())
        }
        ITokenCalls::burn(call) if version >= 2 => {
            let from = host.msg_sender();
            debit(host, from, call.amount)?;
            let supply = total_supply(host) - call.amount;
            host.storage_store(TOTAL_SUPPLY_SLOT, supply.into());
            zos_vm::log(
                host,
                Transfer { from, to: Address::ZERO, value: call.amount },
            );
            Ok(Vec::new())
        }
        ITokenCalls::burn(_) => Err(UnsupportedCall {}.abi_encode()),
    }
}

pub struct TokenV1;

impl Program for TokenV1 {
    fn call(&self, host: &mut dyn Host, calldata: &[u8]) -> CallResult {
        dispatch(host, calldata, 1)
    }
}

pub struct TokenV2;

impl Program for TokenV2 {
    fn call(&self, host: &mut dyn Host, calldata: &[u8]) -> CallResult {
        dispatch(host, calldata, 2)
    }
}

/// Installs both token versions and deploys one of each from `deployer`.
pub fn deploy(
    world: &mut World,
    deployer: Address,
) -> Result<(Address, Address)> {
    world.install(TOKEN_V1_CODE, TokenV1);
    world.install(TOKEN_V2_CODE, TokenV2);
    let v1 = world.deploy(deployer, TOKEN_V1_CODE)?;
    let v2 = world.deploy(deployer, TOKEN_V2_CODE)?;
    Ok((v1, v2))
}
