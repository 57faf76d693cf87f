/*!
# zOS Proxy Contracts

Upgradeable proxies whose bookkeeping lives in namespaced storage slots, so
that it never collides with the storage layout of the logic behind them.

> This project is still in a very early and experimental phase. It has never
> been audited nor thoroughly reviewed for security vulnerabilities. Do not use
> in production.

## Usage

Contracts are [`zos_vm::Program`]s. Install them in a [`zos_vm::World`] under
the code they should be deployed with, and deploy them with their
constructor arguments appended:

```
use alloy_primitives::Address;
use zos_contracts::proxy::upgradeability::{
    UpgradeabilityProxy, IMPLEMENTATION_SLOT,
};
use zos_vm::{CallResult, Host, World};

fn noop(_: &mut dyn Host, _: &[u8]) -> CallResult {
    Ok(Vec::new())
}

let deployer = Address::repeat_byte(0x01);
let mut world = World::new();
world.install(b"logic".to_vec(), noop);
world.install(b"template".to_vec(), noop);
world.install(b"proxy".to_vec(), UpgradeabilityProxy);

let logic = world.deploy(deployer, b"logic").unwrap();
let template = world.deploy(deployer, b"template").unwrap();
let payload = UpgradeabilityProxy::creation_payload(
    b"proxy",
    template,
    logic,
    &[],
);
let proxy = world.deploy(deployer, &payload).unwrap();

assert_eq!(world.storage(proxy, IMPLEMENTATION_SLOT), logic.into_word());
```
*/

#![allow(clippy::pub_underscore_fields, clippy::module_name_repetitions)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod proxy;
pub mod utils;

#[cfg(test)]
mod test_utils;
