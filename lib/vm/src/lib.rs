//! # zOS VM - Host Environment for Proxy Contracts
//!
//! This crate provides the account model that zOS proxy contracts execute
//! against: accounts with code and sparse word storage, contract
//! deployment from a single opaque payload, plain and delegated calls, logs,
//! and transaction-atomic rollback.
//!
//! Contracts never see the [`World`] directly. They receive a `&mut dyn`
//! [`Host`], the same way a Stylus contract talks to its VM, which keeps the
//! contract code independent of how the chain state is stored.
//!
//! ## Usage
//!
//! Logic is attached to code with [`World::install`]. Any payload starting
//! with installed code resolves to that [`Program`]: at deployment the rest
//! of the payload is handed to [`Program::construct`], and calls into an
//! account whose code starts with it are served by [`Program::call`].
//!
//! ```rust
//! use alloy_primitives::{Address, B256};
//! use zos_vm::prelude::*;
//!
//! struct Store;
//!
//! impl Program for Store {
//!     fn call(&self, host: &mut dyn Host, calldata: &[u8]) -> CallResult {
//!         host.storage_store(B256::ZERO, B256::right_padding_from(calldata));
//!         Ok(Vec::new())
//!     }
//! }
//!
//! let mut world = World::new();
//! world.install(b"store".to_vec(), Store);
//!
//! let alice = Address::repeat_byte(0xA1);
//! let store = world.deploy(alice, b"store").expect("should deploy");
//! world.transact(alice, store, &[0xFF]).expect("should store");
//!
//! assert_eq!(world.storage(store, B256::ZERO)[0], 0xFF);
//! ```
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod frame;
mod host;
pub mod prelude;
mod program;
mod world;

pub use error::Error;
pub use frame::Frame;
pub use host::{log, Host};
pub use program::{CallResult, Program};
pub use world::{World, DEFAULT_MAX_CALL_DEPTH};
