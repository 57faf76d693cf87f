//! Frames of execution handed to programs as their host.
use alloy_primitives::{Address, Bytes, Log, LogData, B256};
use log::warn;

use crate::{world::Message, CallResult, Host, World};

/// A single frame of execution inside a [`World`].
///
/// Programs receive it as a `&mut dyn` [`Host`].
pub struct Frame<'w> {
    world: &'w mut World,
    message: Message,
    depth: usize,
}

impl<'w> Frame<'w> {
    pub(crate) fn new(
        world: &'w mut World,
        message: Message,
        depth: usize,
    ) -> Self {
        Self { world, message, depth }
    }

    /// Returns the nesting level of this frame, starting at one for the
    /// frame a transaction enters.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Host for Frame<'_> {
    fn contract_address(&self) -> Address {
        self.message.context
    }

    fn msg_sender(&self) -> Address {
        self.message.caller
    }

    fn storage_load(&self, key: B256) -> B256 {
        self.world.storage(self.message.context, key)
    }

    fn storage_store(&mut self, key: B256, value: B256) {
        self.world.store(self.message.context, key, value);
    }

    fn code(&self, account: Address) -> Bytes {
        self.world.code(account)
    }

    fn own_code(&self) -> Bytes {
        self.world.code(self.message.code_address)
    }

    fn create(&mut self, payload: &[u8]) -> Address {
        self.world
            .create(self.message.context, payload, self.depth)
            .unwrap_or_else(|e| {
                warn!("create from {} failed: {e}", self.message.context);
                Address::ZERO
            })
    }

    fn call(&mut self, target: Address, calldata: &[u8]) -> CallResult {
        let message = Message {
            context: target,
            code_address: target,
            caller: self.message.context,
        };
        self.world
            .execute(message, calldata, self.depth)
            .map_err(crate::Error::into_revert_data)
    }

    fn delegate_call(
        &mut self,
        target: Address,
        calldata: &[u8],
    ) -> CallResult {
        let message = Message {
            context: self.message.context,
            code_address: target,
            caller: self.message.caller,
        };
        self.world
            .execute(message, calldata, self.depth)
            .map_err(crate::Error::into_revert_data)
    }

    fn emit_log(&mut self, data: LogData) {
        self.world.push_log(Log { address: self.message.context, data });
    }
}
