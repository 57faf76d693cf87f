//! Chain state shared by every frame of execution.
use std::{collections::HashMap, sync::Arc};

use alloy_primitives::{Address, Bytes, Log, B256};
use alloy_sol_types::SolEvent;
use log::{debug, trace};

use crate::{Error, Frame, Program};

/// Maximum number of nested frames, matching the EVM.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// State of a single account.
#[derive(Clone, Debug, Default)]
struct Account {
    nonce: u64,
    code: Bytes,
    storage: HashMap<B256, B256>,
}

/// Accounts and logs, plus the journal of writes made by the running
/// transaction.
#[derive(Debug, Default)]
struct State {
    accounts: HashMap<Address, Account>,
    logs: Vec<Log>,
    journal: Vec<JournalEntry>,
}

/// The previous value of a single write.
#[derive(Debug)]
enum JournalEntry {
    Storage { account: Address, key: B256, previous: Option<B256> },
    Nonce { account: Address, previous: u64 },
    Code { account: Address, previous: Bytes },
}

/// Position in the journal and the log a frame can revert to.
#[derive(Clone, Copy, Debug)]
struct Checkpoint {
    journal: usize,
    logs: usize,
}

impl State {
    fn checkpoint(&self) -> Checkpoint {
        Checkpoint { journal: self.journal.len(), logs: self.logs.len() }
    }

    /// Undoes every write made after `checkpoint`, newest first.
    fn revert_to(&mut self, checkpoint: Checkpoint) {
        self.logs.truncate(checkpoint.logs);
        for entry in self.journal.drain(checkpoint.journal..).rev() {
            match entry {
                JournalEntry::Storage { account, key, previous } => {
                    let account = self.accounts.entry(account).or_default();
                    match previous {
                        Some(value) => account.storage.insert(key, value),
                        None => account.storage.remove(&key),
                    };
                }
                JournalEntry::Nonce { account, previous } => {
                    self.accounts.entry(account).or_default().nonce = previous;
                }
                JournalEntry::Code { account, previous } => {
                    self.accounts.entry(account).or_default().code = previous;
                }
            }
        }
    }

    fn set_nonce(&mut self, account: Address, nonce: u64) {
        let slot = &mut self.accounts.entry(account).or_default().nonce;
        let previous = std::mem::replace(slot, nonce);
        self.journal.push(JournalEntry::Nonce { account, previous });
    }

    fn set_code(&mut self, account: Address, code: Bytes) {
        let slot = &mut self.accounts.entry(account).or_default().code;
        let previous = std::mem::replace(slot, code);
        self.journal.push(JournalEntry::Code { account, previous });
    }

    fn store(&mut self, account: Address, key: B256, value: B256) {
        let storage = &mut self.accounts.entry(account).or_default().storage;
        let previous = if value.is_zero() {
            storage.remove(&key)
        } else {
            storage.insert(key, value)
        };
        self.journal.push(JournalEntry::Storage { account, key, previous });
    }
}

/// How a frame relates to its caller.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Message {
    /// Account whose storage and identity the frame uses.
    pub(crate) context: Address,
    /// Account whose code runs.
    pub(crate) code_address: Address,
    /// Caller observed by the frame.
    pub(crate) caller: Address,
}

/// In-memory chain state: accounts, installed programs and emitted logs.
pub struct World {
    state: State,
    programs: Vec<(Bytes, Arc<dyn Program>)>,
    max_call_depth: usize,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::default(),
            programs: Vec::new(),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Sets the maximum number of nested frames.
    #[must_use]
    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    /// Binds `program` to `code`, replacing any program installed for the
    /// exact same code.
    ///
    /// A payload resolves to the program with the longest installed code that
    /// prefixes it. Empty code never resolves.
    pub fn install(
        &mut self,
        code: impl Into<Bytes>,
        program: impl Program + 'static,
    ) {
        let code = code.into();
        self.programs.retain(|(installed, _)| *installed != code);
        self.programs.push((code, Arc::new(program)));
    }

    /// Places `code` at `account` without running any constructor.
    pub fn set_code(&mut self, account: Address, code: impl Into<Bytes>) {
        self.state.accounts.entry(account).or_default().code = code.into();
    }

    /// Deploys `payload` from `sender` in a transaction of its own.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownCode`] - If `payload` resolves to no program.
    /// * [`Error::Collision`] - If the derived address is already in use.
    /// * [`Error::Revert`] - If the constructor reverted.
    pub fn deploy(
        &mut self,
        sender: Address,
        payload: &[u8],
    ) -> Result<Address, Error> {
        self.create(sender, payload, 0)
    }

    /// Calls `to` from `sender` in a transaction of its own.
    ///
    /// On failure every effect of the transaction is discarded.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownCode`] - If the code at `to` resolves to no program.
    /// * [`Error::Revert`] - If the call reverted.
    pub fn transact(
        &mut self,
        sender: Address,
        to: Address,
        calldata: &[u8],
    ) -> Result<Vec<u8>, Error> {
        let message = Message { context: to, code_address: to, caller: sender };
        self.execute(message, calldata, 0)
    }

    /// Returns the word stored at `key` by `account`.
    #[must_use]
    pub fn storage(&self, account: Address, key: B256) -> B256 {
        self.state
            .accounts
            .get(&account)
            .and_then(|account| account.storage.get(&key))
            .copied()
            .unwrap_or_default()
    }

    /// Returns the runtime code of `account`.
    #[must_use]
    pub fn code(&self, account: Address) -> Bytes {
        self.state
            .accounts
            .get(&account)
            .map(|account| account.code.clone())
            .unwrap_or_default()
    }

    /// Returns the nonce of `account`.
    #[must_use]
    pub fn nonce(&self, account: Address) -> u64 {
        self.state.accounts.get(&account).map_or(0, |account| account.nonce)
    }

    /// Returns every log emitted so far, oldest first.
    #[must_use]
    pub fn logs(&self) -> &[Log] {
        &self.state.logs
    }

    /// Removes all emitted logs.
    pub fn clear_logs(&mut self) {
        self.state.logs.clear();
    }

    /// Returns how many times `emitter` emitted `event`.
    #[must_use]
    pub fn emitted<E: SolEvent>(&self, emitter: Address, event: &E) -> usize {
        let expected = event.encode_log_data();
        self.state
            .logs
            .iter()
            .filter(|log| log.address == emitter && log.data == expected)
            .count()
    }
}

impl World {
    pub(crate) fn store(&mut self, account: Address, key: B256, value: B256) {
        self.state.store(account, key, value);
    }

    pub(crate) fn push_log(&mut self, log: Log) {
        self.state.logs.push(log);
    }

    /// Deploys `payload` from `sender` at nesting level `depth`.
    ///
    /// The sender's nonce is consumed even when the deployment fails.
    pub(crate) fn create(
        &mut self,
        sender: Address,
        payload: &[u8],
        depth: usize,
    ) -> Result<Address, Error> {
        if depth >= self.max_call_depth {
            return Err(Error::CallDepthExceeded);
        }

        let nonce = self.nonce(sender);
        let address = sender.create(nonce);
        self.state.set_nonce(sender, nonce + 1);

        let checkpoint = self.state.checkpoint();
        let result = match self.construct(sender, address, payload, depth) {
            Ok(()) => {
                debug!("{sender} deployed {address} at depth {depth}");
                Ok(address)
            }
            Err(e) => {
                debug!("deployment of {address} by {sender} failed: {e}");
                self.state.revert_to(checkpoint);
                Err(e)
            }
        };
        self.end_frame(depth);
        result
    }

    fn construct(
        &mut self,
        sender: Address,
        address: Address,
        payload: &[u8],
        depth: usize,
    ) -> Result<(), Error> {
        let used = self.state.accounts.get(&address).is_some_and(|account| {
            account.nonce != 0 || !account.code.is_empty()
        });
        if used {
            return Err(Error::Collision(address));
        }

        let (program, code_len) =
            self.resolve(payload).ok_or(Error::UnknownCode)?;
        let (code, args) = payload.split_at(code_len);
        trace!("constructing {address} with {} bytes of args", args.len());

        self.state.set_nonce(address, 1);

        let message =
            Message { context: address, code_address: address, caller: sender };
        let mut frame = Frame::new(self, message, depth + 1);
        let runtime = program
            .construct(&mut frame, code, args)
            .map_err(|data| Error::Revert(data.into()))?;

        self.state.set_code(address, runtime.into());
        Ok(())
    }

    /// Runs the code at `message.code_address` at nesting level `depth`.
    ///
    /// Calling an account without code succeeds with no return data.
    pub(crate) fn execute(
        &mut self,
        message: Message,
        calldata: &[u8],
        depth: usize,
    ) -> Result<Vec<u8>, Error> {
        if depth >= self.max_call_depth {
            return Err(Error::CallDepthExceeded);
        }

        let code = self.code(message.code_address);
        if code.is_empty() {
            return Ok(Vec::new());
        }
        let (program, _) = self.resolve(&code).ok_or(Error::UnknownCode)?;

        let checkpoint = self.state.checkpoint();
        let mut frame = Frame::new(self, message, depth + 1);
        let result = match program.call(&mut frame, calldata) {
            Ok(returndata) => Ok(returndata),
            Err(data) => {
                debug!(
                    "call into {} from {} reverted at depth {depth}",
                    message.code_address, message.caller
                );
                self.state.revert_to(checkpoint);
                Err(Error::Revert(data.into()))
            }
        };
        self.end_frame(depth);
        result
    }

    /// Drops the journal once the outermost frame of a transaction is done.
    fn end_frame(&mut self, depth: usize) {
        if depth == 0 {
            self.state.journal.clear();
        }
    }

    fn resolve(&self, payload: &[u8]) -> Option<(Arc<dyn Program>, usize)> {
        self.programs
            .iter()
            .filter(|(code, _)| !code.is_empty() && payload.starts_with(code))
            .max_by_key(|(code, _)| code.len())
            .map(|(code, program)| (Arc::clone(program), code.len()))
    }
}
