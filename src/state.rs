//! Lottery account state.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo, clock::UnixTimestamp, program_error::ProgramError, pubkey::Pubkey,
};

use crate::{error::LotteryError, oracle};

/// Phase of the current round.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq)]
pub enum RoundState {
    /// Accepting entries, eligible for upkeep once the interval elapses
    Open,
    /// Randomness requested, waiting for the oracle callback
    Calculating,
}

/// Connection parameters for the randomness oracle, fixed at initialization.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq)]
pub struct OracleConfig {
    /// Program that accepts randomness requests
    pub program: Pubkey,
    /// Authority expected to sign fulfillment callbacks
    pub authority: Pubkey,
    /// Oracle queue the request is routed to
    pub queue: Pubkey,
    /// Subscription funding the request
    pub subscription: u64,
    /// Confirmations the oracle waits for before calling back
    pub min_confirmations: u8,
    /// Compute budget for the fulfillment callback
    pub callback_units: u32,
}

/// Lottery account data.
///
/// A single account holds the authoritative round. It is created once and
/// never destroyed, cycling Open -> Calculating -> Open for the lifetime of
/// the program. The account balance is always the rent-exempt reserve plus
/// `pool`.
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct Lottery {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Phase of the current round
    pub round_state: RoundState,
    /// Minimum lamports required per entry
    pub entry_fee: u64,
    /// Minimum seconds between draws
    pub interval: i64,
    /// Oracle connection parameters
    pub oracle: OracleConfig,
    /// Entry capacity the account was sized for
    pub max_entries: u32,
    /// Timestamp of the most recent transition into Open
    pub last_reset_timestamp: UnixTimestamp,
    /// Lamports accumulated for the current round
    pub pool: u64,
    /// Participants of the current round, in entry order. A participant
    /// entering twice occupies two slots.
    pub entries: Vec<Pubkey>,
    /// Identifier of the in-flight randomness request
    pub pending_request_id: Option<u64>,
    /// Count of randomness requests issued so far
    pub request_counter: u64,
    /// Winner of the most recent completed round
    pub recent_winner: Option<Pubkey>,
    /// Bump seed of the lottery address
    pub bump: u8,
}

impl Lottery {
    /// Seed of the lottery address derivation.
    pub const SEED: &'static [u8] = b"lottery";

    /// Finds the program-derived address holding the lottery.
    pub fn find_address(program_id: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(&[Self::SEED], program_id)
    }

    /// Account size for the given entry capacity.
    pub fn space(max_entries: u32) -> usize {
        1 // is_initialized
            + 1 // round_state
            + 8 // entry_fee
            + 8 // interval
            + (32 + 32 + 32 + 8 + 1 + 4) // oracle
            + 4 // max_entries
            + 8 // last_reset_timestamp
            + 8 // pool
            + (4 + 32 * max_entries as usize) // entries
            + 9 // pending_request_id
            + 8 // request_counter
            + 33 // recent_winner
            + 1 // bump
    }

    /// Deserializes the lottery from its account.
    pub fn load(lottery_info: &AccountInfo) -> Result<Self, ProgramError> {
        let data = lottery_info.data.borrow();
        let lottery = Self::deserialize(&mut &data[..])?;
        if !lottery.is_initialized {
            return Err(LotteryError::NotInitialized.into());
        }
        Ok(lottery)
    }

    /// Serializes the lottery back into its account.
    pub fn save(&self, lottery_info: &AccountInfo) -> Result<(), ProgramError> {
        self.serialize(&mut &mut lottery_info.data.borrow_mut()[..])?;
        Ok(())
    }

    /// Seconds elapsed since the last transition into Open.
    pub fn seconds_since_reset(&self, now: UnixTimestamp) -> i64 {
        now.saturating_sub(self.last_reset_timestamp)
    }

    /// Whether a new draw may begin: the round is open, the interval has
    /// elapsed, and at least one paid entry is pooled. Read-only; safe to
    /// probe any number of times.
    pub fn is_upkeep_needed(&self, now: UnixTimestamp) -> bool {
        self.round_state == RoundState::Open
            && self.seconds_since_reset(now) >= self.interval
            && !self.entries.is_empty()
            && self.pool > 0
    }

    /// Records a paid entry for the current round.
    pub fn record_entry(&mut self, participant: Pubkey, value: u64) -> Result<(), LotteryError> {
        if self.round_state != RoundState::Open {
            return Err(LotteryError::RoundNotOpen);
        }
        if value < self.entry_fee {
            return Err(LotteryError::InsufficientValue);
        }
        if self.entries.len() >= self.max_entries as usize {
            return Err(LotteryError::LotteryFull);
        }
        self.pool = self
            .pool
            .checked_add(value)
            .ok_or(LotteryError::ArithmeticOverflow)?;
        self.entries.push(participant);
        Ok(())
    }

    /// Opens a randomness request and moves the round to Calculating.
    ///
    /// Eligibility is re-checked here rather than trusted from an earlier
    /// read-only probe; it may have changed between the probe and the
    /// trigger landing.
    pub fn begin_request(&mut self, now: UnixTimestamp) -> Result<u64, LotteryError> {
        if !self.is_upkeep_needed(now) {
            return Err(LotteryError::UpkeepNotNeeded);
        }
        let request_id = self
            .request_counter
            .checked_add(1)
            .ok_or(LotteryError::ArithmeticOverflow)?;
        self.request_counter = request_id;
        self.pending_request_id = Some(request_id);
        self.round_state = RoundState::Calculating;
        Ok(request_id)
    }

    /// Matches an oracle callback against the outstanding request and
    /// selects the winner.
    ///
    /// Consumes the pending identifier. The round stays Calculating until
    /// the payout clears and `settle` runs, so a failed transfer leaves the
    /// selected winner recorded and payout can be re-driven without a new
    /// randomness request.
    pub fn fulfill(&mut self, request_id: u64, random_words: &[u64]) -> Result<Pubkey, LotteryError> {
        if self.pending_request_id != Some(request_id) {
            return Err(LotteryError::UnknownRequest);
        }
        let word = *random_words.first().ok_or(LotteryError::MissingRandomValue)?;
        let index = oracle::winner_index(word, self.entries.len() as u64);
        let winner = self.entries[index as usize];
        self.pending_request_id = None;
        self.recent_winner = Some(winner);
        Ok(winner)
    }

    /// Clears the entry list and pool and reopens the round.
    ///
    /// Returns the pool amount owed to the winner.
    pub fn settle(&mut self, now: UnixTimestamp) -> u64 {
        let prize = self.pool;
        self.pool = 0;
        self.entries.clear();
        self.last_reset_timestamp = now;
        self.round_state = RoundState::Open;
        prize
    }

    /// Entry at the given position, in insertion order.
    pub fn entry(&self, position: u64) -> Option<&Pubkey> {
        self.entries.get(position as usize)
    }

    /// Number of entries in the current round.
    pub fn entry_count(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Identifier of the most recently issued randomness request.
    pub fn last_request_id(&self) -> Option<u64> {
        if self.request_counter > 0 {
            Some(self.request_counter)
        } else {
            None
        }
    }
}
