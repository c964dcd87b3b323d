//! Randomness oracle interface.
//!
//! The oracle is an external program. A draw submits a request to it by CPI,
//! carrying the subscription parameters and a fresh request identifier, and
//! returns immediately; the oracle later sends a `FulfillRandomness`
//! instruction echoing the same identifier.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    instruction::{AccountMeta, Instruction},
    program::invoke,
    pubkey::Pubkey,
};

use crate::state::OracleConfig;

/// Number of random values requested per draw.
pub const NUM_RANDOM_WORDS: u32 = 1;

/// Request payload handed to the oracle program.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub struct RandomnessRequest {
    /// Identifier the fulfillment callback must echo
    pub request_id: u64,
    /// Subscription funding the request
    pub subscription: u64,
    /// Oracle queue the request is routed to
    pub queue: Pubkey,
    /// Confirmations to wait before calling back
    pub min_confirmations: u8,
    /// Compute budget for the callback
    pub callback_units: u32,
    /// Number of random values to return
    pub num_words: u32,
}

/// Submits a randomness request to the oracle program.
pub fn request_randomness<'a>(
    oracle_program_info: &AccountInfo<'a>,
    lottery_info: &AccountInfo<'a>,
    config: &OracleConfig,
    request_id: u64,
) -> ProgramResult {
    let request = RandomnessRequest {
        request_id,
        subscription: config.subscription,
        queue: config.queue,
        min_confirmations: config.min_confirmations,
        callback_units: config.callback_units,
        num_words: NUM_RANDOM_WORDS,
    };

    let instruction = Instruction {
        program_id: *oracle_program_info.key,
        accounts: vec![AccountMeta::new_readonly(*lottery_info.key, false)],
        data: request.try_to_vec()?,
    };

    invoke(
        &instruction,
        &[lottery_info.clone(), oracle_program_info.clone()],
    )
}

/// Maps a random value to an entry index by plain modulo reduction.
pub fn winner_index(random_word: u64, entry_count: u64) -> u64 {
    if entry_count == 0 {
        return 0;
    }
    random_word % entry_count
}
