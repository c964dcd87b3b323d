//! An automated recurring lottery on Solana.
//!
//! Participants pay a fixed entry fee while a round is open. Once the
//! configured interval has elapsed and at least one entry is pooled, an
//! external automation agent triggers a draw: the program issues a
//! randomness request to an oracle program and waits for its callback. The
//! callback selects a winner, transfers the pooled lamports to them, and
//! reopens the round for the next cycle.

pub mod error;
pub mod instruction;
pub mod oracle;
pub mod processor;
pub mod state;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

/// Processes a lottery instruction.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
