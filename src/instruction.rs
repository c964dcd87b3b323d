use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::state::{Lottery, OracleConfig};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum LotteryInstruction {
    /// Initialize the lottery account.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer funding the lottery account
    /// 1. `[writable]` The lottery account (PDA, seed "lottery")
    /// 2. `[]` The system program
    Initialize {
        /// Minimum lamports per entry
        entry_fee: u64,
        /// Minimum seconds between draws
        interval: i64,
        /// Entry capacity to size the account for
        max_entries: u32,
        /// Randomness oracle connection parameters
        oracle: OracleConfig,
    },

    /// Enter the current round.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The participant paying the entry
    /// 1. `[writable]` The lottery account
    /// 2. `[]` The system program
    Enter {
        /// Lamports paid for this entry, at least the entry fee
        amount: u64,
    },

    /// Read-only eligibility probe for the automation agent. Writes a
    /// single boolean byte into return data.
    ///
    /// Accounts expected:
    /// 0. `[]` The lottery account
    CheckUpkeep,

    /// Start a draw: re-validates eligibility and issues a randomness
    /// request to the oracle program.
    ///
    /// Accounts expected:
    /// 0. `[signer]` Any account triggering the draw
    /// 1. `[writable]` The lottery account
    /// 2. `[]` The oracle program
    PerformUpkeep,

    /// Oracle callback: selects the winner and pays the pool out.
    ///
    /// Accounts expected:
    /// 0. `[signer]` The oracle authority
    /// 1. `[writable]` The lottery account
    /// 2. `[writable]` The winning participant
    FulfillRandomness {
        /// Identifier of the request being fulfilled
        request_id: u64,
        /// Random values produced by the oracle
        random_words: Vec<u64>,
    },
}

impl LotteryInstruction {
    /// Unpacks a byte buffer into a LotteryInstruction.
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| ProgramError::InvalidInstructionData)
    }
}

/// Create initialize instruction
pub fn initialize(
    program_id: &Pubkey,
    payer: &Pubkey,
    entry_fee: u64,
    interval: i64,
    max_entries: u32,
    oracle: OracleConfig,
) -> Result<Instruction, ProgramError> {
    let (lottery, _) = Lottery::find_address(program_id);
    let data = LotteryInstruction::Initialize {
        entry_fee,
        interval,
        max_entries,
        oracle,
    }
    .try_to_vec()?;

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(lottery, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create enter instruction
pub fn enter(
    program_id: &Pubkey,
    participant: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (lottery, _) = Lottery::find_address(program_id);
    let data = LotteryInstruction::Enter { amount }.try_to_vec()?;

    let accounts = vec![
        AccountMeta::new(*participant, true),
        AccountMeta::new(lottery, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create check_upkeep instruction
pub fn check_upkeep(program_id: &Pubkey) -> Result<Instruction, ProgramError> {
    let (lottery, _) = Lottery::find_address(program_id);
    let data = LotteryInstruction::CheckUpkeep.try_to_vec()?;

    let accounts = vec![AccountMeta::new_readonly(lottery, false)];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    trigger: &Pubkey,
    oracle_program: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let (lottery, _) = Lottery::find_address(program_id);
    let data = LotteryInstruction::PerformUpkeep.try_to_vec()?;

    let accounts = vec![
        AccountMeta::new_readonly(*trigger, true),
        AccountMeta::new(lottery, false),
        AccountMeta::new_readonly(*oracle_program, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create fulfill_randomness instruction
pub fn fulfill_randomness(
    program_id: &Pubkey,
    oracle_authority: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_words: Vec<u64>,
) -> Result<Instruction, ProgramError> {
    let (lottery, _) = Lottery::find_address(program_id);
    let data = LotteryInstruction::FulfillRandomness {
        request_id,
        random_words,
    }
    .try_to_vec()?;

    let accounts = vec![
        AccountMeta::new_readonly(*oracle_authority, true),
        AccountMeta::new(lottery, false),
        AccountMeta::new(*winner, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
