use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{clock::Clock, rent::Rent, Sysvar},
};

use crate::{
    error::LotteryError,
    instruction::LotteryInstruction,
    oracle,
    state::{Lottery, OracleConfig, RoundState},
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = LotteryInstruction::unpack(instruction_data)?;

        match instruction {
            LotteryInstruction::Initialize {
                entry_fee,
                interval,
                max_entries,
                oracle,
            } => {
                msg!("Instruction: Initialize");
                Self::process_initialize(accounts, entry_fee, interval, max_entries, oracle, program_id)
            }
            LotteryInstruction::Enter { amount } => {
                msg!("Instruction: Enter");
                Self::process_enter(accounts, amount, program_id)
            }
            LotteryInstruction::CheckUpkeep => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(accounts, program_id)
            }
            LotteryInstruction::PerformUpkeep => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(accounts, program_id)
            }
            LotteryInstruction::FulfillRandomness {
                request_id,
                random_words,
            } => {
                msg!("Instruction: Fulfill Randomness");
                Self::process_fulfill_randomness(accounts, request_id, &random_words, program_id)
            }
        }
    }

    /// Creates and initializes the lottery account. Called once; the round
    /// it opens is then recycled forever.
    fn process_initialize(
        accounts: &[AccountInfo],
        entry_fee: u64,
        interval: i64,
        max_entries: u32,
        oracle: OracleConfig,
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !payer_info.is_signer {
            msg!("Payer must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if entry_fee == 0 || interval <= 0 || max_entries == 0 {
            msg!("Entry fee, interval and entry capacity must be positive");
            return Err(ProgramError::InvalidArgument);
        }

        let (expected_lottery_pubkey, bump_seed) = Lottery::find_address(program_id);
        if *lottery_info.key != expected_lottery_pubkey {
            msg!("Invalid lottery account address");
            return Err(ProgramError::InvalidArgument);
        }

        if lottery_info.owner != program_id {
            msg!("Creating lottery account");
            let rent = Rent::get()?;
            let space = Lottery::space(max_entries);
            let rent_lamports = rent.minimum_balance(space);

            invoke_signed(
                &system_instruction::create_account(
                    payer_info.key,
                    lottery_info.key,
                    rent_lamports,
                    space as u64,
                    program_id,
                ),
                &[
                    payer_info.clone(),
                    lottery_info.clone(),
                    system_program_info.clone(),
                ],
                &[&[Lottery::SEED, &[bump_seed]]],
            )?;
        }

        if Lottery::load(lottery_info).is_ok() {
            msg!("Lottery account is already initialized");
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        let clock = Clock::get()?;
        let lottery = Lottery {
            is_initialized: true,
            round_state: RoundState::Open,
            entry_fee,
            interval,
            oracle,
            max_entries,
            last_reset_timestamp: clock.unix_timestamp,
            pool: 0,
            entries: Vec::new(),
            pending_request_id: None,
            request_counter: 0,
            recent_winner: None,
            bump: bump_seed,
        };
        lottery.save(lottery_info)?;

        msg!(
            "Lottery initialized: entry_fee={} interval={}s capacity={}",
            entry_fee,
            interval,
            max_entries
        );
        Ok(())
    }

    /// Records a paid entry and moves the entry value into the pool.
    fn process_enter(accounts: &[AccountInfo], amount: u64, program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let participant_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !participant_info.is_signer {
            msg!("Participant must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut lottery = Lottery::load(lottery_info)?;
        lottery.record_entry(*participant_info.key, amount)?;

        invoke(
            &system_instruction::transfer(participant_info.key, lottery_info.key, amount),
            &[
                participant_info.clone(),
                lottery_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        lottery.save(lottery_info)?;

        msg!(
            "Entry recorded: participant={} entries={}",
            participant_info.key,
            lottery.entry_count()
        );
        Ok(())
    }

    /// Read-only eligibility probe. The result is logged and written to
    /// return data for off-chain automation agents.
    fn process_check_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let lottery_info = next_account_info(account_info_iter)?;

        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let lottery = Lottery::load(lottery_info)?;
        let clock = Clock::get()?;
        let upkeep_needed = lottery.is_upkeep_needed(clock.unix_timestamp);

        set_return_data(&[upkeep_needed as u8]);
        msg!("Upkeep needed: {}", upkeep_needed);
        Ok(())
    }

    /// Starts a draw. Eligibility is validated here no matter what a prior
    /// probe reported, then the round moves to Calculating and the oracle
    /// request goes out. The state is committed before the outbound call.
    fn process_perform_upkeep(accounts: &[AccountInfo], program_id: &Pubkey) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let trigger_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let oracle_program_info = next_account_info(account_info_iter)?;

        if !trigger_info.is_signer {
            msg!("Trigger must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut lottery = Lottery::load(lottery_info)?;

        if *oracle_program_info.key != lottery.oracle.program {
            msg!("Oracle program does not match the configured oracle");
            return Err(LotteryError::OracleMismatch.into());
        }

        let clock = Clock::get()?;
        let request_id = lottery.begin_request(clock.unix_timestamp)?;
        lottery.save(lottery_info)?;

        oracle::request_randomness(oracle_program_info, lottery_info, &lottery.oracle, request_id)?;

        msg!("Randomness requested: request_id={}", request_id);
        Ok(())
    }

    /// Delivers the oracle callback: matches the request identifier, selects
    /// the winner, settles the round, and pays the pool out. All round state
    /// is computed and written before any balance moves.
    fn process_fulfill_randomness(
        accounts: &[AccountInfo],
        request_id: u64,
        random_words: &[u64],
        program_id: &Pubkey,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let oracle_authority_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        if lottery_info.owner != program_id {
            msg!("Lottery account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut lottery = Lottery::load(lottery_info)?;

        if !oracle_authority_info.is_signer {
            msg!("Oracle authority must sign the callback");
            return Err(ProgramError::MissingRequiredSignature);
        }
        if *oracle_authority_info.key != lottery.oracle.authority {
            msg!("Callback not signed by the configured oracle authority");
            return Err(LotteryError::OracleMismatch.into());
        }

        let winner = lottery.fulfill(request_id, random_words)?;

        if *winner_info.key != winner {
            msg!(
                "Winner account {} does not match selected winner {}",
                winner_info.key,
                winner
            );
            return Err(LotteryError::TransferFailed.into());
        }

        let clock = Clock::get()?;
        let prize = lottery.settle(clock.unix_timestamp);
        lottery.save(lottery_info)?;

        let lottery_balance = lottery_info.lamports();
        **lottery_info.lamports.borrow_mut() = lottery_balance
            .checked_sub(prize)
            .ok_or(LotteryError::TransferFailed)?;
        **winner_info.lamports.borrow_mut() = winner_info
            .lamports()
            .checked_add(prize)
            .ok_or(LotteryError::TransferFailed)?;

        msg!("Winner picked: winner={} prize={}", winner, prize);
        Ok(())
    }
}
