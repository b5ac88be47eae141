use anchor_lang::error_code;

#[error_code]
pub enum LotteryError {
    Overflow,
    MetadataUriTooLong,
    EntryFeeTooLow,
    InvalidEntryCount,
    InsufficientFunds,
    LotteryNotOpen,
    InvalidTreasury,
    OwnerMismatch,
    NoEntriesOwned,
    #[msg("Only the program management authority can manage lotteries")]
    NotProgramManagementAuthority,
    #[msg("Only the payout authority may be used to withdraw from the treasury")]
    NotPayoutAuthority,
    #[msg("Entry fee exceeds maximum allowed")]
    EntryFeeTooHigh,
    #[msg("Lottery duration exceeds maximum allowed")]
    DurationTooLong,
    #[msg("Invalid metadata URI format")]
    InvalidMetadataUri,
    #[msg("End time must be at least 1 hour after the start time")]
    EndTimeTooClose,
    #[msg("Start time must not be in the past")]
    StartTimeInPast,
    #[msg("Entry balance account is not initialized for this user")]
    EntryBalanceNotInitialized,
    #[msg("Treasury transfer failed")]
    TransferFailed,
    #[msg("Entry window has not started yet")]
    EntryWindowNotStarted,
    #[msg("Lottery has ended")]
    LotteryEnded,
    #[msg("Lottery has not ended yet")]
    LotteryNotEnded,
    #[msg("Lottery is not in Closed state")]
    LotteryNotClosed,
    #[msg("Lottery is not in Drawing state")]
    LotteryNotDrawing,
    #[msg("Lottery is not in Completed state")]
    LotteryNotCompleted,
    #[msg("Lottery is not in Cancelled state")]
    LotteryNotCancelled,
    #[msg("Prizes can no longer be added once a draw has started")]
    LotteryAlreadyStarted,
    #[msg("Lottery can no longer be cancelled once a draw has started")]
    CancelTooLate,
    #[msg("Lottery has no recorded entries")]
    NoEntries,
    #[msg("Lottery has no prizes in its pool")]
    NoPrizes,
    #[msg("No prizes were provided")]
    NoPrizesProvided,
    #[msg("Prize pool size exceeds maximum allowed")]
    TooManyPrizes,
    #[msg("Prize amount must be greater than 0")]
    InvalidPrizeAmount,
    #[msg("A prize with this id already exists in the pool")]
    DuplicatePrizeId,
    #[msg("An entry with this payment reference was already recorded")]
    DuplicatePaymentRef,
    #[msg("Maximum number of entries has been reached")]
    MaxEntriesReached,
    #[msg("Randomness account data could not be parsed")]
    InvalidRandomnessAccount,
    #[msg("Randomness account was already revealed; commit a fresh one")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness value has not been resolved by the oracle yet")]
    RandomnessNotResolved,
    #[msg("Randomness account does not match the committed request")]
    IncorrectRandomnessAccount,
    #[msg("Current randomness request is still pending; retry not allowed yet")]
    DrawNotRetryable,
    #[msg("The draw for this lottery has already been completed")]
    DrawAlreadyCompleted,
    #[msg("Prize has not been awarded to any participant")]
    PrizeNotAwarded,
    #[msg("Prize has already been distributed")]
    PrizeAlreadyClaimed,
    #[msg("Prize is marked as failed and requires manual reconciliation")]
    PrizeMarkedFailed,
    #[msg("Winner account does not match the drawn participant")]
    WinnerMismatch,
    #[msg("Prize rank is out of range for this lottery")]
    InvalidPrizeRank,
    #[msg("Entry ledger does not cover the winning slot")]
    LedgerSlotMismatch,
    #[msg("Not all prizes have been distributed or marked as failed")]
    PrizesUnresolved,
}
