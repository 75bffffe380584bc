//! # Response Codes
//!
//! The enumerated outcome of handling a transaction. Every business-outcome
//! failure is reported as one of these codes on the transaction's receipt;
//! none of them is ever raised as an error across a component boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! response_codes {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// Outcome status of a handled transaction.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ResponseCode {
            $($(#[$doc])* $variant,)*
        }

        impl ResponseCode {
            /// Every defined code, in declaration order.
            pub const ALL: &'static [ResponseCode] = &[$(ResponseCode::$variant,)*];

            /// Canonical upper-snake-case name.
            pub const fn name(&self) -> &'static str {
                match self {
                    $(ResponseCode::$variant => $name,)*
                }
            }
        }
    };
}

response_codes! {
    Ok => "OK",
    /// Node-side defect (e.g. no transition logic registered).
    FailInvalid => "FAIL_INVALID",
    InvalidNodeAccount => "INVALID_NODE_ACCOUNT",
    InvalidPayerSignature => "INVALID_PAYER_SIGNATURE",
    DuplicateTransaction => "DUPLICATE_TRANSACTION",
    InvalidTransactionDuration => "INVALID_TRANSACTION_DURATION",
    InvalidTransactionStart => "INVALID_TRANSACTION_START",
    TransactionExpired => "TRANSACTION_EXPIRED",
    InsufficientPayerBalance => "INSUFFICIENT_PAYER_BALANCE",
    /// The fee exceeds the maximum the payer offered in the body.
    InsufficientTxFee => "INSUFFICIENT_TX_FEE",
    InsufficientAccountBalance => "INSUFFICIENT_ACCOUNT_BALANCE",
    InvalidFileId => "INVALID_FILE_ID",
    InvalidTokenId => "INVALID_TOKEN_ID",
    InvalidAccountId => "INVALID_ACCOUNT_ID",
    InvalidScheduleId => "INVALID_SCHEDULE_ID",
    InvalidSignature => "INVALID_SIGNATURE",
    KeyPrefixMismatch => "KEY_PREFIX_MISMATCH",
    InvalidSignatureCountMismatchingKey => "INVALID_SIGNATURE_COUNT_MISMATCHING_KEY",
    ModifyingImmutableContract => "MODIFYING_IMMUTABLE_CONTRACT",
    InvalidContractId => "INVALID_CONTRACT_ID",
    UnresolvableRequiredSigners => "UNRESOLVABLE_REQUIRED_SIGNERS",
    UnparseableScheduledTransaction => "UNPARSEABLE_SCHEDULED_TRANSACTION",
    UnschedulableTransaction => "UNSCHEDULABLE_TRANSACTION",
    SomeSignaturesWereInvalid => "SOME_SIGNATURES_WERE_INVALID",
    NoNewValidSignatures => "NO_NEW_VALID_SIGNATURES",
    ScheduleIsImmutable => "SCHEDULE_IS_IMMUTABLE",
    InvalidScheduleAccountId => "INVALID_SCHEDULE_ACCOUNT_ID",
    InvalidSchedulePayerId => "INVALID_SCHEDULE_PAYER_ID",
    InvalidAdminKey => "INVALID_ADMIN_KEY",
    MemoTooLong => "MEMO_TOO_LONG",
    InvalidAccountAmounts => "INVALID_ACCOUNT_AMOUNTS",
    AccountRepeatedInAccountAmounts => "ACCOUNT_REPEATED_IN_ACCOUNT_AMOUNTS",
    EmptyTransferList => "EMPTY_TRANSFER_LIST",
    InvalidFreezeTransactionBody => "INVALID_FREEZE_TRANSACTION_BODY",
    NotSupported => "NOT_SUPPORTED",
}

impl ResponseCode {
    pub fn is_ok(&self) -> bool {
        matches!(self, ResponseCode::Ok)
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
