//! # Signature Requirements
//!
//! Resolves which keys must sign a transaction and verifies its signature
//! maps against them.
//!
//! | Function | Other required keys |
//! |----------|---------------------|
//! | `CryptoTransfer` | keys of every debited account |
//! | `ScheduleCreate` | admin key, if any |
//! | `ScheduleSign` | none (schedule must exist) |
//! | `ScheduleDelete` | schedule's admin key, if any |
//! | `Freeze` | none |
//!
//! Schedule create and sign additionally carry a scheduled signing scope:
//! signatures over the inner transaction, verified against the inner payer's
//! key plus the inner transaction's own required keys.

use crate::domain::ledger::AccountLedger;
use lc_01_schedule_store::ScheduleStoreApi;
use lc_02_signature_witness::{
    are_all_active, is_key_active, CompletionMode, ScopedSignature, SignatureRationalizationApi,
    SignatureStatus, VerifiedSigs,
};
use shared_types::{
    AccountId, Ed25519Key, Key, ResponseCode, SignatureMap, TransactionBody, TransactionData,
    TxnAccessor,
};

/// Verified signatures over a scheduled transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledScope {
    /// Signing attempts in scope (pairs in the scheduled signature map).
    pub num_attempts: usize,
    pub sigs: Vec<ScopedSignature>,
    /// Keys that must all be active for the scheduled transaction to run.
    pub required: Vec<Key>,
}

impl ScheduledScope {
    /// Whether `required` is satisfied by `is_witnessed`.
    pub fn is_satisfied_by<F>(&self, is_witnessed: &F) -> bool
    where
        F: Fn(&Ed25519Key) -> bool,
    {
        are_all_active(&self.required, is_witnessed)
    }
}

#[derive(Debug, Clone)]
pub struct Rationalization {
    /// First error encountered; mode is `Async` if any verification was.
    pub status: SignatureStatus,
    pub payer_key: Option<Key>,
    pub other_keys: Vec<Key>,
    pub outer: VerifiedSigs,
    pub scheduled: Option<ScheduledScope>,
}

impl Rationalization {
    pub fn payer_sig_active(&self) -> bool {
        self.payer_key
            .as_ref()
            .is_some_and(|key| is_key_active(key, &|k| self.outer.has_valid_sig(k)))
    }

    pub fn other_parties_active(&self) -> bool {
        are_all_active(&self.other_keys, &|k| self.outer.has_valid_sig(k))
    }
}

/// Status codes from rationalization that end handling after charging.
pub fn is_terminal_rationalization_error(code: ResponseCode) -> bool {
    matches!(
        code,
        ResponseCode::InvalidFileId
            | ResponseCode::InvalidTokenId
            | ResponseCode::InvalidAccountId
            | ResponseCode::InvalidScheduleId
            | ResponseCode::InvalidSignature
            | ResponseCode::KeyPrefixMismatch
            | ResponseCode::InvalidSignatureCountMismatchingKey
            | ResponseCode::ModifyingImmutableContract
            | ResponseCode::InvalidContractId
            | ResponseCode::UnresolvableRequiredSigners
            | ResponseCode::UnparseableScheduledTransaction
            | ResponseCode::UnschedulableTransaction
    )
}

/// Resolves required keys and verifies every signature map `accessor`
/// carries.
pub fn rationalize(
    accessor: &TxnAccessor,
    ledger: &AccountLedger,
    schedules: &dyn ScheduleStoreApi,
    verifier: &dyn SignatureRationalizationApi,
) -> Rationalization {
    let payer_key = ledger.key_of(&accessor.payer()).cloned();
    let mut failure: Option<ResponseCode> = None;

    let other_keys = match other_required_keys(accessor.body(), ledger, schedules) {
        Ok(keys) => keys,
        Err(code) => {
            failure = Some(code);
            Vec::new()
        }
    };

    let outer_required = leaves_of(payer_key.iter().chain(other_keys.iter()));
    let outer = verifier.verify_sig_map(accessor.body_bytes(), accessor.sig_map(), &outer_required);
    let mut mode = outer.status.mode;
    if outer.status.is_error() {
        failure.get_or_insert(outer.status.code);
    }

    let scheduled = match scheduled_scope(accessor, ledger, schedules, verifier) {
        Ok(Some((scope, status))) => {
            if status.mode == CompletionMode::Async {
                mode = CompletionMode::Async;
            }
            if status.is_error() {
                failure.get_or_insert(status.code);
            }
            Some(scope)
        }
        Ok(None) => None,
        Err(code) => {
            failure.get_or_insert(code);
            None
        }
    };

    let status = match failure {
        Some(code) => SignatureStatus::failure(code, mode),
        None => SignatureStatus::ok(mode),
    };
    Rationalization {
        status,
        payer_key,
        other_keys,
        outer,
        scheduled,
    }
}

fn leaves_of<'k>(keys: impl Iterator<Item = &'k Key>) -> Vec<Ed25519Key> {
    keys.flat_map(Key::ed25519_leaves).collect()
}

fn account_key(ledger: &AccountLedger, id: &AccountId, missing: ResponseCode) -> Result<Key, ResponseCode> {
    ledger.key_of(id).cloned().ok_or(missing)
}

fn other_required_keys(
    body: &TransactionBody,
    ledger: &AccountLedger,
    schedules: &dyn ScheduleStoreApi,
) -> Result<Vec<Key>, ResponseCode> {
    required_keys_with(body, ledger, schedules, ResponseCode::InvalidAccountId)
}

/// `missing_account` is reported for debited accounts that do not exist.
fn required_keys_with(
    body: &TransactionBody,
    ledger: &AccountLedger,
    schedules: &dyn ScheduleStoreApi,
    missing_account: ResponseCode,
) -> Result<Vec<Key>, ResponseCode> {
    match &body.data {
        TransactionData::CryptoTransfer { transfers } => transfers
            .iter()
            .filter(|aa| aa.amount < 0)
            .map(|aa| account_key(ledger, &aa.account, missing_account))
            .collect(),
        TransactionData::ScheduleCreate { admin_key, .. } => Ok(admin_key.iter().cloned().collect()),
        TransactionData::ScheduleSign { schedule_id, .. } => {
            if schedules.exists(schedule_id) {
                Ok(Vec::new())
            } else {
                Err(ResponseCode::InvalidScheduleId)
            }
        }
        TransactionData::ScheduleDelete { schedule_id } => {
            let schedule = schedules
                .get(schedule_id)
                .map_err(|_| ResponseCode::InvalidScheduleId)?;
            Ok(schedule.admin_key().cloned().into_iter().collect())
        }
        TransactionData::Freeze { .. } => Ok(Vec::new()),
    }
}

/// Inner bytes, inner payer and scheduled signatures of a schedule
/// operation.
fn scheduled_parts<'a>(
    accessor: &'a TxnAccessor,
    schedules: &'a dyn ScheduleStoreApi,
) -> Result<Option<(&'a [u8], AccountId, &'a SignatureMap)>, ResponseCode> {
    match &accessor.body().data {
        TransactionData::ScheduleCreate {
            scheduled_body_bytes,
            payer,
            sig_map,
            ..
        } => Ok(Some((
            scheduled_body_bytes.as_slice(),
            payer.unwrap_or_else(|| accessor.payer()),
            sig_map,
        ))),
        TransactionData::ScheduleSign {
            schedule_id,
            sig_map,
        } => {
            let schedule = schedules
                .get(schedule_id)
                .map_err(|_| ResponseCode::InvalidScheduleId)?;
            Ok(Some((schedule.transaction_body(), schedule.payer(), sig_map)))
        }
        _ => Ok(None),
    }
}

fn scheduled_scope(
    accessor: &TxnAccessor,
    ledger: &AccountLedger,
    schedules: &dyn ScheduleStoreApi,
    verifier: &dyn SignatureRationalizationApi,
) -> Result<Option<(ScheduledScope, SignatureStatus)>, ResponseCode> {
    let Some((inner_bytes, inner_payer, sig_map)) = scheduled_parts(accessor, schedules)? else {
        return Ok(None);
    };

    let inner = TransactionBody::from_bytes(inner_bytes)
        .map_err(|_| ResponseCode::UnparseableScheduledTransaction)?;
    if !inner.function().is_schedulable() {
        return Err(ResponseCode::UnschedulableTransaction);
    }

    let mut required = vec![account_key(
        ledger,
        &inner_payer,
        ResponseCode::UnresolvableRequiredSigners,
    )?];
    required.extend(required_keys_with(
        &inner,
        ledger,
        schedules,
        ResponseCode::UnresolvableRequiredSigners,
    )?);

    let verified = verifier.verify_sig_map(inner_bytes, sig_map, &leaves_of(required.iter()));
    let scope = ScheduledScope {
        num_attempts: sig_map.len(),
        sigs: verified.sigs,
        required,
    };
    Ok(Some((scope, verified.status)))
}
