//! Step bookkeeping for operations that span backends without a shared
//! transaction.
//!
//! An operation runs as an ordered list of named steps through a
//! [`Saga`]. Steps with a side effect are recorded together with the
//! [`Compensation`] that would undo them. Nothing is undone automatically:
//! when a later step fails, the returned [`SagaError`] reports which steps
//! were applied so the caller (or an operator) can reconcile.
//!
//! A successful run means the operation was fully applied. A failure is
//! either [`SagaOutcome::Rejected`] (no side effect happened) or
//! [`SagaOutcome::PartiallyApplied`].

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{ErrorKind, TenantryError, TenantryResult};

/// How a completed side effect would be reversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// The effect needs no reversal on its own.
    NotRequired,
    /// Reversal an operator has to perform by hand.
    Manual(String),
}

/// A side-effecting step that completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedStep {
    /// 1-based position in the operation.
    pub step: usize,
    pub name: &'static str,
    pub compensation: Compensation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SagaOutcome<'a> {
    /// Failed before any side effect was applied.
    Rejected,
    /// Failed at `failed_step` after `applied` took effect.
    PartiallyApplied {
        failed_step: usize,
        applied: &'a [AppliedStep],
    },
}

#[derive(Debug, Error)]
#[error("{operation} failed at step {step} ({step_name}): {source}")]
pub struct SagaError {
    pub operation: &'static str,
    pub step: usize,
    pub step_name: &'static str,
    pub applied: Vec<AppliedStep>,
    #[source]
    pub source: TenantryError,
}

impl SagaError {
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn outcome(&self) -> SagaOutcome<'_> {
        if self.applied.is_empty() {
            SagaOutcome::Rejected
        } else {
            SagaOutcome::PartiallyApplied {
                failed_step: self.step,
                applied: &self.applied,
            }
        }
    }

    /// Manual reversals still owed for the applied steps, latest first.
    pub fn pending_compensations(&self) -> Vec<&str> {
        self.applied
            .iter()
            .rev()
            .filter_map(|s| match &s.compensation {
                Compensation::Manual(action) => Some(action.as_str()),
                Compensation::NotRequired => None,
            })
            .collect()
    }
}

impl From<SagaError> for TenantryError {
    fn from(err: SagaError) -> Self {
        let context = format!(
            "{} failed at step {} ({})",
            err.operation, err.step, err.step_name
        );
        err.source.context(context)
    }
}

/// Tracks the steps of one running operation.
#[derive(Debug)]
pub struct Saga {
    operation: &'static str,
    subject: String,
    step: usize,
    applied: Vec<AppliedStep>,
}

impl Saga {
    pub fn new(operation: &'static str, subject: impl Into<String>) -> Self {
        Self {
            operation,
            subject: subject.into(),
            step: 0,
            applied: Vec::new(),
        }
    }

    /// Run a step without side effects.
    pub async fn read<T, F>(&mut self, name: &'static str, fut: F) -> Result<T, SagaError>
    where
        F: Future<Output = TenantryResult<T>>,
    {
        self.step += 1;
        match fut.await {
            Ok(value) => {
                debug!(
                    operation = self.operation,
                    subject = %self.subject,
                    step = self.step,
                    name,
                    "Saga read step completed"
                );
                Ok(value)
            }
            Err(e) => Err(self.fail(name, e)),
        }
    }

    /// Run a step with a side effect and record how it would be undone.
    pub async fn apply<T, F, C>(
        &mut self,
        name: &'static str,
        fut: F,
        compensation: C,
    ) -> Result<T, SagaError>
    where
        F: Future<Output = TenantryResult<T>>,
        C: FnOnce(&T) -> Compensation,
    {
        self.step += 1;
        match fut.await {
            Ok(value) => {
                info!(
                    operation = self.operation,
                    subject = %self.subject,
                    step = self.step,
                    name,
                    "Saga step applied"
                );
                self.applied.push(AppliedStep {
                    step: self.step,
                    name,
                    compensation: compensation(&value),
                });
                Ok(value)
            }
            Err(e) => Err(self.fail(name, e)),
        }
    }

    /// Record a synchronous step without side effects, such as input
    /// validation or a pure computation.
    pub fn check<T>(
        &mut self,
        name: &'static str,
        result: TenantryResult<T>,
    ) -> Result<T, SagaError> {
        self.step += 1;
        result.map_err(|e| self.fail(name, e))
    }

    /// Close a fully applied run.
    pub fn finish(self) {
        info!(
            operation = self.operation,
            subject = %self.subject,
            steps = self.step,
            "Saga fully applied"
        );
    }

    fn fail(&self, name: &'static str, source: TenantryError) -> SagaError {
        let err = SagaError {
            operation: self.operation,
            step: self.step,
            step_name: name,
            applied: self.applied.clone(),
            source,
        };
        if err.applied.is_empty() {
            debug!(
                operation = self.operation,
                subject = %self.subject,
                step = self.step,
                name,
                error = %err.source,
                "Saga rejected before any side effect"
            );
        } else {
            warn!(
                operation = self.operation,
                subject = %self.subject,
                step = self.step,
                name,
                error = %err.source,
                pending = ?err.pending_compensations(),
                "Saga partially applied"
            );
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ok<T>(value: T) -> TenantryResult<T> {
        Ok(value)
    }

    async fn boom<T>() -> TenantryResult<T> {
        Err(TenantryError::Workflow("unavailable".into()))
    }

    #[tokio::test]
    async fn failure_before_side_effect_is_rejected() {
        let mut saga = Saga::new("create organization", "acme");
        saga.read("load", ok(())).await.unwrap();
        let err = saga
            .apply("create realm", boom::<String>(), |_| {
                Compensation::NotRequired
            })
            .await
            .unwrap_err();

        assert_eq!(err.step, 2);
        assert_eq!(err.outcome(), SagaOutcome::Rejected);
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn failure_after_side_effect_is_partial() {
        let mut saga = Saga::new("create organization", "acme");
        let id = saga
            .apply("create realm", ok("acme-7f3".to_string()), |id| {
                Compensation::Manual(format!("delete realm {id}"))
            })
            .await
            .unwrap();
        saga.apply("persist organization", ok(()), |_| {
            Compensation::Manual(format!("delete organization row {id}"))
        })
        .await
        .unwrap();
        let err = saga
            .apply("submit workflow", boom::<String>(), |_| Compensation::NotRequired)
            .await
            .unwrap_err();

        match err.outcome() {
            SagaOutcome::PartiallyApplied {
                failed_step,
                applied,
            } => {
                assert_eq!(failed_step, 3);
                assert_eq!(applied.len(), 2);
                assert_eq!(applied[0].name, "create realm");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(
            err.pending_compensations(),
            vec!["delete organization row acme-7f3", "delete realm acme-7f3"]
        );
    }

    #[tokio::test]
    async fn conversion_keeps_kind_and_names_step() {
        let mut saga = Saga::new("get user", "jdoe");
        let err = saga
            .check::<()>("validate", Err(TenantryError::not_found("user", "jdoe")))
            .unwrap_err();
        let flat: TenantryError = err.into();
        assert_eq!(flat.kind(), ErrorKind::NotFound);
        assert!(flat.to_string().starts_with("get user failed at step 1 (validate)"));
    }
}
