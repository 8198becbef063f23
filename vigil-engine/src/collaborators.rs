//! External collaborator contracts the engine calls into.
//!
//! The engine itself holds no persistent state; uniqueness history,
//! reference data, and expression semantics live behind these traits.
//! Calls are treated as plain blocking lookups with no retry logic of the
//! engine's own, and a collaborator failure is never silently treated as a
//! pass.
//!
//! In-memory implementations are provided for each contract. They serve as
//! reference implementations and as fixtures for tests and examples.

use crate::error::{Result, VigilError};
use crate::record::DataRecord;
use async_trait::async_trait;
use std::collections::HashSet;
use std::fmt::Debug;
use tokio::sync::RwLock;

/// History of previously observed values, scoped by dataset or tenant.
///
/// Used by uniqueness rules: a value that already exists within the rule's
/// scope is a duplicate.
#[async_trait]
pub trait UniquenessStore: Debug + Send + Sync {
    /// Returns true if `value` has already been observed for `field_path`
    /// within `scope`.
    async fn exists(&self, value: &str, field_path: &str, scope: &str) -> Result<bool>;
}

/// Lookup into externally managed reference data.
///
/// Used by referential-integrity rules: a value must exist under the
/// configured table and column.
#[async_trait]
pub trait ReferenceStore: Debug + Send + Sync {
    /// Returns true if `value` exists under `table`.`column`.
    async fn exists(&self, value: &str, table: &str, column: &str) -> Result<bool>;
}

/// Evaluator for consistency and business-rule expressions.
///
/// The expression language is owned by the collaborator; the engine only
/// forwards the expression text together with the full record as context
/// and interprets the boolean verdict.
#[async_trait]
pub trait ExpressionEvaluator: Debug + Send + Sync {
    /// Evaluates `expression` against `context`, returning the verdict.
    async fn evaluate(&self, expression: &str, context: &DataRecord) -> Result<bool>;
}

/// An in-memory [`UniquenessStore`] backed by a hash set.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::collaborators::{InMemoryUniquenessStore, UniquenessStore};
///
/// # async fn example() -> vigil_engine::error::Result<()> {
/// let store = InMemoryUniquenessStore::new();
/// store.record("42", "user_id", "global").await;
/// assert!(store.exists("42", "user_id", "global").await?);
/// assert!(!store.exists("43", "user_id", "global").await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUniquenessStore {
    seen: RwLock<HashSet<(String, String, String)>>,
}

impl InMemoryUniquenessStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value as observed for a field within a scope.
    pub async fn record(
        &self,
        value: impl Into<String>,
        field_path: impl Into<String>,
        scope: impl Into<String>,
    ) {
        self.seen
            .write()
            .await
            .insert((value.into(), field_path.into(), scope.into()));
    }
}

#[async_trait]
impl UniquenessStore for InMemoryUniquenessStore {
    async fn exists(&self, value: &str, field_path: &str, scope: &str) -> Result<bool> {
        let key = (
            value.to_string(),
            field_path.to_string(),
            scope.to_string(),
        );
        Ok(self.seen.read().await.contains(&key))
    }
}

/// An in-memory [`ReferenceStore`] backed by a hash set.
#[derive(Debug, Default)]
pub struct InMemoryReferenceStore {
    entries: RwLock<HashSet<(String, String, String)>>,
}

impl InMemoryReferenceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a value under a table and column.
    pub async fn insert(
        &self,
        table: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.entries
            .write()
            .await
            .insert((table.into(), column.into(), value.into()));
    }
}

#[async_trait]
impl ReferenceStore for InMemoryReferenceStore {
    async fn exists(&self, value: &str, table: &str, column: &str) -> Result<bool> {
        let key = (table.to_string(), column.to_string(), value.to_string());
        Ok(self.entries.read().await.contains(&key))
    }
}

/// An [`ExpressionEvaluator`] that answers from a fixed verdict, with
/// optional per-expression overrides.
///
/// Useful as a default when no expression language is wired in, and in
/// tests that need deterministic expression outcomes.
#[derive(Debug)]
pub struct StaticExpressionEvaluator {
    default_verdict: bool,
    answers: Vec<(String, bool)>,
}

impl StaticExpressionEvaluator {
    /// Creates an evaluator that returns `verdict` for every expression.
    pub fn always(verdict: bool) -> Self {
        Self {
            default_verdict: verdict,
            answers: Vec::new(),
        }
    }

    /// Adds a canned verdict for one specific expression.
    pub fn with_answer(mut self, expression: impl Into<String>, verdict: bool) -> Self {
        self.answers.push((expression.into(), verdict));
        self
    }
}

impl Default for StaticExpressionEvaluator {
    fn default() -> Self {
        Self::always(true)
    }
}

#[async_trait]
impl ExpressionEvaluator for StaticExpressionEvaluator {
    async fn evaluate(&self, expression: &str, _context: &DataRecord) -> Result<bool> {
        let verdict = self
            .answers
            .iter()
            .find(|(expr, _)| expr == expression)
            .map(|(_, verdict)| *verdict)
            .unwrap_or(self.default_verdict);
        Ok(verdict)
    }
}

/// A collaborator that always fails, for exercising error paths.
///
/// Any call returns [`VigilError::Collaborator`] with the configured
/// message, which the engine folds into a failed check.
#[derive(Debug, Clone)]
pub struct UnreachableCollaborator {
    message: String,
}

impl UnreachableCollaborator {
    /// Creates a collaborator that fails with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl UniquenessStore for UnreachableCollaborator {
    async fn exists(&self, _value: &str, _field_path: &str, _scope: &str) -> Result<bool> {
        Err(VigilError::collaborator(self.message.clone()))
    }
}

#[async_trait]
impl ReferenceStore for UnreachableCollaborator {
    async fn exists(&self, _value: &str, _table: &str, _column: &str) -> Result<bool> {
        Err(VigilError::collaborator(self.message.clone()))
    }
}

#[async_trait]
impl ExpressionEvaluator for UnreachableCollaborator {
    async fn evaluate(&self, _expression: &str, _context: &DataRecord) -> Result<bool> {
        Err(VigilError::collaborator(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_uniqueness_store_scoping() {
        let store = InMemoryUniquenessStore::new();
        store.record("42", "user_id", "tenant_a").await;

        assert!(store.exists("42", "user_id", "tenant_a").await.unwrap());
        // A different scope has its own history.
        assert!(!store.exists("42", "user_id", "tenant_b").await.unwrap());
        assert!(!store.exists("42", "order_id", "tenant_a").await.unwrap());
    }

    #[tokio::test]
    async fn test_reference_store_lookup() {
        let store = InMemoryReferenceStore::new();
        store.insert("countries", "iso_code", "DE").await;

        assert!(store.exists("DE", "countries", "iso_code").await.unwrap());
        assert!(!store.exists("XX", "countries", "iso_code").await.unwrap());
        assert!(!store.exists("DE", "countries", "name").await.unwrap());
    }

    #[tokio::test]
    async fn test_static_expression_evaluator() {
        let evaluator = StaticExpressionEvaluator::always(true)
            .with_answer("total >= items * price", false);
        let record = DataRecord::new();

        assert!(evaluator.evaluate("anything", &record).await.unwrap());
        assert!(!evaluator
            .evaluate("total >= items * price", &record)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_unreachable_collaborator_errors() {
        let broken = UnreachableCollaborator::new("connection refused");
        let err = UniquenessStore::exists(&broken, "v", "f", "s")
            .await
            .unwrap_err();
        assert!(matches!(err, VigilError::Collaborator(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
