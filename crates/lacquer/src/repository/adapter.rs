//! The adapter: five uniform operations over one wrapped repository.

use std::sync::Arc;

use tracing::debug;

use crate::error::{RepositoryError, Result};
use crate::params::ParameterProvider;
use crate::query::QueryParams;
use crate::repository::args::{CallContext, ParamKind};
use crate::repository::{MethodBinding, Operation, ResourceRepository};

/// Dispatches uniform CRUD calls onto a repository's registered methods.
///
/// The adapter holds no per-call state: every operation is a synchronous
/// chain of binding lookup, shape validation, argument assembly and a single
/// delegated call. One instance may be shared across threads as long as the
/// registered methods and the provider are themselves thread-safe (which
/// their `Send + Sync` bounds already require).
pub struct RepositoryAdapter<T, I> {
    repository: ResourceRepository<T, I>,
    provider: Arc<dyn ParameterProvider>,
}

impl<T: 'static, I: 'static> RepositoryAdapter<T, I> {
    /// Wrap `repository`, resolving extra parameters through `provider`.
    pub fn new(repository: ResourceRepository<T, I>, provider: impl ParameterProvider + 'static) -> Self {
        Self {
            repository,
            provider: Arc::new(provider),
        }
    }

    /// The wrapped repository.
    pub fn repository(&self) -> &ResourceRepository<T, I> {
        &self.repository
    }

    /// Fetch one entity by identifier.
    pub fn find_one(&self, id: I, query: &QueryParams) -> Result<T> {
        let binding = self.binding(Operation::FindOne, self.repository.find_one.as_ref())?;
        self.dispatch(Operation::FindOne, binding, Some(id), None, None, Some(query))
    }

    /// Fetch all entities.
    pub fn find_all(&self, query: &QueryParams) -> Result<Vec<T>> {
        let binding = self.binding(Operation::FindAll, self.repository.find_all.as_ref())?;
        self.dispatch(Operation::FindAll, binding, None, None, None, Some(query))
    }

    /// Fetch the entities matching `ids`.
    pub fn find_all_with_ids(&self, ids: Vec<I>, query: &QueryParams) -> Result<Vec<T>> {
        let binding = self.binding(
            Operation::FindAllWithIds,
            self.repository.find_all_with_ids.as_ref(),
        )?;
        self.dispatch(
            Operation::FindAllWithIds,
            binding,
            None,
            Some(ids),
            None,
            Some(query),
        )
    }

    /// Create or update `entity`, returning the repository's view of it.
    pub fn save(&self, entity: T) -> Result<T> {
        let binding = self.binding(Operation::Save, self.repository.save.as_ref())?;
        self.dispatch(Operation::Save, binding, None, None, Some(entity), None)
    }

    /// Delete one entity by identifier.
    pub fn delete(&self, id: I, query: &QueryParams) -> Result<()> {
        let binding = self.binding(Operation::Delete, self.repository.delete.as_ref())?;
        self.dispatch(Operation::Delete, binding, Some(id), None, None, Some(query))
    }

    fn binding<'a, R>(
        &self,
        operation: Operation,
        slot: Option<&'a MethodBinding<T, I, R>>,
    ) -> Result<&'a MethodBinding<T, I, R>> {
        slot.ok_or_else(|| RepositoryError::CapabilityAbsent {
            operation,
            resource_type: self.repository.resource_type,
        })
    }

    fn dispatch<R>(
        &self,
        operation: Operation,
        binding: &MethodBinding<T, I, R>,
        id: Option<I>,
        ids: Option<Vec<I>>,
        entity: Option<T>,
        query: Option<&QueryParams>,
    ) -> Result<R> {
        validate_shape(operation, binding.params(), self.repository.resource_type)?;
        debug!(
            resource_type = self.repository.resource_type,
            operation = %operation,
            "dispatching repository method"
        );
        let mut cx = CallContext {
            operation,
            resource_type: self.repository.resource_type,
            id,
            ids,
            entity,
            query,
            provider: self.provider.as_ref(),
        };
        binding.call(&mut cx)
    }
}

/// Check a declared parameter shape against the operation's contract.
///
/// The contract per operation: a structurally required primary argument must
/// come first (`Id` for find_one/delete, `Ids` for find_all_with_ids,
/// `Entity` for save; find_all has none), the query parameters may appear
/// once, directly after the primaries, and everything beyond is extras.
fn validate_shape(
    operation: Operation,
    params: &[ParamKind],
    resource_type: &'static str,
) -> Result<()> {
    let malformed = |reason: String| RepositoryError::MalformedMethod {
        operation,
        resource_type,
        reason,
    };

    let primary = match operation {
        Operation::FindOne | Operation::Delete => Some(ParamKind::Id),
        Operation::FindAllWithIds => Some(ParamKind::Ids),
        Operation::Save => Some(ParamKind::Entity),
        Operation::FindAll => None,
    };
    let query_allowed = !matches!(operation, Operation::Save);

    let rest = match primary {
        Some(kind) => match params.first() {
            None => {
                return Err(malformed(format!(
                    "declares no parameters but must lead with the {kind}"
                )));
            }
            Some(first) if *first != kind => {
                return Err(malformed(format!(
                    "first parameter must be the {kind}, found {first}"
                )));
            }
            Some(_) => &params[1..],
        },
        None => params,
    };

    for (position, kind) in rest.iter().enumerate() {
        match kind {
            ParamKind::Id | ParamKind::Ids | ParamKind::Entity => {
                return Err(malformed(format!("{kind} parameter is misplaced or repeated")));
            }
            ParamKind::Query if !query_allowed => {
                return Err(malformed(
                    "query parameters are not part of this operation".to_owned(),
                ));
            }
            ParamKind::Query if position != 0 => {
                return Err(malformed(
                    "query parameters must come directly after the primary argument".to_owned(),
                ));
            }
            ParamKind::Query | ParamKind::Extra(_) => {}
        }
    }
    Ok(())
}
