//! Invalidate-and-refetch coordination for one resource kind.

use super::list_view::{ListState, ListView};
use crate::api::{ApiError, ApiOperation, ApiResult, ApiVerb, ResourceApi};
use crate::model::ResourceId;
use log::{debug, warn};

/// Owns the list view of one kind and routes mutations through the API.
///
/// Mutations take `&mut self`, so one coordinator runs at most one
/// mutation at a time and the follow-up refetch always observes it.
pub struct RefetchCoordinator<A: ResourceApi> {
    api: A,
    view: ListView<A::Record>,
}

impl<A: ResourceApi> RefetchCoordinator<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: ListView::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &ListView<A::Record> {
        &self.view
    }

    /// Issues the initial list query when the view is still idle.
    pub fn mount(&mut self) -> &ListState<A::Record> {
        if matches!(self.view.state(), ListState::Idle) {
            self.refetch();
        }
        self.view.state()
    }

    /// Re-issues the list query unconditionally.
    pub fn refetch(&mut self) -> &ListState<A::Record> {
        self.view.begin_fetch();
        let result = self.api.list();
        self.view.complete_fetch(result);
        self.view.state()
    }

    pub fn create(&mut self, input: &A::Input) -> ApiResult<A::Record> {
        let result = self.api.create(input);
        self.after_mutation(ApiVerb::Create, result)
    }

    pub fn update(&mut self, id: ResourceId, input: &A::Input) -> ApiResult<A::Record> {
        let result = self.api.update(id, input);
        self.after_mutation(ApiVerb::Update, result)
    }

    pub fn delete(&mut self, id: ResourceId) -> ApiResult<bool> {
        let result = self.api.delete(id);
        self.after_mutation(ApiVerb::Delete, result)
    }

    fn after_mutation<T>(&mut self, verb: ApiVerb, result: ApiResult<T>) -> ApiResult<T> {
        let op = ApiOperation::new(verb, A::KIND);
        match &result {
            // NotFound means the displayed list is stale as well.
            Ok(_) | Err(ApiError::NotFound { .. }) => {
                debug!("event=refetch module=client op={} status=start", op.name());
                self.refetch();
            }
            Err(err) => {
                warn!(
                    "event=refetch module=client op={} status=skipped reason={}",
                    op.name(),
                    err.message()
                );
            }
        }
        result
    }
}
