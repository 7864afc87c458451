use super::ListState;
use crate::api::{ApiResult, EnvConfig};
use crate::models::{Entity, Listing};
use crate::util::now_ms;
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use serde_json::{Map, Value};
use std::future::Future;

/// Runs a callback once after `delay_ms`.
pub(crate) type Timer = fn(u32, Box<dyn FnOnce()>);

fn browser_timer(delay_ms: u32, callback: Box<dyn FnOnce()>) {
    let _ = Timeout::new(delay_ms, callback).forget();
}

/// Owns one view's list state and drives its reconciliation queue.
///
/// Every action awaits the request it is handed and then passes the result to the
/// reducer in [`ListState`]; deferred deletes/updates are flushed by a timer that only
/// calls [`ListState::apply_due`]. Once the owning view is disposed all of this becomes
/// a no-op.
pub(crate) struct ListController<R: Entity> {
    state: RwSignal<ListState<R>>,
    request_id: RwSignal<u64>,
    delete_delay_ms: u32,
    update_delay_ms: u32,
    clock: fn() -> i64,
    timer: Timer,
}

impl<R: Entity> Clone for ListController<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: Entity> Copy for ListController<R> {}

impl<R: Entity> ListController<R> {
    pub fn new(config: &EnvConfig) -> Self {
        Self::with_clock(config, now_ms, browser_timer)
    }

    pub fn with_clock(config: &EnvConfig, clock: fn() -> i64, timer: Timer) -> Self {
        Self {
            state: RwSignal::new(ListState::new()),
            request_id: RwSignal::new(0),
            delete_delay_ms: config.delete_delay_ms,
            update_delay_ms: config.update_delay_ms,
            clock,
            timer,
        }
    }

    /// Tracked read of the current entries.
    pub fn entries(&self) -> Vec<R> {
        self.state.with(|s| s.entries().to_vec())
    }

    pub fn keys(&self) -> Vec<String> {
        self.state.with(|s| s.keys().to_vec())
    }

    pub fn is_loading(&self) -> bool {
        self.state.with(|s| s.is_loading())
    }

    pub fn load_error(&self) -> Option<String> {
        self.state.with(|s| s.load_error().map(str::to_string))
    }

    /// Refetches the list. Responses to superseded loads are dropped.
    pub async fn load(
        &self,
        fetch: impl Future<Output = ApiResult<Listing<R>>>,
    ) -> ApiResult<()> {
        let Some(req_id) = self.request_id.try_update(|id| {
            *id = id.wrapping_add(1);
            *id
        }) else {
            return Ok(());
        };
        self.state.try_update(|s| s.begin_load());

        let result = fetch.await;

        if self.request_id.try_get_untracked() != Some(req_id) {
            log::debug!("{}: ignoring stale list response", R::KIND);
            return Ok(());
        }
        self.state
            .try_update(|s| s.apply_loaded(result))
            .unwrap_or(Ok(()))
    }

    pub async fn create(&self, request: impl Future<Output = ApiResult<R>>) -> ApiResult<()> {
        let result = request.await;
        self.state
            .try_update(|s| s.apply_created(result))
            .unwrap_or(Ok(()))
    }

    pub async fn search(&self, request: impl Future<Output = ApiResult<Vec<R>>>) -> ApiResult<()> {
        let result = request.await;
        self.state
            .try_update(|s| s.apply_search(result))
            .unwrap_or(Ok(()))
    }

    pub async fn delete(
        &self,
        id: &str,
        request: impl Future<Output = ApiResult<()>>,
    ) -> ApiResult<()> {
        let result = request.await;
        let apply_at = (self.clock)() + i64::from(self.delete_delay_ms);

        match self.state.try_update(|s| s.confirm_delete(result, id, apply_at)) {
            Some(Ok(())) => {
                self.schedule_flush(apply_at, self.delete_delay_ms);
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Ok(()),
        }
    }

    pub async fn update(
        &self,
        id: &str,
        patch: Map<String, Value>,
        request: impl Future<Output = ApiResult<()>>,
    ) -> ApiResult<()> {
        let result = request.await;
        let apply_at = (self.clock)() + i64::from(self.update_delay_ms);

        match self
            .state
            .try_update(|s| s.confirm_update(result, id, patch, apply_at))
        {
            Some(Ok(())) => {
                self.schedule_flush(apply_at, self.update_delay_ms);
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Ok(()),
        }
    }

    fn schedule_flush(&self, apply_at: i64, delay_ms: u32) {
        let this = *self;
        (self.timer)(delay_ms, Box::new(move || this.flush(apply_at)));
    }

    // The timer may fire a tick before the clock reaches the deadline it was set for.
    fn flush(&self, deadline: i64) {
        let now = (self.clock)().max(deadline);
        let _ = self.state.try_update(|s| {
            let applied = s.apply_due(now);
            if applied > 0 {
                log::debug!("{}: applied {applied} deferred change(s)", R::KIND);
            }
        });
    }
}
