//! Filter, pagination and loading state for one admin list.
//!
//! A [`ListController`] turns filter and page intents into a fetch against its
//! [`ListSource`] and reconciles the result into the slice. Every action that
//! changes the query re-enters the loading state.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::notifications::{Notification, Notifier};
use crate::services::{ListPage, ServiceResult};
use crate::store::filters::Filters;

/// Capability to fetch one page of a list for the given filters.
pub trait ListSource<F> {
    type Item: Clone;

    fn fetch(
        &self,
        filters: F,
        page: usize,
        page_size: usize,
    ) -> impl Future<Output = ServiceResult<ListPage<Self::Item>>>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListQuery<F> {
    pub filters: F,
    /// One-based page number, never zero.
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<F: Default> ListQuery<F> {
    pub fn new(page_size: usize) -> Self {
        Self {
            filters: F::default(),
            page: 1,
            page_size: page_size.max(1),
            total: 0,
            is_loading: false,
            error: None,
        }
    }
}

impl<F> ListQuery<F> {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }
}

/// Copy of a slice handed to views.
#[derive(Clone, Debug, Serialize)]
pub struct ListSnapshot<T, F> {
    pub query: ListQuery<F>,
    pub items: Vec<T>,
    pub loaded: bool,
}

/// Result of a single [`ListController::load`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer request was issued while this one was in flight; its result
    /// was dropped.
    Superseded,
    /// The slice already held data and no fetch was made.
    Cached,
}

struct ListState<T, F> {
    query: ListQuery<F>,
    items: Vec<T>,
    loaded: bool,
    latest_request: u64,
}

/// Clears the loading flag when a fetch ends without reconciling, e.g. when
/// the request future is dropped. Only the latest request may clear it.
struct InFlight<'a, T, F> {
    state: &'a Mutex<ListState<T, F>>,
    request: u64,
}

impl<T, F> Drop for InFlight<'_, T, F> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.latest_request == self.request {
            state.query.is_loading = false;
        }
    }
}

pub struct ListController<S, F>
where
    S: ListSource<F>,
    F: Filters,
{
    source: Arc<S>,
    notifier: Arc<dyn Notifier>,
    label: &'static str,
    state: Mutex<ListState<S::Item, F>>,
}

impl<S, F> ListController<S, F>
where
    S: ListSource<F>,
    F: Filters,
{
    /// `label` names the list in user-facing messages, e.g. "patients".
    pub fn new(
        source: Arc<S>,
        notifier: Arc<dyn Notifier>,
        label: &'static str,
        page_size: usize,
    ) -> Self {
        Self {
            source,
            notifier,
            label,
            state: Mutex::new(ListState {
                query: ListQuery::new(page_size),
                items: Vec::new(),
                loaded: false,
                latest_request: 0,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ListState<S::Item, F>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ListSnapshot<S::Item, F> {
        let state = self.state();
        ListSnapshot {
            query: state.query.clone(),
            items: state.items.clone(),
            loaded: state.loaded,
        }
    }

    pub fn query(&self) -> ListQuery<F> {
        self.state().query.clone()
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.state().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().query.is_loading
    }

    /// First item on the current page matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&S::Item) -> bool) -> Option<S::Item> {
        self.state().items.iter().find(|item| predicate(item)).cloned()
    }

    /// Merges `patch` into the filters, goes back to the first page and
    /// refetches.
    pub async fn set_filter(&self, patch: F::Patch) -> LoadOutcome {
        {
            let mut state = self.state();
            state.query.filters.merge(patch);
            state.query.page = 1;
        }
        self.load().await
    }

    pub async fn clear_filters(&self) -> LoadOutcome {
        {
            let mut state = self.state();
            state.query.filters = F::default();
            state.query.page = 1;
        }
        self.load().await
    }

    pub async fn set_page(&self, page: usize, page_size: usize) -> LoadOutcome {
        {
            let mut state = self.state();
            state.query.page = page.max(1);
            state.query.page_size = page_size.max(1);
        }
        self.load().await
    }

    /// Loads the slice unless it already holds a fetched page.
    pub async fn ensure_loaded(&self) -> LoadOutcome {
        if self.state().loaded {
            return LoadOutcome::Cached;
        }
        self.load().await
    }

    pub async fn load(&self) -> LoadOutcome {
        let (request, filters, page, page_size) = {
            let mut state = self.state();
            state.latest_request += 1;
            state.query.is_loading = true;
            (
                state.latest_request,
                state.query.filters.clone(),
                state.query.page,
                state.query.page_size,
            )
        };
        let _in_flight = InFlight {
            state: &self.state,
            request,
        };

        let result = self.source.fetch(filters, page, page_size).await;

        let failure = {
            let mut state = self.state();
            if state.latest_request != request {
                log::debug!(
                    "Dropping stale {} response (request {request}, latest {})",
                    self.label,
                    state.latest_request
                );
                return LoadOutcome::Superseded;
            }

            state.query.is_loading = false;
            match result {
                Ok(ListPage { items, total }) => {
                    state.items = items;
                    state.query.total = total;
                    state.query.error = None;
                    state.loaded = true;
                    None
                }
                Err(err) => {
                    log::error!("Failed to load {}: {err}", self.label);
                    let message = format!("Failed to load {}. Please try again.", self.label);
                    state.query.error = Some(message.clone());
                    Some(message)
                }
            }
        };

        match failure {
            Some(message) => {
                self.notifier.notify(Notification::error(message));
                LoadOutcome::Failed
            }
            None => LoadOutcome::Applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use actix_web::rt::time::sleep;

    use super::*;
    use crate::notifications::{NotificationLevel, RecordingNotifier};
    use crate::services::ServiceError;
    use crate::store::filters::{PatientFilterPatch, PatientFilters};

    /// Serves `page * 100 + n` numbers; page 1 answers slower than the rest.
    #[derive(Default)]
    struct NumberSource {
        calls: AtomicUsize,
        failing: AtomicBool,
        slow_first_page: bool,
    }

    impl ListSource<PatientFilters> for NumberSource {
        type Item = usize;

        async fn fetch(
            &self,
            filters: PatientFilters,
            page: usize,
            page_size: usize,
        ) -> ServiceResult<ListPage<usize>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.slow_first_page && page == 1 {
                sleep(Duration::from_millis(60)).await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::Unavailable("backend offline".to_string()));
            }
            let total = if filters.search.is_empty() { 42 } else { 3 };
            Ok(ListPage {
                items: (0..page_size.min(total)).map(|n| page * 100 + n).collect(),
                total,
            })
        }
    }

    fn controller(
        source: NumberSource,
    ) -> (
        ListController<NumberSource, PatientFilters>,
        Arc<NumberSource>,
        Arc<RecordingNotifier>,
    ) {
        let source = Arc::new(source);
        let notifier = Arc::new(RecordingNotifier::new());
        let controller = ListController::new(source.clone(), notifier.clone(), "patients", 5);
        (controller, source, notifier)
    }

    #[actix_web::test]
    async fn load_populates_items_and_total() {
        let (list, _, _) = controller(NumberSource::default());

        assert_eq!(list.load().await, LoadOutcome::Applied);

        let snapshot = list.snapshot();
        assert_eq!(snapshot.items, vec![100, 101, 102, 103, 104]);
        assert_eq!(snapshot.query.total, 42);
        assert_eq!(snapshot.query.total_pages(), 9);
        assert!(!snapshot.query.is_loading);
        assert!(snapshot.loaded);
    }

    #[actix_web::test]
    async fn filter_change_resets_page() {
        let (list, _, _) = controller(NumberSource::default());
        list.set_page(4, 5).await;
        assert_eq!(list.query().page, 4);

        list.set_filter(PatientFilterPatch::search("maria")).await;

        let query = list.query();
        assert_eq!(query.page, 1);
        assert_eq!(query.filters.search, "maria");
        assert_eq!(query.total, 3);
    }

    #[actix_web::test]
    async fn status_filter_resets_page() {
        let (list, _, _) = controller(NumberSource::default());
        list.set_page(3, 5).await;

        list.set_filter(PatientFilterPatch::status(Some(
            crate::domain::patient::PatientStatus::Discharged,
        )))
        .await;

        assert_eq!(list.query().page, 1);
    }

    #[actix_web::test]
    async fn set_page_keeps_filters_and_clamps_zero() {
        let (list, _, _) = controller(NumberSource::default());
        list.set_filter(PatientFilterPatch::search("knee")).await;

        list.set_page(0, 0).await;

        let query = list.query();
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 1);
        assert_eq!(query.filters.search, "knee");
    }

    #[actix_web::test]
    async fn clear_filters_resets_and_fetches_once() {
        let (list, source, _) = controller(NumberSource::default());
        list.set_filter(PatientFilterPatch::search("maria")).await;
        list.set_page(2, 5).await;
        let calls_before = source.calls.load(Ordering::SeqCst);

        list.clear_filters().await;

        assert_eq!(source.calls.load(Ordering::SeqCst), calls_before + 1);
        let query = list.query();
        assert!(query.filters.is_default());
        assert_eq!(query.page, 1);
    }

    #[actix_web::test]
    async fn repeated_loads_are_idempotent() {
        let (list, _, _) = controller(NumberSource::default());

        list.load().await;
        let first = list.snapshot();
        list.load().await;
        let second = list.snapshot();

        assert_eq!(first.items, second.items);
        assert_eq!(first.query.total, second.query.total);
    }

    #[actix_web::test]
    async fn failure_sets_error_and_notifies() {
        let (list, source, notifier) = controller(NumberSource::default());
        list.load().await;
        source.failing.store(true, Ordering::SeqCst);

        assert_eq!(list.load().await, LoadOutcome::Failed);

        let snapshot = list.snapshot();
        assert!(!snapshot.query.is_loading);
        assert_eq!(
            snapshot.query.error.as_deref(),
            Some("Failed to load patients. Please try again.")
        );
        // The previous page stays visible.
        assert_eq!(snapshot.items.len(), 5);
        let last = notifier.last().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);

        source.failing.store(false, Ordering::SeqCst);
        list.load().await;
        assert!(list.query().error.is_none());
    }

    #[actix_web::test]
    async fn stale_response_does_not_overwrite_newer_one() {
        let (list, _, _) = controller(NumberSource {
            slow_first_page: true,
            ..NumberSource::default()
        });

        let (slow, fast) = futures::join!(list.load(), async {
            sleep(Duration::from_millis(5)).await;
            list.set_page(2, 5).await
        });

        assert_eq!(fast, LoadOutcome::Applied);
        assert_eq!(slow, LoadOutcome::Superseded);
        let snapshot = list.snapshot();
        assert_eq!(snapshot.query.page, 2);
        assert_eq!(snapshot.items[0], 200);
        assert!(!snapshot.query.is_loading);
    }

    #[actix_web::test]
    async fn abandoned_load_clears_the_loading_flag() {
        let (list, _, _) = controller(NumberSource {
            slow_first_page: true,
            ..NumberSource::default()
        });
        list.load().await;

        let abandoned =
            actix_web::rt::time::timeout(Duration::from_millis(5), list.load()).await;

        assert!(abandoned.is_err());
        assert!(!list.is_loading());
        assert_eq!(list.ensure_loaded().await, LoadOutcome::Cached);
        assert_eq!(list.snapshot().items[0], 100);
    }

    #[actix_web::test]
    async fn ensure_loaded_fetches_only_once() {
        let (list, source, _) = controller(NumberSource::default());

        assert_eq!(list.ensure_loaded().await, LoadOutcome::Applied);
        assert_eq!(list.ensure_loaded().await, LoadOutcome::Cached);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
