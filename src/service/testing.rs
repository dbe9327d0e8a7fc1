//! Test fixtures for the service layer

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::ApplicationService;
use crate::cache::{AuthorizationCache, DEFAULT_AUTH_CACHE_CAPACITY};
use crate::client::{MockAuthorizationClient, MockBpmClient};
use crate::store::{
    AggregateQuery, AggregatedApplication, Application, ApplicationRepository, ApplicationScope,
    ApplicationUpdate, FormProcessMapper, NEW_APPLICATION_STATUS, NewApplication,
    NewFormProcessMapper, QueryFilter, SqliteStore, StoreResult,
};

pub(crate) fn seed_mapper(
    repo: &dyn ApplicationRepository,
    form_id: &str,
    form_name: &str,
    process_key: Option<&str>,
) -> FormProcessMapper {
    repo.create_mapper(&NewFormProcessMapper {
        form_id: form_id.to_string(),
        form_name: form_name.to_string(),
        process_key: process_key.map(str::to_string),
        process_name: None,
        created_by: Some("admin".to_string()),
    })
    .unwrap()
}

pub(crate) fn seed_application(
    repo: &dyn ApplicationRepository,
    mapper: &FormProcessMapper,
    owner: &str,
) -> Application {
    repo.create(&NewApplication {
        application_name: mapper.form_name.clone(),
        application_status: NEW_APPLICATION_STATUS.to_string(),
        form_process_mapper_id: mapper.id,
        form_url: Some(format!(
            "https://forms.example/form/{}/submission/{}",
            mapper.form_id, owner
        )),
        created_by: Some(owner.to_string()),
    })
    .unwrap()
}

/// SQLite store that counts read calls
pub(crate) struct CountingRepository {
    pub inner: SqliteStore,
    reads: AtomicUsize,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self {
            inner: SqliteStore::open_in_memory().unwrap(),
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of find/count calls made.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

impl ApplicationRepository for CountingRepository {
    fn create(&self, new: &NewApplication) -> StoreResult<Application> {
        self.inner.create(new)
    }

    fn update(&self, id: i64, update: &ApplicationUpdate) -> StoreResult<Option<Application>> {
        self.inner.update(id, update)
    }

    fn find_by_id(&self, id: i64) -> StoreResult<Option<Application>> {
        self.read();
        self.inner.find_by_id(id)
    }

    fn find_applications(
        &self,
        scope: &ApplicationScope,
        filter: &QueryFilter,
    ) -> StoreResult<(Vec<Application>, u64)> {
        self.read();
        self.inner.find_applications(scope, filter)
    }

    fn count_applications(&self, scope: &ApplicationScope) -> StoreResult<u64> {
        self.read();
        self.inner.count_applications(scope)
    }

    fn find_all_statuses(&self) -> StoreResult<Vec<String>> {
        self.read();
        self.inner.find_all_statuses()
    }

    fn aggregate(&self, query: &AggregateQuery) -> StoreResult<Vec<AggregatedApplication>> {
        self.read();
        self.inner.aggregate(query)
    }

    fn find_mapper_by_form_id(&self, form_id: &str) -> StoreResult<Option<FormProcessMapper>> {
        self.inner.find_mapper_by_form_id(form_id)
    }

    fn find_mapper_by_application_id(&self, id: i64) -> StoreResult<Option<FormProcessMapper>> {
        self.inner.find_mapper_by_application_id(id)
    }

    fn create_mapper(&self, new: &NewFormProcessMapper) -> StoreResult<FormProcessMapper> {
        self.inner.create_mapper(new)
    }
}

/// Service wired to mocks, a counting store and a real authorization cache
pub(crate) struct Harness {
    pub service: ApplicationService,
    pub repo: Arc<CountingRepository>,
    pub bpm: Arc<MockBpmClient>,
    pub auth: Arc<MockAuthorizationClient>,
    pub cache: Arc<AuthorizationCache<MockAuthorizationClient>>,
}

impl Harness {
    pub fn new(bpm: MockBpmClient, auth: MockAuthorizationClient) -> Self {
        let repo = Arc::new(CountingRepository::new());
        let bpm = Arc::new(bpm);
        let auth = Arc::new(auth);
        let cache = Arc::new(AuthorizationCache::from_arc(auth.clone(), DEFAULT_AUTH_CACHE_CAPACITY));
        let service = ApplicationService::new(repo.clone(), bpm.clone(), cache.clone());
        Self {
            service,
            repo,
            bpm,
            auth,
            cache,
        }
    }

    pub fn store(&self) -> &dyn ApplicationRepository {
        self.repo.as_ref()
    }
}
