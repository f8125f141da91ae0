use metrics_exporter_prometheus::PrometheusHandle;
use profile_matching::matching::{
    Applicant, CalculationResult, Catalog, CatalogRepository, JobPosition, JobPositionId,
    RepositoryError, ResultStore,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog snapshot held in memory, standing in for the CRUD layer's database.
#[derive(Clone)]
pub(crate) struct InMemoryCatalog {
    catalog: Arc<Mutex<Catalog>>,
}

impl InMemoryCatalog {
    pub(crate) fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, Catalog>, RepositoryError> {
        self.catalog
            .lock()
            .map_err(|_| RepositoryError::Unavailable("catalog lock poisoned".to_string()))
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn job_position(&self, id: &JobPositionId) -> Result<Option<JobPosition>, RepositoryError> {
        Ok(self.guard()?.job_position(id).cloned())
    }

    fn applicants(&self) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(self.guard()?.applicants.clone())
    }

    fn remove_job_position(&self, id: &JobPositionId) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        let before = guard.job_positions.len();
        guard.job_positions.retain(|job| &job.id != id);
        if guard.job_positions.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryResultStore {
    results: Arc<Mutex<HashMap<JobPositionId, CalculationResult>>>,
}

impl InMemoryResultStore {
    fn guard(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<JobPositionId, CalculationResult>>, RepositoryError> {
        self.results
            .lock()
            .map_err(|_| RepositoryError::Unavailable("result store lock poisoned".to_string()))
    }
}

impl ResultStore for InMemoryResultStore {
    fn save(&self, result: CalculationResult) -> Result<(), RepositoryError> {
        self.guard()?
            .insert(result.job_position.id.clone(), result);
        Ok(())
    }

    fn latest(&self, job: &JobPositionId) -> Result<Option<CalculationResult>, RepositoryError> {
        Ok(self.guard()?.get(job).cloned())
    }
}
