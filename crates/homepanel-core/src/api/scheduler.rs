use super::HomeApi;
use crate::cache::{CacheKey, Resource};
use crate::ports::ApiRequest;
use crate::validation;
use crate::Result;
use homepanel_types::{Job, JobUpdate, NewJob};

impl HomeApi {
    pub async fn jobs(&self) -> Result<Vec<Job>> {
        self.query(CacheKey::list(Resource::Jobs), "/scheduler/jobs".into())
            .await
    }

    pub async fn create_job(&self, job: &NewJob) -> Result<Job> {
        validation::validate_new_job(job)?;
        self.mutate(
            ApiRequest::post("/scheduler/jobs").json(job)?,
            &[CacheKey::list(Resource::Jobs)],
        )
        .await
    }

    pub async fn update_job(&self, id: i64, update: &JobUpdate) -> Result<Job> {
        if let Some(name) = &update.name {
            validation::required("name", name)?;
        }
        self.mutate(
            ApiRequest::patch(format!("/scheduler/jobs/{}", id)).json(update)?,
            &[CacheKey::list(Resource::Jobs)],
        )
        .await
    }

    pub async fn set_job_enabled(&self, id: i64, enabled: bool) -> Result<Job> {
        self.update_job(
            id,
            &JobUpdate {
                enabled: Some(enabled),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn delete_job(&self, id: i64) -> Result<()> {
        self.mutate_empty(
            ApiRequest::delete(format!("/scheduler/jobs/{}", id)),
            &[CacheKey::list(Resource::Jobs)],
        )
        .await
    }
}
