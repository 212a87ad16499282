//! PostgreSQL-backed `PatientStore` implementation using Diesel ORM.
//!
//! Every operation, pool checkout included, runs under a single deadline.
//! Full replaces are an UPDATE followed by a re-read without a surrounding
//! transaction; clinical updates are a single `UPDATE ... RETURNING`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PatientStore, PatientStoreError};
use crate::domain::{
    ClinicalUpdate, DoctorId, NewPatient, PatientClinicalView, PatientId, PatientRecord,
};

use super::diesel_helpers::{
    DieselFailure, OPERATION_DEADLINE, classify_diesel_error, with_deadline,
};
use super::models::{ClinicalChangeset, PatientClinicalRow, PatientRow, PatientWriteRow};
use super::pool::{DbPool, PoolError};
use super::schema::patients;

/// Diesel-backed implementation of the `PatientStore` port.
#[derive(Clone)]
pub struct DieselPatientStore {
    pool: DbPool,
    deadline: Duration,
}

impl DieselPatientStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            deadline: OPERATION_DEADLINE,
        }
    }

    /// Override the per-operation deadline.
    pub fn with_operation_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    async fn guarded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, PatientStoreError>
    where
        F: Future<Output = Result<T, PatientStoreError>>,
    {
        with_deadline(self.deadline, operation, fut, |message| {
            PatientStoreError::timeout(message)
        })
        .await
    }
}

fn map_pool_error(error: PoolError) -> PatientStoreError {
    PatientStoreError::connection(error.into_message())
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> PatientStoreError {
    match classify_diesel_error(error, operation) {
        DieselFailure::NotFound => PatientStoreError::not_found(),
        DieselFailure::UniqueViolation { constraint } => PatientStoreError::conflict(
            constraint.unwrap_or_else(|| "unique constraint".to_owned()),
        ),
        DieselFailure::ForeignKeyViolation { constraint } => PatientStoreError::unknown_doctor(
            constraint.unwrap_or_else(|| "foreign key constraint".to_owned()),
        ),
        DieselFailure::Connection => PatientStoreError::connection("database connection error"),
        DieselFailure::Query { message } => PatientStoreError::query(message),
    }
}

#[async_trait]
impl PatientStore for DieselPatientStore {
    async fn find_by_aadhar(&self, aadhar: &str) -> Result<PatientRecord, PatientStoreError> {
        self.guarded("find_by_aadhar", async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            patients::table
                .filter(patients::aadhar.eq(aadhar))
                .select(PatientRow::as_select())
                .first(&mut conn)
                .await
                .map(PatientRecord::from)
                .map_err(|err| map_diesel_error(err, "find_by_aadhar"))
        })
        .await
    }

    async fn find_by_doctor(
        &self,
        doctor: DoctorId,
    ) -> Result<Vec<PatientClinicalView>, PatientStoreError> {
        self.guarded("find_by_doctor", async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            let rows: Vec<PatientClinicalRow> = patients::table
                .filter(patients::doctor_id.eq(doctor.get()))
                .order(patients::id.asc())
                .select(PatientClinicalRow::as_select())
                .load(&mut conn)
                .await
                .map_err(|err| map_diesel_error(err, "find_by_doctor"))?;
            Ok(rows.into_iter().map(PatientClinicalView::from).collect())
        })
        .await
    }

    async fn insert(&self, patient: &NewPatient) -> Result<PatientId, PatientStoreError> {
        self.guarded("insert", async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            diesel::insert_into(patients::table)
                .values(PatientWriteRow::from(patient))
                .returning(patients::id)
                .get_result::<i32>(&mut conn)
                .await
                .map(PatientId::new)
                .map_err(|err| map_diesel_error(err, "insert"))
        })
        .await
    }

    async fn update(
        &self,
        id: PatientId,
        patient: &NewPatient,
    ) -> Result<PatientRecord, PatientStoreError> {
        self.guarded("update", async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            let row = PatientWriteRow::from(patient);

            let affected = diesel::update(patients::table.find(id.get()))
                .set((&row, patients::updated_at.eq(diesel::dsl::now)))
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(err, "update"))?;
            if affected == 0 {
                return Err(PatientStoreError::not_found());
            }

            // A concurrent delete between the two statements surfaces as NotFound.
            patients::table
                .find(id.get())
                .select(PatientRow::as_select())
                .first(&mut conn)
                .await
                .map(PatientRecord::from)
                .map_err(|err| map_diesel_error(err, "update_reread"))
        })
        .await
    }

    async fn update_clinical(
        &self,
        id: PatientId,
        update: &ClinicalUpdate,
    ) -> Result<PatientClinicalView, PatientStoreError> {
        self.guarded("update_clinical", async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            let changes = ClinicalChangeset::from(update);

            diesel::update(patients::table.find(id.get()))
                .set((&changes, patients::updated_at.eq(diesel::dsl::now)))
                .returning(PatientClinicalRow::as_returning())
                .get_result(&mut conn)
                .await
                .map(PatientClinicalView::from)
                .map_err(|err| map_diesel_error(err, "update_clinical"))
        })
        .await
    }

    async fn delete(&self, id: PatientId) -> Result<(), PatientStoreError> {
        self.guarded("delete", async {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            let affected = diesel::delete(patients::table.find(id.get()))
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(err, "delete"))?;
            if affected == 0 {
                return Err(PatientStoreError::not_found());
            }
            Ok(())
        })
        .await
    }
}
