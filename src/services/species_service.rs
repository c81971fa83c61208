//! src/services/species_service.rs
//!
//! SpeciesService — record storage for species entries backed by SQLite.
//! The [`SpeciesStore`] trait is the seam the list/search/edit workflow is
//! written against; `SpeciesService` is the production implementation.

use crate::models::species::{Species, SpeciesInput};
use sqlx::SqlitePool;
use std::{future::Future, sync::Arc};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("species `{0}` not found")]
    NotFound(i64),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Operations the workflow needs from the record store.
///
/// Every call either succeeds or returns an error whose `Display` is a
/// human-readable message suitable for a notification.
pub trait SpeciesStore {
    /// All records, newest (highest id) first.
    fn list_newest_first(&self) -> impl Future<Output = StoreResult<Vec<Species>>> + Send;

    fn get(&self, id: i64) -> impl Future<Output = StoreResult<Species>> + Send;

    fn insert(
        &self,
        owner_id: &str,
        input: &SpeciesInput,
    ) -> impl Future<Output = StoreResult<Species>> + Send;

    /// Overwrite exactly the form's field set of record `id`.
    fn update(
        &self,
        id: i64,
        input: &SpeciesInput,
    ) -> impl Future<Output = StoreResult<Species>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = StoreResult<()>> + Send;
}

#[derive(Clone)]
pub struct SpeciesService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

const SPECIES_COLUMNS: &str =
    "id, scientific_name, common_name, kingdom, total_population, description, owner_id";

impl SpeciesService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }
}

impl SpeciesStore for SpeciesService {
    async fn list_newest_first(&self) -> StoreResult<Vec<Species>> {
        let rows = sqlx::query_as::<_, Species>(&format!(
            "SELECT {SPECIES_COLUMNS} FROM species ORDER BY id DESC"
        ))
        .fetch_all(&*self.db)
        .await?;
        debug!("fetched {} species", rows.len());
        Ok(rows)
    }

    async fn get(&self, id: i64) -> StoreResult<Species> {
        sqlx::query_as::<_, Species>(&format!(
            "SELECT {SPECIES_COLUMNS} FROM species WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| not_found_or(err, id))
    }

    async fn insert(&self, owner_id: &str, input: &SpeciesInput) -> StoreResult<Species> {
        let created = sqlx::query_as::<_, Species>(&format!(
            r#"
            INSERT INTO species (
                scientific_name, common_name, kingdom, total_population, description, owner_id
            ) VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {SPECIES_COLUMNS}
            "#
        ))
        .bind(&input.scientific_name)
        .bind(input.common_name.as_deref())
        .bind(input.kingdom.as_str())
        .bind(input.total_population)
        .bind(input.description.as_deref())
        .bind(owner_id)
        .fetch_one(&*self.db)
        .await?;
        debug!(id = created.id, owner = owner_id, "inserted species");
        Ok(created)
    }

    async fn update(&self, id: i64, input: &SpeciesInput) -> StoreResult<Species> {
        let updated = sqlx::query_as::<_, Species>(&format!(
            r#"
            UPDATE species SET
                scientific_name = ?,
                common_name = ?,
                kingdom = ?,
                total_population = ?,
                description = ?
            WHERE id = ?
            RETURNING {SPECIES_COLUMNS}
            "#
        ))
        .bind(&input.scientific_name)
        .bind(input.common_name.as_deref())
        .bind(input.kingdom.as_str())
        .bind(input.total_population)
        .bind(input.description.as_deref())
        .bind(id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| not_found_or(err, id))?;
        debug!(id, "updated species");
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM species WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(id, "deleted species");
        Ok(())
    }
}

fn not_found_or(err: sqlx::Error, id: i64) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound(id),
        other => StoreError::Sqlx(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::test_pool, models::species::Kingdom};

    fn input(name: &str, common: Option<&str>, kingdom: Kingdom) -> SpeciesInput {
        SpeciesInput {
            scientific_name: name.into(),
            common_name: common.map(Into::into),
            kingdom,
            total_population: None,
            description: None,
        }
    }

    async fn service() -> SpeciesService {
        SpeciesService::new(Arc::new(test_pool().await))
    }

    #[tokio::test]
    async fn list_is_ordered_by_id_descending() {
        let svc = service().await;
        let oak = svc
            .insert("alice", &input("Quercus alba", Some("White Oak"), Kingdom::Plantae))
            .await
            .unwrap();
        let lion = svc
            .insert("bob", &input("Panthera leo", Some("Lion"), Kingdom::Animalia))
            .await
            .unwrap();
        assert!(lion.id > oak.id);

        let ids: Vec<i64> = svc
            .list_newest_first()
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![lion.id, oak.id]);
    }

    #[tokio::test]
    async fn insert_records_owner_and_kingdom() {
        let svc = service().await;
        let created = svc
            .insert("alice", &input("Amanita muscaria", None, Kingdom::Fungi))
            .await
            .unwrap();
        let fetched = svc.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.owner_id, "alice");
        assert_eq!(fetched.kingdom, Kingdom::Fungi);
        assert_eq!(fetched.common_name, None);
    }

    #[tokio::test]
    async fn update_overwrites_field_set_but_keeps_owner() {
        let svc = service().await;
        let created = svc
            .insert("alice", &input("Quercus alba", Some("White Oak"), Kingdom::Plantae))
            .await
            .unwrap();

        let mut changed = input("Quercus alba", None, Kingdom::Plantae);
        changed.total_population = Some(500);
        changed.description = Some("Deciduous".into());
        let updated = svc.update(created.id, &changed).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.owner_id, "alice");
        assert_eq!(updated.common_name, None);
        assert_eq!(updated.total_population, Some(500));
        assert_eq!(svc.get(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn missing_ids_report_not_found() {
        let svc = service().await;
        let probe = input("Ghost", None, Kingdom::Archaea);
        assert!(matches!(svc.get(99).await, Err(StoreError::NotFound(99))));
        assert!(matches!(
            svc.update(99, &probe).await,
            Err(StoreError::NotFound(99))
        ));
        assert!(matches!(svc.delete(99).await, Err(StoreError::NotFound(99))));
    }

    #[tokio::test]
    async fn deleted_ids_are_never_reused() {
        let svc = service().await;
        let first = svc
            .insert("alice", &input("Escherichia coli", None, Kingdom::Bacteria))
            .await
            .unwrap();
        svc.delete(first.id).await.unwrap();
        let second = svc
            .insert("alice", &input("Bacillus subtilis", None, Kingdom::Bacteria))
            .await
            .unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn schema_rejects_non_positive_population() {
        let svc = service().await;
        let mut bad = input("Panthera leo", None, Kingdom::Animalia);
        bad.total_population = Some(0);
        let err = svc.insert("alice", &bad).await.expect_err("check constraint");
        assert!(matches!(err, StoreError::Sqlx(_)));
    }
}
