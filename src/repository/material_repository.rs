use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::{Material, MaterialType},
    error::{AppError, Result},
    repository::MaterialRepository,
};

#[derive(FromRow)]
struct MaterialRow {
    id: String,
    title: String,
    description: String,
    file_path: String,
    file_type: String,
    module: String,
    created_at: NaiveDateTime,
}

pub struct SqliteMaterialRepository {
    pool: SqlitePool,
}

impl SqliteMaterialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_material(row: MaterialRow) -> Result<Material> {
        let material_type = MaterialType::parse(&row.file_type).ok_or_else(|| {
            AppError::Database(format!("Invalid material type: {}", row.file_type))
        })?;

        Ok(Material {
            id: Uuid::parse_str(&row.id).map_err(|e| AppError::Database(e.to_string()))?,
            title: row.title,
            desc: row.description,
            url: row.file_path,
            material_type,
            module: row.module,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
        })
    }
}

#[async_trait]
impl MaterialRepository for SqliteMaterialRepository {
    async fn create(&self, material: Material) -> Result<Material> {
        sqlx::query(
            r#"
            INSERT INTO materials (id, title, description, file_path, file_type, module, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(material.id.to_string())
        .bind(&material.title)
        .bind(&material.desc)
        .bind(&material.url)
        .bind(material.material_type.as_str())
        .bind(&material.module)
        .bind(material.created_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_id(material.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created material".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Material>> {
        let row = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, title, description, file_path, file_type, module, created_at
            FROM materials
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_material).transpose()
    }

    async fn list(&self) -> Result<Vec<Material>> {
        let rows = sqlx::query_as::<_, MaterialRow>(
            r#"
            SELECT id, title, description, file_path, file_type, module, created_at
            FROM materials
            ORDER BY rowid
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_material)
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM materials WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Material not found".to_string()));
        }

        Ok(())
    }
}
