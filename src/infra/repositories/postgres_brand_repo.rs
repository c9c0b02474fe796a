use crate::domain::{models::brand::Brand, ports::BrandRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBrandRepo {
    pool: PgPool,
}

impl PostgresBrandRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BrandRepository for PostgresBrandRepo {
    async fn create(&self, brand: &Brand) -> Result<Brand, AppError> {
        sqlx::query_as::<_, Brand>(
            "INSERT INTO brands (id, owner_id, name, slug, is_active, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&brand.id).bind(&brand.owner_id).bind(&brand.name)
            .bind(&brand.slug).bind(brand.is_active).bind(brand.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Brand>, AppError> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Brand>, AppError> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE slug = $1")
            .bind(slug).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Brand>, AppError> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE is_active = true ORDER BY created_at ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
