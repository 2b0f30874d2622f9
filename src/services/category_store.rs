//! Category store implementation

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::traits::CategoryStore;
use crate::types::Category;

/// In-memory category store keyed by slug.
#[derive(Clone, Default)]
pub struct RealCategoryStore {
    categories: Arc<RwLock<HashMap<String, Category>>>,
}

impl RealCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl CategoryStore for RealCategoryStore {
    async fn add(&self, category: Category) -> AppResult<Category> {
        let mut categories = self.categories.write().await;
        if categories.contains_key(&category.slug) {
            return Err(AppError::DuplicateCategory {
                name: category.name,
            });
        }

        info!(slug = %category.slug, "category added");
        categories.insert(category.slug.clone(), category.clone());
        Ok(category)
    }

    async fn by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(slug).cloned())
    }

    async fn record_view(&self, slug: &str) -> AppResult<Option<Category>> {
        let mut categories = self.categories.write().await;
        Ok(categories.get_mut(slug).map(|category| {
            category.views += 1;
            category.clone()
        }))
    }

    async fn top_by_likes(&self, limit: usize) -> AppResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut ranked: Vec<Category> = categories.values().cloned().collect();
        ranked.sort_by(|a, b| b.likes.cmp(&a.likes).then_with(|| a.name.cmp(&b.name)));
        ranked.truncate(limit);
        Ok(ranked)
    }
}
