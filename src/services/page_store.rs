//! Page store implementation

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::traits::PageStore;
use crate::types::Page;

/// In-memory page store with store-assigned ids.
#[derive(Clone, Default)]
pub struct RealPageStore {
    pages: Arc<RwLock<HashMap<u64, Page>>>,
    next_id: Arc<AtomicU64>,
}

impl RealPageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PageStore for RealPageStore {
    async fn add(&self, category_slug: &str, title: &str, url: &str) -> AppResult<Page> {
        let page = Page {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            category_slug: category_slug.to_string(),
            title: title.to_string(),
            url: url.to_string(),
            views: 0,
        };

        info!(id = page.id, category = %category_slug, "page added");
        let mut pages = self.pages.write().await;
        pages.insert(page.id, page.clone());
        Ok(page)
    }

    async fn for_category(&self, category_slug: &str) -> AppResult<Vec<Page>> {
        let pages = self.pages.read().await;
        let mut matching: Vec<Page> = pages
            .values()
            .filter(|page| page.category_slug == category_slug)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn top_by_views(&self, limit: usize) -> AppResult<Vec<Page>> {
        let pages = self.pages.read().await;
        let mut ranked: Vec<Page> = pages.values().cloned().collect();
        ranked.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.id.cmp(&b.id)));
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn record_click(&self, id: u64) -> AppResult<Option<String>> {
        let mut pages = self.pages.write().await;
        match pages.get_mut(&id) {
            Some(page) => {
                page.views += 1;
                debug!(id, views = page.views, "click-through recorded");
                Ok(Some(page.url.clone()))
            }
            None => Ok(None),
        }
    }
}
