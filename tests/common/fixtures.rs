//! Seed data for integration tests

use linkboard::{
    Category, CategoryStore, Page, PageStore, RealCategoryStore, RealPageStore, RealUserStore,
    UserProfile, UserStore,
};

pub async fn seed_category(store: &RealCategoryStore, name: &str, likes: u32) -> Category {
    let mut category = Category::new(name);
    category.likes = likes;
    store.add(category).await.unwrap()
}

pub async fn seed_page(
    store: &RealPageStore,
    category_slug: &str,
    title: &str,
    url: &str,
) -> Page {
    store.add(category_slug, title, url).await.unwrap()
}

pub async fn seed_user(store: &RealUserStore, username: &str, password: &str) {
    let profile = UserProfile {
        username: username.to_string(),
        website: None,
        picture: None,
    };
    store
        .register(
            username,
            &format!("{username}@example.org"),
            password,
            profile,
        )
        .await
        .unwrap();
}
