//! Startup Seeding
//!
//! Demo users and records. Each part is only written when it is missing, so
//! running the seed on every start is safe.

use std::sync::Arc;

use auth::application::{SignUpInput, SignUpUseCase};
use auth::domain::value_object::email::Email;
use auth::{AppError, AppResult, AuthConfig, User, UserRepository, UserRole};
use resources::{Comment, DocumentRepository, Order, Post, Product, ResourceService};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const USER_EMAIL: &str = "user@example.com";

/// Records written by one seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub products: usize,
    pub posts: usize,
    pub comments: usize,
    pub orders: usize,
}

pub struct Seeder<U, S>
where
    U: UserRepository,
    S: DocumentRepository,
{
    users: Arc<U>,
    auth_config: Arc<AuthConfig>,
    resources: ResourceService<S>,
}

impl<U, S> Seeder<U, S>
where
    U: UserRepository + Send + Sync,
    S: DocumentRepository + Send + Sync,
{
    pub fn new(users: Arc<U>, auth_config: Arc<AuthConfig>, resources: ResourceService<S>) -> Self {
        Self {
            users,
            auth_config,
            resources,
        }
    }

    pub async fn run(&self, password: &str) -> AppResult<SeedReport> {
        let mut report = SeedReport::default();

        let (admin, created) = self
            .ensure_user("Admin", ADMIN_EMAIL, UserRole::Admin, password)
            .await?;
        report.users += usize::from(created);
        let (user, created) = self
            .ensure_user("User", USER_EMAIL, UserRole::User, password)
            .await?;
        report.users += usize::from(created);

        if self.resources.count::<Product>().await? == 0 {
            let products = self
                .resources
                .create_many(&[Product::new("Widget", 9.99), Product::new("Gadget", 19.99)])
                .await?;
            report.products = products.len();
        }

        if self.resources.count::<Post>().await? == 0 {
            let posts = self
                .resources
                .create_many(&[
                    Post {
                        title: "Welcome".to_string(),
                        body: "Hello world".to_string(),
                        user_id: Some(admin.id),
                    },
                    Post {
                        title: "Second".to_string(),
                        body: "Another post".to_string(),
                        user_id: Some(user.id),
                    },
                ])
                .await?;
            report.posts = posts.len();

            if let Some(first) = posts.first() {
                let comments = self
                    .resources
                    .create_many(&[Comment {
                        text: "Nice!".to_string(),
                        post_id: first.id,
                        user_id: Some(user.id),
                    }])
                    .await?;
                report.comments = comments.len();
            }
        }

        if self.resources.count::<Order>().await? == 0 {
            let orders = self
                .resources
                .create_many(&[Order {
                    total: 29.99,
                    user_id: Some(user.id),
                }])
                .await?;
            report.orders = orders.len();
        }

        tracing::info!(
            users = report.users,
            products = report.products,
            posts = report.posts,
            comments = report.comments,
            orders = report.orders,
            "Seed completed"
        );

        Ok(report)
    }

    /// Look a user up by email, creating it when absent
    async fn ensure_user(
        &self,
        name: &str,
        email: &str,
        role: UserRole,
        password: &str,
    ) -> AppResult<(User, bool)> {
        let address = Email::new(email).map_err(|e| AppError::internal(e.to_string()))?;
        if let Some(existing) = self.users.find_by_email(&address).await? {
            return Ok((existing, false));
        }

        let created = SignUpUseCase::new(self.users.clone(), self.auth_config.clone())
            .execute(SignUpInput {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role,
            })
            .await?;

        Ok((created, true))
    }
}
