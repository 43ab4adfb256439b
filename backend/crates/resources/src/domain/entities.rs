//! Resource Entities

use kernel::id::{CommentId, OrderId, PostId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::domain::resource::Resource;
use crate::domain::value_objects::{Reference, ResourceKind};
use crate::error::{ResourceError, ResourceResult};

fn required(field: &str, value: String) -> ResourceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ResourceError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn non_negative(field: &str, value: f64) -> ResourceResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ResourceError::Validation(format!(
            "{field} must be a non-negative number"
        )))
    }
}

// ============================================================================
// Post
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    pub body: String,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl Resource for Post {
    const KIND: ResourceKind = ResourceKind::Post;
    type Key = PostId;
    type Draft = PostDraft;

    fn from_draft(draft: PostDraft, author: Option<UserId>) -> ResourceResult<Self> {
        Ok(Self {
            title: required("title", draft.title)?,
            body: required("body", draft.body)?,
            user_id: author.or(draft.user_id),
        })
    }
}

// ============================================================================
// Comment
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    pub post_id: PostId,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub text: String,
    pub post_id: PostId,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl Resource for Comment {
    const KIND: ResourceKind = ResourceKind::Comment;
    type Key = CommentId;
    type Draft = CommentDraft;

    fn from_draft(draft: CommentDraft, author: Option<UserId>) -> ResourceResult<Self> {
        Ok(Self {
            text: required("text", draft.text)?,
            post_id: draft.post_id,
            user_id: author.or(draft.user_id),
        })
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference::new(ResourceKind::Post, self.post_id)]
    }
}

// ============================================================================
// Product
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

impl Resource for Product {
    const KIND: ResourceKind = ResourceKind::Product;
    type Key = ProductId;
    type Draft = Product;

    fn from_draft(draft: Product, _author: Option<UserId>) -> ResourceResult<Self> {
        Ok(Self {
            name: required("name", draft.name)?,
            price: non_negative("price", draft.price)?,
        })
    }
}

// ============================================================================
// Order
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub total: f64,
    pub user_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub total: f64,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl Resource for Order {
    const KIND: ResourceKind = ResourceKind::Order;
    type Key = OrderId;
    type Draft = OrderDraft;

    fn from_draft(draft: OrderDraft, author: Option<UserId>) -> ResourceResult<Self> {
        Ok(Self {
            total: non_negative("total", draft.total)?,
            user_id: author.or(draft.user_id),
        })
    }
}
