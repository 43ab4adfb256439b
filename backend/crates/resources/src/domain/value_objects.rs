//! Domain Value Objects

use derive_more::Display;

/// Stored record kinds; each has its own table and id sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum ResourceKind {
    #[display("posts")]
    Post,
    #[display("comments")]
    Comment,
    #[display("products")]
    Product,
    #[display("orders")]
    Order,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Post,
        ResourceKind::Comment,
        ResourceKind::Product,
        ResourceKind::Order,
    ];

    /// Table name in the database
    pub const fn table(&self) -> &'static str {
        match self {
            ResourceKind::Post => "posts",
            ResourceKind::Comment => "comments",
            ResourceKind::Product => "products",
            ResourceKind::Order => "orders",
        }
    }
}

/// Pointer from one record to another that must exist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub kind: ResourceKind,
    pub id: i64,
}

impl Reference {
    pub fn new(kind: ResourceKind, id: impl Into<i64>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}
