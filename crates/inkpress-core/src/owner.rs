//! Resource ownership.
//!
//! Every protected resource records the user that created it. Access
//! control asks a resource for its owner through the [`Owned`] trait rather
//! than through ad-hoc closures, so the ownership rule is spelled out once
//! per resource type.
//!
//! # Example
//!
//! ```
//! use inkpress_core::{ArticleId, Owned, UserId};
//!
//! struct Article {
//!     id: ArticleId,
//!     author_id: UserId,
//!     title: String,
//! }
//!
//! impl Owned for Article {
//!     fn owner_id(&self) -> UserId {
//!         self.author_id
//!     }
//! }
//!
//! let author = UserId::new();
//! let article = Article {
//!     id: ArticleId::new(),
//!     author_id: author,
//!     title: "Hello".to_string(),
//! };
//!
//! assert_eq!(article.owner_id(), author);
//! # let _ = article.id;
//! # let _ = &article.title;
//! ```

use crate::ids::UserId;

/// Trait for resources that belong to a specific user.
///
/// Object-safe, so it can be used behind `&dyn Owned` where a handler only
/// needs the owner for an access decision.
pub trait Owned {
    /// Returns the id of the user that owns this resource.
    fn owner_id(&self) -> UserId;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::CommentId;

    struct Comment {
        #[allow(dead_code)]
        id: CommentId,
        author_id: UserId,
    }

    impl Owned for Comment {
        fn owner_id(&self) -> UserId {
            self.author_id
        }
    }

    #[test]
    fn owner_id_returns_recorded_owner() {
        let author = UserId::new();
        let comment = Comment {
            id: CommentId::new(),
            author_id: author,
        };
        assert_eq!(comment.owner_id(), author);
    }

    #[test]
    fn usable_as_trait_object() {
        let author = UserId::new();
        let comment = Comment {
            id: CommentId::new(),
            author_id: author,
        };
        let owned: &dyn Owned = &comment;
        assert_eq!(owned.owner_id(), author);
    }
}
