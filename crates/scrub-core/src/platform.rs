//! Platform capability trait
//!
//! The remote service the processor reads comments from and mutates.
//! Authentication happens when an implementation is constructed; the
//! resulting handle is exposed through [`CommentPlatform::identity`].

use crate::comment::Comment;
use crate::error::Result;
use crate::types::{CommentId, Identity};

/// Capability surface consumed by the comment processor
pub trait CommentPlatform {
    /// The authenticated account
    fn identity(&self) -> &Identity;

    /// Every comment authored by `user`, most recent first
    fn list_comments(&self, user: &Identity) -> Result<Vec<Comment>>;

    /// Overwrite a comment's body
    fn edit(&self, id: &CommentId, text: &str) -> Result<()>;

    /// Remove a comment
    fn delete(&self, id: &CommentId) -> Result<()>;
}

impl<P: CommentPlatform + ?Sized> CommentPlatform for &P {
    fn identity(&self) -> &Identity {
        (**self).identity()
    }

    fn list_comments(&self, user: &Identity) -> Result<Vec<Comment>> {
        (**self).list_comments(user)
    }

    fn edit(&self, id: &CommentId, text: &str) -> Result<()> {
        (**self).edit(id, text)
    }

    fn delete(&self, id: &CommentId) -> Result<()> {
        (**self).delete(id)
    }
}
