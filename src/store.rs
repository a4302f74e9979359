use async_trait::async_trait;

use crate::error::Result;

mod dir;
pub use dir::DirStore;

mod s3;
pub use s3::S3Store;

/// Destination of backup objects.
///
/// Writing the same key twice with the same body leaves the same object
/// behind, so callers may retry `put_object` freely.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()>;
}

#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Box<T> {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        (**self).put_object(key, body).await
    }
}
