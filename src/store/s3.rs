use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use log::debug;

use crate::error::{Error, Result};

use super::ObjectStore;

const OP_PUT_OBJECT: &str = "s3:PutObject";
const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(config: &SdkConfig, bucket: impl Into<String>) -> Self {
        Self::from_client(Client::new(config), bucket)
    }

    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let len = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(CONTENT_TYPE_JSON)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| Error::from_sdk(OP_PUT_OBJECT, e))?;

        debug!("wrote s3://{}/{} ({} bytes)", self.bucket, key, len);
        Ok(())
    }
}
