use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use super::MessagingPlatform;
use super::error::SlackError;
use super::types::{
    Block, CompleteUploadBody, CompleteUploadRequest, Envelope, FileInfo, FileInfoBody, FileRef,
    MessageRef, PostMessageRequest, UpdateMessageRequest, UploadUrlBody, UploadedFile,
};
use crate::log_debug;

const API_URL: &str = "https://slack.com/api/";

/// Slack Web API client authenticated with a bot token
pub struct SlackClient {
    token: String,
    client: Client,
    base_url: Url,
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    pub fn new(token: impl Into<String>) -> Result<Self, SlackError> {
        Self::with_base_url(token, API_URL)
    }

    /// Point the client at another API root, e.g. a mock server in tests.
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Result<Self, SlackError> {
        let mut base_url = Url::parse(base_url)?;
        // `Url::join` drops the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            token: token.into(),
            client,
            base_url,
        })
    }

    fn method_url(&self, method: &str) -> Result<Url, SlackError> {
        Ok(self.base_url.join(method)?)
    }

    async fn read_response<T: DeserializeOwned>(
        method: &str,
        response: reqwest::Response,
    ) -> Result<T, SlackError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SlackError::Status {
                method: method.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        if !envelope.ok {
            return Err(SlackError::Api {
                method: method.to_string(),
                error: envelope
                    .error
                    .unwrap_or_else(|| "unknown_error".to_string()),
            });
        }

        envelope.body.ok_or_else(|| SlackError::MalformedResponse {
            method: method.to_string(),
        })
    }

    async fn post_json<B, T>(&self, method: &str, body: &B) -> Result<T, SlackError>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        log_debug!("Calling Slack method {}", method);
        let response = self
            .client
            .post(self.method_url(method)?)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        Self::read_response(method, response).await
    }

    /// Reserve an upload slot and push `bytes` to it, returning the file id
    async fn stage_file(&self, filename: &str, bytes: Vec<u8>) -> Result<String, SlackError> {
        let length = bytes.len().to_string();

        let method = "files.getUploadURLExternal";
        log_debug!("Calling Slack method {} for {}", method, filename);
        let response = self
            .client
            .post(self.method_url(method)?)
            .bearer_auth(&self.token)
            .form(&[("filename", filename), ("length", length.as_str())])
            .send()
            .await?;
        let slot: UploadUrlBody = Self::read_response(method, response).await?;

        let response = self
            .client
            .post(&slot.upload_url)
            .bearer_auth(&self.token)
            .body(bytes)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SlackError::Status {
                method: "file upload".to_string(),
                status: response.status().as_u16(),
            });
        }

        log_debug!("Staged {} as {}", filename, slot.file_id);
        Ok(slot.file_id)
    }
}

/// Read every file up front so a bad entry fails the batch before Slack sees any of it
async fn read_artifacts(files: &[PathBuf]) -> Result<Vec<(String, Vec<u8>)>, SlackError> {
    let mut payloads = Vec::with_capacity(files.len());
    for path in files {
        let file_error = |source| SlackError::File {
            path: path.display().to_string(),
            source,
        };
        let metadata = tokio::fs::metadata(path).await.map_err(file_error)?;
        if !metadata.is_file() {
            return Err(SlackError::NotAFile {
                path: path.display().to_string(),
            });
        }
        let bytes = tokio::fs::read(path).await.map_err(file_error)?;
        payloads.push((file_name(path), bytes));
    }
    Ok(payloads)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

#[async_trait]
impl MessagingPlatform for SlackClient {
    async fn upload_files(
        &self,
        channel_id: &str,
        title: Option<&str>,
        files: &[PathBuf],
    ) -> Result<Vec<UploadedFile>, SlackError> {
        let payloads = read_artifacts(files).await?;

        let mut staged = Vec::with_capacity(payloads.len());
        for (name, bytes) in payloads {
            staged.push((self.stage_file(&name, bytes).await?, name));
        }

        let request = CompleteUploadRequest {
            files: staged
                .iter()
                .map(|(id, name)| FileRef { id, title: name })
                .collect(),
            channel_id,
            initial_comment: title,
        };
        let body: CompleteUploadBody = self
            .post_json("files.completeUploadExternal", &request)
            .await?;
        Ok(body.files)
    }

    async fn file_info(&self, file_id: &str) -> Result<FileInfo, SlackError> {
        let method = "files.info";
        let response = self
            .client
            .get(self.method_url(method)?)
            .bearer_auth(&self.token)
            .query(&[("file", file_id)])
            .send()
            .await?;
        let body: FileInfoBody = Self::read_response(method, response).await?;
        Ok(body.file)
    }

    async fn post_message(
        &self,
        channel_id: &str,
        thread_ts: Option<&str>,
        text: &str,
        blocks: &[Block],
    ) -> Result<MessageRef, SlackError> {
        let request = PostMessageRequest {
            channel: channel_id,
            thread_ts,
            text,
            blocks,
        };
        self.post_json("chat.postMessage", &request).await
    }

    async fn update_message(
        &self,
        channel_id: &str,
        ts: &str,
        text: &str,
        blocks: &[Block],
    ) -> Result<MessageRef, SlackError> {
        let request = UpdateMessageRequest {
            channel: channel_id,
            ts,
            text,
            blocks,
        };
        self.post_json("chat.update", &request).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = SlackClient::with_base_url("xoxb-test", "http://localhost:9999/api").unwrap();
        assert_eq!(
            client.method_url("files.info").unwrap().as_str(),
            "http://localhost:9999/api/files.info"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            SlackClient::with_base_url("xoxb-test", "not a url"),
            Err(SlackError::Url(_))
        ));
    }

    #[test]
    fn debug_output_hides_the_token() {
        let client = SlackClient::new("xoxb-secret").unwrap();
        assert!(!format!("{client:?}").contains("xoxb-secret"));
    }

    #[test]
    fn file_name_uses_last_component() {
        assert_eq!(file_name(Path::new("/tmp/dist/app.wgt")), "app.wgt");
    }
}
