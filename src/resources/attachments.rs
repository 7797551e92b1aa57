//! Attachment downloads

use crate::services::session::Session;
use crate::services::validator::Rules;
use crate::utils::error::CrmResult;
use tracing::debug;

pub const DOWNLOAD_PATH: &str = "/download/";

/// Raw file downloads
#[derive(Debug, Clone, Copy)]
pub struct Attachments<'a> {
    session: &'a Session,
}

impl<'a> Attachments<'a> {
    pub(crate) fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Download an attachment as raw bytes
    ///
    /// `file` is either the attachment name from a note (fetched under
    /// `/download/`) or an absolute path on the account host.
    pub async fn download(&self, file: &str) -> CrmResult<Vec<u8>> {
        Rules::new("Attachment").required("file", file).finish()?;

        let path = download_path(file);
        let bytes = self.session.get_raw(&path).await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), path);
        Ok(bytes)
    }
}

fn download_path(file: &str) -> String {
    if file.starts_with('/') {
        file.to_string()
    } else {
        format!("{}{}", DOWNLOAD_PATH, file)
    }
}
