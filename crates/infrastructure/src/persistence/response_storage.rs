//! Response body files.
//!
//! Each run owns one file, `response_<session id>`, in the response
//! directory. Bodies are streamed to disk chunk by chunk; gzip-encoded
//! bodies are inflated on the way.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use courier_application::ports::{
    ResponseDescriptor, ResponseStorage, StorageError, StoredResponse,
};
use flate2::write::GzDecoder;
use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Stores response bodies as files in one directory.
#[derive(Debug, Clone)]
pub struct FileResponseStorage {
    dir: PathBuf,
}

impl FileResponseStorage {
    /// Creates a storage writing into `dir`. The directory is created on
    /// first use.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a storage in the platform cache directory, falling back to
    /// the system temp directory.
    #[must_use]
    pub fn in_cache_dir() -> Self {
        let base = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
        Self::new(base.join("courier").join("responses"))
    }

    /// Returns the directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file used for `session_id`.
    #[must_use]
    pub fn file_for(&self, session_id: &str) -> PathBuf {
        let safe: String = session_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("response_{safe}"))
    }

    /// Deletes the file of `session_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub async fn clear(&self, session_id: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.file_for(session_id)).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Writes a chunk, inflating it first when a decoder is present.
async fn write_chunk(
    file: &mut File,
    decoder: Option<&mut GzDecoder<Vec<u8>>>,
    chunk: &[u8],
) -> Result<u64, StorageError> {
    let bytes = match decoder {
        Some(decoder) => {
            decoder
                .write_all(chunk)
                .map_err(|e| StorageError::Decode(e.to_string()))?;
            std::mem::take(decoder.get_mut())
        }
        None => chunk.to_vec(),
    };
    file.write_all(&bytes).await?;
    Ok(u64::try_from(bytes.len()).unwrap_or(u64::MAX))
}

#[async_trait]
impl ResponseStorage for FileResponseStorage {
    async fn store(
        &self,
        session_id: &str,
        response: ResponseDescriptor,
        finish_normally_on_timeout: bool,
    ) -> Result<StoredResponse, StorageError> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.file_for(session_id);
        let mut file = File::create(&path).await?;

        let mut decoder = response.is_gzipped().then(|| GzDecoder::new(Vec::new()));
        let ResponseDescriptor {
            status,
            headers,
            mut body,
        } = response;

        let mut size = 0;
        let mut truncated = false;
        let mut received = false;
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => {
                    received |= !chunk.is_empty();
                    size += write_chunk(&mut file, decoder.as_mut(), &chunk).await?;
                }
                Err(e) if e.is_timeout() && finish_normally_on_timeout => {
                    warn!(session_id, size, "body timed out, keeping partial response");
                    truncated = true;
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        // HEAD, 204 and 304 replies may label an empty body as gzip.
        if let Some(mut decoder) = decoder.filter(|_| received) {
            if !truncated {
                decoder
                    .try_finish()
                    .map_err(|e| StorageError::Decode(e.to_string()))?;
            }
            let rest = std::mem::take(decoder.get_mut());
            file.write_all(&rest).await?;
            size += u64::try_from(rest.len()).unwrap_or(u64::MAX);
        }
        file.flush().await?;

        debug!(session_id, status, size, path = %path.display(), "stored response");
        Ok(StoredResponse {
            status,
            headers,
            path,
            size,
            truncated,
        })
    }
}
