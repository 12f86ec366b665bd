//! Base-protocol message framing.
//!
//! Both sides of the proxy speak the LSP header-content format:
//! ```text
//! Content-Length: 123\r\n
//! \r\n
//! {"jsonrpc":"2.0",...}
//! ```
//! The reader and writer are generic over the stream halves so the same
//! codec serves the client socket and the wrapped server's stdio.

use std::collections::HashMap;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{trace, warn};

use crate::error::{Error, Result};

/// Reads framed messages from one half of a connection.
#[derive(Debug)]
pub struct MessageReader<R> {
    inner: BufReader<R>,
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    /// Wrap a readable stream half.
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
        }
    }

    /// Receive the next message as a decoded payload tree.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The peer closes the stream ([`Error::Disconnected`])
    /// - The Content-Length header is missing or invalid
    /// - The body is not valid UTF-8 or JSON
    pub async fn receive(&mut self) -> Result<Value> {
        let headers = self.read_headers().await?;

        let content_length = headers
            .get("content-length")
            .ok_or_else(|| Error::Protocol("missing Content-Length header".to_string()))?
            .parse::<usize>()
            .map_err(|e| Error::Protocol(format!("invalid Content-Length: {e}")))?;

        let content = self.read_content(content_length).await?;
        trace!(len = content_length, "received message");

        Ok(serde_json::from_str(&content)?)
    }

    /// Read headers until the blank line.
    async fn read_headers(&mut self) -> Result<HashMap<String, String>> {
        let mut headers = HashMap::new();
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = self.inner.read_line(&mut line).await?;

            // read_line returns 0 bytes on EOF.
            if bytes_read == 0 || line.is_empty() {
                return Err(Error::Disconnected);
            }

            if line == "\r\n" || line == "\n" {
                break;
            }

            if let Some((key, value)) = line.trim_end().split_once(':') {
                headers.insert(key.trim().to_lowercase(), value.trim().to_string());
            } else {
                warn!("malformed header: {}", line.trim());
            }
        }

        Ok(headers)
    }

    /// Read exactly `length` body bytes.
    async fn read_content(&mut self, length: usize) -> Result<String> {
        let mut buffer = vec![0u8; length];
        self.inner.read_exact(&mut buffer).await?;

        String::from_utf8(buffer)
            .map_err(|e| Error::Protocol(format!("invalid UTF-8 in content: {e}")))
    }
}

/// Writes framed messages to one half of a connection.
#[derive(Debug)]
pub struct MessageWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> MessageWriter<W> {
    /// Wrap a writable stream half.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Send one message with its Content-Length header.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn send(&mut self, message: &Value) -> Result<()> {
        let content = serde_json::to_string(message)?;
        let header = format!("Content-Length: {}\r\n\r\n", content.len());

        trace!(len = content.len(), "sending message");

        self.inner.write_all(header.as_bytes()).await?;
        self.inner.write_all(content.as_bytes()).await?;
        self.inner.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_send_receive_round_trip() {
        let (a, b) = tokio::io::duplex(4096);
        let mut writer = MessageWriter::new(a);
        let mut reader = MessageReader::new(b);

        let message = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "textDocument/definition",
            "params": {"textDocument": {"uri": "file:///a.rs"}}
        });

        writer.send(&message).await.unwrap();
        let received = reader.receive().await.unwrap();
        assert_eq!(received, message);
    }

    #[tokio::test]
    async fn test_receive_sequence_preserves_order() {
        let (a, b) = tokio::io::duplex(4096);
        let mut writer = MessageWriter::new(a);
        let mut reader = MessageReader::new(b);

        for id in 0..3 {
            writer.send(&json!({"id": id})).await.unwrap();
        }
        for id in 0..3 {
            let received = reader.receive().await.unwrap();
            assert_eq!(received["id"], id);
        }
    }

    #[tokio::test]
    async fn test_eof_reports_disconnect() {
        let (a, b) = tokio::io::duplex(64);
        drop(a);
        let mut reader = MessageReader::new(b);
        assert!(matches!(reader.receive().await, Err(Error::Disconnected)));
    }

    #[tokio::test]
    async fn test_missing_content_length_is_protocol_error() {
        let (mut a, b) = tokio::io::duplex(256);
        a.write_all(b"Content-Type: application/json\r\n\r\n")
            .await
            .unwrap();
        let mut reader = MessageReader::new(b);
        assert!(matches!(reader.receive().await, Err(Error::Protocol(_))));
    }

    #[test]
    fn test_header_format() {
        let content = serde_json::to_string(&json!({"jsonrpc": "2.0"})).unwrap();
        let header = format!("Content-Length: {}\r\n\r\n", content.len());
        assert!(header.starts_with("Content-Length:"));
        assert!(header.ends_with("\r\n\r\n"));
    }
}
