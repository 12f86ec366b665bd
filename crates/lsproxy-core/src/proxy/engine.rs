//! Per-session proxy engine.
//!
//! Runs one accepted client connection end to end: populate the
//! session's workspace cache, spawn the wrapped language server inside
//! it, then pump messages in both directions with URIs translated to
//! the receiving side's viewpoint. Each direction is a sequential
//! read-translate-write loop, so arrival order within a direction is
//! preserved; the two directions run concurrently.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::cache::{FileSync, WorkspaceCache};
use crate::config::{ProxyConfig, ServerCommand};
use crate::error::{Error, Result};
use crate::proxy::transport::{MessageReader, MessageWriter};
use crate::session::Session;

/// Which way a pipeline carries messages.
#[derive(Debug, Clone, Copy)]
enum Direction {
    ClientToServer,
    ServerToClient,
}

/// Drive one client connection until either side disconnects.
///
/// The cache is populated before the server is spawned and before any
/// message is forwarded; teardown stops message acceptance first, then
/// removes the cache.
///
/// # Errors
///
/// Returns an error if cache population or the server spawn fails, or
/// if a pipeline fails for a reason other than a normal disconnect.
pub async fn run_session(
    stream: TcpStream,
    config: Arc<ProxyConfig>,
    cache: Arc<WorkspaceCache>,
    sync: Arc<dyn FileSync>,
) -> Result<()> {
    let session = Arc::new(Session::new(cache));
    info!(session = %session.id(), "session started");

    // Teardown runs on every exit path; a startup failure must not
    // leak the cache directory.
    let result = drive(stream, &config, &session, sync.as_ref()).await;

    session.shutdown().await;
    debug!(session = %session.id(), "session ended");

    match result {
        Err(Error::Disconnected) => {
            info!(session = %session.id(), "peer disconnected");
            Ok(())
        }
        other => other,
    }
}

/// Startup and message pumping, separated from teardown.
async fn drive(
    stream: TcpStream,
    config: &ProxyConfig,
    session: &Arc<Session>,
    sync: &dyn FileSync,
) -> Result<()> {
    session.populate(&config.sync_globs, sync).await?;

    let mut child = spawn_server(&config.server, session.cache_dir())?;
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| Error::Protocol("server stdin unavailable".to_string()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Protocol("server stdout unavailable".to_string()))?;

    let (client_read, client_write) = stream.into_split();

    let inbound = pump(
        MessageReader::new(client_read),
        MessageWriter::new(stdin),
        Arc::clone(session),
        Direction::ClientToServer,
    );
    let outbound = pump(
        MessageReader::new(stdout),
        MessageWriter::new(client_write),
        Arc::clone(session),
        Direction::ServerToClient,
    );

    // Either pipeline ending ends the session; the other is dropped.
    tokio::select! {
        r = inbound => r,
        r = outbound => r,
    }
}

/// One ordered pipeline: read, translate, forward, repeat.
async fn pump<R, W>(
    mut reader: MessageReader<R>,
    mut writer: MessageWriter<W>,
    session: Arc<Session>,
    direction: Direction,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let mut message = reader.receive().await?;
        match direction {
            Direction::ClientToServer => session.translate_to_server(&mut message)?,
            Direction::ServerToClient => session.translate_to_client(&mut message)?,
        }
        writer.send(&message).await?;
    }
}

/// Spawn the wrapped language server rooted in the session cache.
///
/// The child is killed when its handle is dropped, which ties its
/// lifetime to the session.
fn spawn_server(server: &ServerCommand, cwd: &Path) -> Result<Child> {
    info!(command = %server.command, args = ?server.args, "spawning language server");

    Command::new(&server.command)
        .args(&server.args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| Error::ServerSpawnFailed {
            command: server.command.clone(),
            source: e,
        })
}
