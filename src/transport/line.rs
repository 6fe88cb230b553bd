//! Newline-framed character stream to the controller.
//!
//! The link is a serial device, or a TCP socket for serial-over-network
//! bridges. Port settings such as baud rate belong to the deployment, not to
//! this crate.

use std::fmt;
use std::path::PathBuf;

use log::{debug, error, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Duration};

use crate::config::ConfigError;
use crate::protocol::{encode_link_action, RelayAction, MAX_LINE_LEN};
use crate::relay::RelayEvent;
use crate::transport::LinkWriter;

/// Default timeout for a single write to the controller.
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(2);

pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Where the controller link lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEndpoint {
    /// Character device such as `/dev/ttyACM0`.
    Device(PathBuf),
    /// `tcp://host:port`.
    Tcp(String),
}

impl LinkEndpoint {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ConfigError::InvalidLinkEndpoint(raw.into()));
        }
        match raw.strip_prefix("tcp://") {
            Some(addr) if addr.rsplit_once(':').is_some_and(|(host, port)| {
                !host.is_empty() && port.parse::<u16>().is_ok()
            }) =>
            {
                Ok(LinkEndpoint::Tcp(addr.into()))
            }
            Some(_) => Err(ConfigError::InvalidLinkEndpoint(raw.into())),
            None => Ok(LinkEndpoint::Device(PathBuf::from(raw))),
        }
    }

    /// Open the endpoint and split it into read and write halves.
    pub async fn open(&self) -> anyhow::Result<(BoxedReader, BoxedWriter)> {
        match self {
            #[cfg(unix)]
            LinkEndpoint::Device(path) => {
                let (r, w) = crate::transport::device::open(path)
                    .map_err(|e| anyhow::anyhow!("Cannot open {}: {}", path.display(), e))?;
                Ok((Box::new(r), Box::new(w)))
            }
            #[cfg(not(unix))]
            LinkEndpoint::Device(path) => Err(anyhow::anyhow!(
                "Cannot open {}: device links need a unix host",
                path.display()
            )),
            LinkEndpoint::Tcp(addr) => {
                let stream = TcpStream::connect(addr.as_str())
                    .await
                    .map_err(|e| anyhow::anyhow!("Cannot connect to {}: {}", addr, e))?;
                let (r, w) = stream.into_split();
                Ok((Box::new(r), Box::new(w)))
            }
        }
    }
}

impl fmt::Display for LinkEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkEndpoint::Device(path) => write!(f, "{}", path.display()),
            LinkEndpoint::Tcp(addr) => write!(f, "tcp://{}", addr),
        }
    }
}

/// Writes relay actions to the controller as `"<code>\n"`.
pub struct LineLink<W> {
    writer: W,
    write_timeout: Duration,
    /// A previous write stopped partway through a frame.
    torn_frame: bool,
}

impl<W: AsyncWrite + Send + Unpin> LineLink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_timeout(writer, DEFAULT_WRITE_TIMEOUT)
    }

    pub fn with_timeout(writer: W, write_timeout: Duration) -> Self {
        Self {
            writer,
            write_timeout,
            torn_frame: false,
        }
    }
}

#[async_trait::async_trait]
impl<W: AsyncWrite + Send + Unpin> LinkWriter for LineLink<W> {
    async fn send(&mut self, action: RelayAction) -> anyhow::Result<()> {
        // Terminate a torn frame first so it reads as one bad line instead of
        // merging with this one.
        let mut frame = String::new();
        if self.torn_frame {
            frame.push('\n');
        }
        frame.push_str(&encode_link_action(action));
        let bytes = frame.as_bytes();

        let mut written = 0;
        let writer = &mut self.writer;
        let write_op = async {
            while written < bytes.len() {
                let n = writer.write(&bytes[written..]).await?;
                if n == 0 {
                    return Err(std::io::Error::from(std::io::ErrorKind::WriteZero));
                }
                written += n;
            }
            writer.flush().await
        };
        let result = timeout(self.write_timeout, write_op).await;
        self.torn_frame = written > 0 && written < bytes.len();
        if self.torn_frame {
            debug!("controller frame torn after {} of {} bytes", written, bytes.len());
        }
        result
            .map_err(|_| anyhow::anyhow!("Write timeout after {:?}", self.write_timeout))?
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::BrokenPipe
                    || e.kind() == std::io::ErrorKind::ConnectionReset
                {
                    anyhow::anyhow!("Connection closed by peer")
                } else {
                    anyhow::anyhow!("Write error: {}", e)
                }
            })
    }
}

/// Stand-in used when the link could not be opened; every write fails.
pub struct DetachedLink {
    endpoint: String,
}

impl DetachedLink {
    pub fn new(endpoint: impl fmt::Display) -> Self {
        Self {
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl LinkWriter for DetachedLink {
    async fn send(&mut self, action: RelayAction) -> anyhow::Result<()> {
        Err(anyhow::anyhow!(
            "Controller link {} is not open, dropping {:?}",
            self.endpoint,
            action
        ))
    }
}

/// Read lines from the controller and queue them for the session until the
/// stream ends or the session goes away. Lines longer than
/// [`MAX_LINE_LEN`] are discarded whole.
pub async fn read_lines<R>(reader: R, events: mpsc::Sender<RelayEvent>) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::with_capacity(MAX_LINE_LEN + 1);
    let mut discarding = false;
    let result = loop {
        buf.clear();
        let n = match (&mut reader)
            .take(MAX_LINE_LEN as u64 + 1)
            .read_until(b'\n', &mut buf)
            .await
        {
            Ok(n) => n,
            Err(e) => break Err(anyhow::anyhow!("Read error: {}", e)),
        };
        if n == 0 {
            break Ok(());
        }
        let terminated = buf.last() == Some(&b'\n');
        if discarding {
            discarding = !terminated;
            continue;
        }
        if !terminated && buf.len() > MAX_LINE_LEN {
            warn!("controller line exceeds {} bytes, dropping it", MAX_LINE_LEN);
            discarding = true;
            continue;
        }
        let line = String::from_utf8_lossy(&buf).into_owned();
        if events.send(RelayEvent::LinkLine(line)).await.is_err() {
            debug!("relay session gone, stopping link reader");
            return Ok(());
        }
    };
    let _ = events.send(RelayEvent::LinkClosed).await;
    result
}

/// Keep the controller link open for the lifetime of the session.
///
/// Each successful open hands the write half to the session as
/// [`RelayEvent::LinkOpened`] and reads lines until the stream ends. Failed
/// opens and closed streams are retried after `retry_delay`. Returns once the
/// session queue is gone.
pub async fn maintain_link(
    endpoint: LinkEndpoint,
    events: mpsc::Sender<RelayEvent>,
    retry_delay: Duration,
) {
    let mut failures = 0u32;
    loop {
        match endpoint.open().await {
            Ok((reader, writer)) => {
                info!("Controller link open on {}", endpoint);
                failures = 0;
                let link = Box::new(LineLink::new(writer));
                if events.send(RelayEvent::LinkOpened { link }).await.is_err() {
                    return;
                }
                if let Err(e) = read_lines(reader, events.clone()).await {
                    warn!("controller link reader stopped: {}", e);
                }
            }
            Err(e) if failures == 0 => {
                error!("{}, retrying every {:?}", e, retry_delay);
                failures += 1;
            }
            Err(e) => {
                debug!("{} (attempt {})", e, failures + 1);
                failures = failures.saturating_add(1);
            }
        }
        if events.is_closed() {
            return;
        }
        sleep(retry_delay).await;
    }
}
