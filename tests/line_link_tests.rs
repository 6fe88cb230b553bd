use fleetlink::relay::{AttachPolicy, RelayEvent, RelaySession};
use fleetlink::transport::in_memory::InMemoryChannel;
use fleetlink::transport::line::{
    maintain_link, read_lines, DetachedLink, LineLink, LinkEndpoint,
};
use fleetlink::transport::LinkWriter;
use fleetlink::{GameAction, RelayAction, DEBOUNCE_WINDOW, MAX_LINE_LEN};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

async fn collect_lines(input: &'static [u8]) -> Vec<String> {
    let (tx, mut rx) = mpsc::channel(16);
    read_lines(input, tx).await.unwrap();
    let mut out = Vec::new();
    while let Some(event) = rx.recv().await {
        match event {
            RelayEvent::LinkLine(line) => out.push(line),
            RelayEvent::LinkClosed => out.push("<closed>".to_string()),
            other => panic!("unexpected event {:?}", other),
        }
    }
    out
}

#[tokio::test]
async fn reader_splits_lines_and_reports_eof() {
    let lines = collect_lines(b"0\n# booted\n5\r\n4").await;
    assert_eq!(lines, vec!["0\n", "# booted\n", "5\r\n", "4", "<closed>"]);
}

#[tokio::test]
async fn reader_drops_oversized_lines_whole() {
    let mut input = vec![b'7'; MAX_LINE_LEN + 40];
    input.extend_from_slice(b"\n3\n");
    let input: &'static [u8] = Box::leak(input.into_boxed_slice());
    let lines = collect_lines(input).await;
    assert_eq!(lines, vec!["3\n", "<closed>"]);
}

#[tokio::test]
async fn reader_keeps_a_line_at_the_limit() {
    let mut input = vec![b'#'; MAX_LINE_LEN];
    input.push(b'\n');
    let input: &'static [u8] = Box::leak(input.into_boxed_slice());
    let lines = collect_lines(input).await;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].len(), MAX_LINE_LEN + 1);
}

#[tokio::test]
async fn line_link_writes_newline_framed_codes() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let controller = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let mut got = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            got.push(line);
        }
        got
    });

    let stream = TcpStream::connect(addr).await?;
    let mut link = LineLink::new(stream);
    link.send(RelayAction::Connected).await?;
    link.send(RelayAction::ReadyForGame).await?;
    link.send(RelayAction::Win).await?;
    drop(link);

    assert_eq!(controller.await?, vec!["0", "1", "3"]);
    Ok(())
}

#[tokio::test]
async fn torn_frame_is_terminated_before_the_next_one() -> anyhow::Result<()> {
    // A one-byte pipe nobody reads: the first frame stalls after "2".
    let (near, mut far) = tokio::io::duplex(1);
    let mut link = LineLink::with_timeout(near, Duration::from_millis(50));
    assert!(link.send(RelayAction::Sunk).await.is_err());

    let mut bytes = [0u8; 4];
    let (sent, read) = tokio::join!(link.send(RelayAction::Win), far.read_exact(&mut bytes));
    sent?;
    read?;
    assert_eq!(&bytes, b"2\n3\n");
    Ok(())
}

#[tokio::test]
async fn untouched_frame_needs_no_terminator() -> anyhow::Result<()> {
    let (near, mut far) = tokio::io::duplex(8);
    let mut link = LineLink::with_timeout(near, Duration::from_millis(50));
    link.send(RelayAction::Connected).await?;
    link.send(RelayAction::ReadyForGame).await?;
    let mut bytes = [0u8; 4];
    far.read_exact(&mut bytes).await?;
    assert_eq!(&bytes, b"0\n1\n");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn device_link_writes_while_the_reader_waits() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("fleetlink-device-{}", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let status = std::process::Command::new("mkfifo").arg(&path).status()?;
    assert!(status.success(), "mkfifo failed");

    let endpoint = LinkEndpoint::parse(path.to_str().unwrap())?;
    let (reader, writer) = endpoint.open().await?;
    let (tx, mut rx) = mpsc::channel(16);
    let reader_task = tokio::spawn(read_lines(reader, tx));
    // Let the reader park on the empty device first.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut link = LineLink::with_timeout(writer, Duration::from_millis(500));
    link.send(RelayAction::Connected).await?;
    match timeout(Duration::from_secs(1), rx.recv()).await? {
        Some(RelayEvent::LinkLine(line)) => assert_eq!(line, "0\n"),
        other => panic!("unexpected event {:?}", other),
    }

    reader_task.abort();
    std::fs::remove_file(&path)?;
    Ok(())
}

async fn next_event(rx: &mut mpsc::Receiver<RelayEvent>) -> RelayEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("no event in time")
        .expect("event queue closed")
}

#[tokio::test]
async fn maintained_link_reopens_after_the_stream_ends() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let endpoint = LinkEndpoint::parse(&format!("tcp://{}", listener.local_addr()?))?;
    let (tx, mut rx) = mpsc::channel(16);
    let supervisor = tokio::spawn(maintain_link(endpoint, tx, Duration::from_millis(20)));

    let (first, _) = listener.accept().await?;
    assert!(matches!(next_event(&mut rx).await, RelayEvent::LinkOpened { .. }));
    drop(first);
    assert!(matches!(next_event(&mut rx).await, RelayEvent::LinkClosed));

    let (second, _) = listener.accept().await?;
    let RelayEvent::LinkOpened { mut link } = next_event(&mut rx).await else {
        panic!("link was not reopened");
    };
    let (controller_read, mut controller_write) = second.into_split();
    let mut controller_lines = BufReader::new(controller_read).lines();
    link.send(RelayAction::Connected).await?;
    assert_eq!(controller_lines.next_line().await?.as_deref(), Some("0"));

    controller_write.write_all(b"5\n").await?;
    assert!(matches!(next_event(&mut rx).await, RelayEvent::LinkLine(l) if l == "5\n"));

    supervisor.abort();
    Ok(())
}

#[tokio::test]
async fn maintained_link_keeps_retrying_a_missing_device() {
    let endpoint = LinkEndpoint::parse("/nonexistent/fleetlink-tty").unwrap();
    let (tx, mut rx) = mpsc::channel(16);
    let supervisor = tokio::spawn(maintain_link(endpoint, tx, Duration::from_millis(10)));
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(rx.try_recv().is_err());
    assert!(!supervisor.is_finished());

    // Dropping the queue ends the retries.
    drop(rx);
    timeout(Duration::from_secs(1), supervisor)
        .await
        .expect("supervisor did not stop")
        .unwrap();
}

#[tokio::test]
async fn detached_link_always_fails() {
    let mut link = DetachedLink::new("/dev/ttyACM0");
    assert!(link.send(RelayAction::Connected).await.is_err());
    assert!(link.send(RelayAction::Sunk).await.is_err());
}

#[tokio::test]
async fn opening_a_missing_device_fails() {
    let endpoint = LinkEndpoint::parse("/nonexistent/fleetlink-tty").unwrap();
    assert!(endpoint.open().await.is_err());
}

#[test]
fn endpoint_parsing() {
    assert_eq!(
        LinkEndpoint::parse("/dev/ttyACM0").unwrap(),
        LinkEndpoint::Device("/dev/ttyACM0".into())
    );
    assert_eq!(
        LinkEndpoint::parse("tcp://127.0.0.1:7000").unwrap(),
        LinkEndpoint::Tcp("127.0.0.1:7000".into())
    );
    assert_eq!(
        LinkEndpoint::parse("tcp://127.0.0.1:7000").unwrap().to_string(),
        "tcp://127.0.0.1:7000"
    );
    assert!(LinkEndpoint::parse("").is_err());
    assert!(LinkEndpoint::parse("tcp://nohost").is_err());
    assert!(LinkEndpoint::parse("tcp://:7000").is_err());
    assert!(LinkEndpoint::parse("tcp://host:99999").is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn relay_over_tcp_link() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let endpoint = LinkEndpoint::parse(&format!("tcp://{}", listener.local_addr()?))?;

    let accept = tokio::spawn(async move { listener.accept().await.map(|(s, _)| s) });
    let (reader, writer) = endpoint.open().await?;
    let controller = accept.await??;
    let (controller_read, mut controller_write) = controller.into_split();
    let mut controller_lines = BufReader::new(controller_read).lines();

    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(read_lines(reader, tx.clone()));
    let session = RelaySession::new(
        Box::new(LineLink::new(writer)),
        DEBOUNCE_WINDOW,
        AttachPolicy::Replace,
    );
    tokio::spawn(session.run(rx));

    controller_write.write_all(b"# hello\n0\n").await?;
    assert_eq!(controller_lines.next_line().await?.as_deref(), Some("0"));

    let (channel, mut channel_rx) = InMemoryChannel::new();
    tx.send(RelayEvent::ClientAttached {
        id: 1,
        channel: Box::new(channel),
    })
    .await
    .map_err(|_| anyhow::anyhow!("session gone"))?;
    assert_eq!(controller_lines.next_line().await?.as_deref(), Some("1"));

    controller_write.write_all(b"5\n").await?;
    assert_eq!(channel_rx.recv().await, Some(GameAction::Fire));
    Ok(())
}
