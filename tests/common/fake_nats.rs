// Copyright (c) 2025 - Cowboy AI, Inc.
//! Minimal in-process NATS server
//!
//! Speaks just enough of the text protocol for `async_nats` to finish its
//! handshake (INFO, CONNECT, PING/PONG) and to publish. It accepts a single
//! connection and then stops listening, so a client that loses the
//! connection can never reconnect.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

pub struct FakeNatsServer {
    pub url: String,
    /// Subjects of every `PUB` received, in order
    pub published: mpsc::UnboundedReceiver<String>,
    hangup: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl FakeNatsServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (published_tx, published) = mpsc::unbounded_channel();
        let (hangup_tx, mut hangup_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(listener);

            let (read, mut write) = socket.into_split();
            let mut lines = BufReader::new(read).lines();

            let info = format!(
                "INFO {{\"server_id\":\"fake\",\"server_name\":\"fake\",\"version\":\"2.10.0\",\
                 \"go\":\"go1.21\",\"host\":\"127.0.0.1\",\"port\":{port},\"headers\":true,\
                 \"max_payload\":1048576,\"proto\":1}}\r\n"
            );
            write.write_all(info.as_bytes()).await.unwrap();

            loop {
                tokio::select! {
                    _ = &mut hangup_rx => return,
                    line = lines.next_line() => {
                        let Ok(Some(line)) = line else { return };
                        if line.starts_with("PING") {
                            if write.write_all(b"PONG\r\n").await.is_err() {
                                return;
                            }
                        } else if let Some(rest) = line.strip_prefix("PUB ") {
                            if let Some(subject) = rest.split_whitespace().next() {
                                let _ = published_tx.send(subject.to_string());
                            }
                        }
                    }
                }
            }
        });

        Self {
            url: format!("nats://127.0.0.1:{port}"),
            published,
            hangup: Some(hangup_tx),
            task,
        }
    }

    /// Close the client connection. The listener is already gone, so the
    /// client's reconnect attempts are refused.
    pub async fn hang_up(&mut self) {
        if let Some(hangup) = self.hangup.take() {
            let _ = hangup.send(());
        }
        let _ = (&mut self.task).await;
    }
}
