//! Minimal RESP2 server for exercising the Redis store over a real socket.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

#[derive(Default)]
struct State {
    sets: Mutex<HashMap<String, HashSet<String>>>,
    expires: Mutex<Vec<(String, String)>>,
    connections: AtomicUsize,
    drop_first_after_lookup: bool,
}

pub struct FakeRedis {
    pub url: String,
    state: Arc<State>,
}

impl FakeRedis {
    /// Serve SISMEMBER/SADD/EXPIRE; everything else answers `+OK`.
    pub async fn spawn() -> Self {
        Self::start(false).await
    }

    /// Like `spawn`, but the first connection is closed right after it
    /// answers its first SISMEMBER.
    pub async fn spawn_flaky() -> Self {
        Self::start(true).await
    }

    async fn start(drop_first_after_lookup: bool) -> Self {
        let state = Arc::new(State {
            drop_first_after_lookup,
            ..State::default()
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let st = state.clone();
        tokio::spawn(async move {
            while let Ok((sock, _)) = listener.accept().await {
                let n = st.connections.fetch_add(1, Ordering::SeqCst) + 1;
                tokio::spawn(serve_conn(sock, st.clone(), n));
            }
        });

        Self {
            url: format!("redis://{addr}"),
            state,
        }
    }

    pub fn seed(&self, set: &str, member: &str) {
        self.state
            .sets
            .lock()
            .unwrap()
            .entry(set.to_string())
            .or_default()
            .insert(member.to_string());
    }

    pub fn contains(&self, set: &str, member: &str) -> bool {
        self.state
            .sets
            .lock()
            .unwrap()
            .get(set)
            .is_some_and(|s| s.contains(member))
    }

    /// `(key, seconds)` of every EXPIRE received.
    pub fn expires(&self) -> Vec<(String, String)> {
        self.state.expires.lock().unwrap().clone()
    }

    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }
}

/// Accepts connections and never reads or writes a byte.
pub async fn spawn_silent() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((sock, _)) = listener.accept().await {
            held.push(sock);
        }
    });
    format!("redis://{addr}")
}

async fn serve_conn(sock: TcpStream, state: Arc<State>, conn_no: usize) {
    let (rd, mut wr) = sock.into_split();
    let mut rd = BufReader::new(rd);

    while let Some(args) = read_command(&mut rd).await {
        let cmd = args.first().map(|c| c.to_ascii_uppercase()).unwrap_or_default();
        let reply = match (cmd.as_str(), args.as_slice()) {
            ("SISMEMBER", [_, set, member]) => {
                let hit = state
                    .sets
                    .lock()
                    .unwrap()
                    .get(set)
                    .is_some_and(|s| s.contains(member));
                if hit { ":1\r\n" } else { ":0\r\n" }
            }
            ("SADD", [_, set, member]) => {
                state
                    .sets
                    .lock()
                    .unwrap()
                    .entry(set.clone())
                    .or_default()
                    .insert(member.clone());
                ":1\r\n"
            }
            ("EXPIRE", [_, set, secs]) => {
                state.expires.lock().unwrap().push((set.clone(), secs.clone()));
                ":1\r\n"
            }
            _ => "+OK\r\n",
        };
        if wr.write_all(reply.as_bytes()).await.is_err() {
            return;
        }
        if cmd == "SISMEMBER" && state.drop_first_after_lookup && conn_no == 1 {
            return;
        }
    }
}

async fn read_command<R: AsyncBufRead + Unpin>(rd: &mut R) -> Option<Vec<String>> {
    let mut line = String::new();
    if rd.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let n: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

    let mut args = Vec::with_capacity(n);
    for _ in 0..n {
        line.clear();
        rd.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;
        let mut buf = vec![0u8; len + 2];
        rd.read_exact(&mut buf).await.ok()?;
        buf.truncate(len);
        args.push(String::from_utf8(buf).ok()?);
    }
    Some(args)
}
