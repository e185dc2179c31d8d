//! In-process Redis look-alike for tests.
//!
//! Speaks just enough RESP for this workspace: `PING`, `AUTH`, `SELECT`,
//! `GET`, `SET`, `DEL`, `EXISTS`, `KEYS`. State lives behind the server
//! handle so tests can seed and inspect the key space directly, require a
//! password, refuse writes, or sever live connections to exercise the
//! borrow-time health check.

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

const NIL_REPLY: &str = "$-1\r\n";

/// A Redis server on an ephemeral loopback port, shut down on drop.
pub struct MockRedis {
    addr: SocketAddr,
    state: Arc<ServerState>,
    accept_thread: Option<JoinHandle<()>>,
}

struct ServerState {
    data: Mutex<HashMap<String, String>>,
    password: Option<String>,
    reject_writes: AtomicBool,
    shutdown: AtomicBool,
    accepted: AtomicUsize,
    selected_db: Mutex<Option<i64>>,
    live: Mutex<Vec<TcpStream>>,
}

impl MockRedis {
    /// Start a server that accepts every client.
    pub fn start() -> io::Result<MockRedis> {
        Self::spawn(None)
    }

    /// Start a server that refuses commands until `AUTH password` succeeds.
    pub fn start_with_password(password: &str) -> io::Result<MockRedis> {
        Self::spawn(Some(password.to_string()))
    }

    fn spawn(password: Option<String>) -> io::Result<MockRedis> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let state = Arc::new(ServerState {
            data: Mutex::new(HashMap::new()),
            password,
            reject_writes: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            accepted: AtomicUsize::new(0),
            selected_db: Mutex::new(None),
            live: Mutex::new(Vec::new()),
        });
        let accept_state = Arc::clone(&state);
        let accept_thread = std::thread::spawn(move || accept_loop(listener, accept_state));
        Ok(MockRedis {
            addr,
            state,
            accept_thread: Some(accept_thread),
        })
    }

    /// `host:port` to hand to a client.
    pub fn endpoint(&self) -> String {
        self.addr.to_string()
    }

    /// Current value under `key`, if any.
    pub fn value(&self, key: &str) -> Option<String> {
        self.state.data.lock().unwrap().get(key).cloned()
    }

    /// Seed a key directly, bypassing the wire.
    pub fn insert(&self, key: &str, value: &str) {
        self.state
            .data
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn key_count(&self) -> usize {
        self.state.data.lock().unwrap().len()
    }

    /// Connections accepted since the server started.
    pub fn connections_accepted(&self) -> usize {
        self.state.accepted.load(Ordering::SeqCst)
    }

    /// Database index from the most recent `SELECT`, if any client sent one.
    pub fn selected_db(&self) -> Option<i64> {
        *self.state.selected_db.lock().unwrap()
    }

    /// When set, `SET` is refused with a READONLY error.
    pub fn reject_writes(&self, reject: bool) {
        self.state.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Close every live client connection at the server side.
    pub fn sever_connections(&self) {
        let mut live = self.state.live.lock().unwrap();
        for stream in live.drain(..) {
            let _ = stream.shutdown(Shutdown::Both);
        }
    }
}

impl Drop for MockRedis {
    fn drop(&mut self) {
        self.state.shutdown.store(true, Ordering::SeqCst);
        // Wake the accept loop so it observes the flag.
        let _ = TcpStream::connect(self.addr);
        self.sever_connections();
        if let Some(handle) = self.accept_thread.take() {
            let _ = handle.join();
        }
    }
}

fn accept_loop(listener: TcpListener, state: Arc<ServerState>) {
    for stream in listener.incoming() {
        if state.shutdown.load(Ordering::SeqCst) {
            break;
        }
        let stream = match stream {
            Ok(stream) => stream,
            Err(_) => continue,
        };
        state.accepted.fetch_add(1, Ordering::SeqCst);
        if let Ok(clone) = stream.try_clone() {
            state.live.lock().unwrap().push(clone);
        }
        let conn_state = Arc::clone(&state);
        std::thread::spawn(move || {
            let _ = serve_connection(stream, conn_state);
        });
    }
}

fn serve_connection(stream: TcpStream, state: Arc<ServerState>) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;
    let mut authed = state.password.is_none();
    while let Some(args) = read_command(&mut reader)? {
        if args.is_empty() {
            continue;
        }
        let command = args[0].to_ascii_uppercase();
        if command == "QUIT" {
            writer.write_all(b"+OK\r\n")?;
            break;
        }
        let reply = dispatch(&state, &command, &args[1..], &mut authed);
        writer.write_all(reply.as_bytes())?;
        writer.flush()?;
    }
    Ok(())
}

fn dispatch(state: &ServerState, command: &str, args: &[String], authed: &mut bool) -> String {
    if !*authed && command != "AUTH" {
        return error_reply("NOAUTH Authentication required.");
    }
    match command {
        "PING" => simple_reply("PONG"),
        "AUTH" => {
            // Clients may send `AUTH password` or `AUTH username password`.
            let supplied = args.last().map(String::as_str);
            match (&state.password, supplied) {
                (Some(expected), Some(given)) if given == expected => {
                    *authed = true;
                    simple_reply("OK")
                }
                (Some(_), _) => error_reply(
                    "WRONGPASS invalid username-password pair or user is disabled.",
                ),
                (None, _) => error_reply("ERR Client sent AUTH, but no password is set."),
            }
        }
        "SELECT" => {
            *state.selected_db.lock().unwrap() = args.first().and_then(|db| db.parse().ok());
            simple_reply("OK")
        }
        // Accept client metadata chatter (CLIENT SETINFO and friends).
        "CLIENT" => simple_reply("OK"),
        "GET" => match args.first() {
            Some(key) => match state.data.lock().unwrap().get(key) {
                Some(value) => bulk_reply(value),
                None => NIL_REPLY.to_string(),
            },
            None => error_reply("ERR wrong number of arguments for 'get' command"),
        },
        "SET" => {
            if state.reject_writes.load(Ordering::SeqCst) {
                return error_reply("READONLY You can't write against a read only replica.");
            }
            match (args.first(), args.get(1)) {
                (Some(key), Some(value)) => {
                    state
                        .data
                        .lock()
                        .unwrap()
                        .insert(key.clone(), value.clone());
                    simple_reply("OK")
                }
                _ => error_reply("ERR wrong number of arguments for 'set' command"),
            }
        }
        "DEL" => {
            let mut data = state.data.lock().unwrap();
            let removed = args
                .iter()
                .filter(|key| data.remove(key.as_str()).is_some())
                .count();
            integer_reply(removed as i64)
        }
        "EXISTS" => {
            let data = state.data.lock().unwrap();
            let found = args.iter().filter(|key| data.contains_key(key.as_str())).count();
            integer_reply(found as i64)
        }
        "KEYS" => {
            let pattern = args.first().map(String::as_str).unwrap_or("*");
            let data = state.data.lock().unwrap();
            let mut matches: Vec<&String> =
                data.keys().filter(|key| glob_match(pattern, key)).collect();
            matches.sort();
            array_reply(&matches)
        }
        other => error_reply(&format!("ERR unknown command '{other}'")),
    }
}

/// Read one RESP command (an array of bulk strings). `Ok(None)` on a clean
/// disconnect.
fn read_command(reader: &mut BufReader<TcpStream>) -> io::Result<Option<Vec<String>>> {
    let mut header = String::new();
    if reader.read_line(&mut header)? == 0 {
        return Ok(None);
    }
    let count: usize = match header.trim_end().strip_prefix('*') {
        Some(count) => count.parse().map_err(|_| malformed("array header"))?,
        // Inline commands are not part of what the redis client sends.
        None => return Err(malformed("command header")),
    };
    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        let mut len_line = String::new();
        if reader.read_line(&mut len_line)? == 0 {
            return Ok(None);
        }
        let len: usize = match len_line.trim_end().strip_prefix('$') {
            Some(len) => len.parse().map_err(|_| malformed("bulk length"))?,
            None => return Err(malformed("bulk header")),
        };
        let mut buf = vec![0u8; len + 2];
        reader.read_exact(&mut buf)?;
        buf.truncate(len);
        args.push(String::from_utf8_lossy(&buf).into_owned());
    }
    Ok(Some(args))
}

fn malformed(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("malformed RESP {what}"))
}

fn simple_reply(text: &str) -> String {
    format!("+{text}\r\n")
}

fn error_reply(text: &str) -> String {
    format!("-{text}\r\n")
}

fn integer_reply(value: i64) -> String {
    format!(":{value}\r\n")
}

fn bulk_reply(text: &str) -> String {
    format!("${}\r\n{}\r\n", text.len(), text)
}

fn array_reply(items: &[&String]) -> String {
    let mut out = format!("*{}\r\n", items.len());
    for item in items {
        out.push_str(&bulk_reply(item));
    }
    out
}

/// Redis-style glob: `*` matches any run, `?` matches one character.
fn glob_match(pattern: &str, text: &str) -> bool {
    match_bytes(pattern.as_bytes(), text.as_bytes())
}

fn match_bytes(pattern: &[u8], text: &[u8]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some((b'*', rest)) => (0..=text.len()).any(|skip| match_bytes(rest, &text[skip..])),
        Some((b'?', rest)) => match text.split_first() {
            Some((_, text_rest)) => match_bytes(rest, text_rest),
            None => false,
        },
        Some((expected, rest)) => match text.split_first() {
            Some((actual, text_rest)) => expected == actual && match_bytes(rest, text_rest),
            None => false,
        },
    }
}
