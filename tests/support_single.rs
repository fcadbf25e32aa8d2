use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    accepted: Arc<AtomicUsize>,
}

impl ServerHandle {
    /// Number of connections accepted so far.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server that answers every request with `status`.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server(status: u16) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let accepted = Arc::new(AtomicUsize::new(0));
    let accepted_counter = Arc::clone(&accepted);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    accepted_counter.fetch_add(1, Ordering::SeqCst);
                    thread::spawn(move || handle_client(stream, status));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}/service", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            accepted,
        },
    ))
}

fn handle_client(mut stream: TcpStream, status: u16) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    if read_request(&mut stream).is_none() {
        return;
    }
    let response = format!(
        "HTTP/1.1 {} Test\r\nContent-Length: 5\r\nConnection: close\r\n\r\n<ok/>",
        status
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Reads one request head and its `Content-Length` body.
fn read_request(stream: &mut TcpStream) -> Option<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos.saturating_add(4);
        }
        let read = stream.read(&mut chunk).ok().filter(|read| *read > 0)?;
        buffer.extend_from_slice(chunk.get(..read)?);
    };
    let head = String::from_utf8_lossy(buffer.get(..header_end)?).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let request_end = header_end.saturating_add(content_length);
    while buffer.len() < request_end {
        let read = stream.read(&mut chunk).ok().filter(|read| *read > 0)?;
        buffer.extend_from_slice(chunk.get(..read)?);
    }
    buffer.get(header_end..request_end).map(<[u8]>::to_vec)
}

/// Run the `soapcharge` binary inside `dir` and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_soapcharge<I, S>(dir: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = soapcharge_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "error")
        .env_remove("SOAPCHARGE_LOG")
        .output()
        .map_err(|err| format!("run soapcharge failed: {}", err))
}

fn soapcharge_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_soapcharge").map_or_else(
        || Err("CARGO_BIN_EXE_soapcharge missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
