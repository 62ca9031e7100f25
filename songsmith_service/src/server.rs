// HTTP listener and worker pool for the song service.
//
// Architecture: one shared `tiny_http::Server`, N worker threads.
//
// - `start_service` binds the server and spawns `workers` threads. Each
//   thread loops on `Server::recv()`, which hands every request to exactly
//   one waiting worker.
// - Workers share the `SongWriter` through an `Arc`. Its lookup tables are
//   built before the first worker starts, so no request pays for the build
//   and the writer is read-only from then on.
// - Each worker owns a `SongRng` seeded from the service seed and its worker
//   index, so no lock guards the random stream.
//
// Shutdown: `ServiceHandle::stop` clears `keep_running`, calls
// `Server::unblock()` once per worker to wake any thread blocked in `recv()`,
// and joins them all.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use log::{debug, info, warn};
use songsmith_prng::SongRng;
use songsmith_song::{ComposeConfig, SongWriter};
use tiny_http::{Header, Method, Request, Response, Server};

use crate::request::{Reply, handle_request};

/// Handle returned by `start_service` to control the running server.
pub struct ServiceHandle {
    server: Arc<Server>,
    keep_running: Arc<AtomicBool>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl ServiceHandle {
    /// Signal every worker to stop and wait for them to finish.
    pub fn stop(self) {
        self.keep_running.store(false, Ordering::SeqCst);
        for _ in &self.workers {
            self.server.unblock();
        }
        for worker in self.workers {
            let _ = worker.join();
        }
        info!("song service stopped");
    }
}

/// Configuration for starting the song service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub seed: u64,
    /// Filler syllable bounds used when a request omits them.
    pub compose: ComposeConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            workers: 4,
            seed: 0,
            compose: ComposeConfig::default(),
        }
    }
}

/// Start serving songs from `writer`. Returns a handle for stopping the
/// service and the actual bound address (useful when port 0 is used to let
/// the OS pick a free port).
pub fn start_service(
    config: ServiceConfig,
    writer: Arc<SongWriter>,
) -> io::Result<(ServiceHandle, SocketAddr)> {
    let server = Server::http((config.host.as_str(), config.port)).map_err(io::Error::other)?;
    let addr = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| io::Error::other("song service is not listening on an IP address"))?;
    let server = Arc::new(server);

    writer.ensure_built();

    let keep_running = Arc::new(AtomicBool::new(true));
    let worker_count = config.workers.max(1);
    let mut workers = Vec::with_capacity(worker_count);
    for index in 0..worker_count {
        let server = server.clone();
        let writer = writer.clone();
        let keep_running = keep_running.clone();
        let compose = config.compose.clone();
        let rng = SongRng::for_stream(config.seed, index as u64);
        let worker = thread::Builder::new()
            .name(format!("song-worker-{index}"))
            .spawn(move || run_worker(&server, &writer, &compose, rng, &keep_running))?;
        workers.push(worker);
    }
    info!("song service listening on {addr} with {worker_count} workers");

    Ok((
        ServiceHandle {
            server,
            keep_running,
            workers,
        },
        addr,
    ))
}

/// Worker loop. Runs until `keep_running` is cleared.
fn run_worker(
    server: &Server,
    writer: &SongWriter,
    compose: &ComposeConfig,
    mut rng: SongRng,
    keep_running: &AtomicBool,
) {
    while keep_running.load(Ordering::SeqCst) {
        match server.recv() {
            Ok(request) => respond(request, writer, compose, &mut rng),
            Err(e) => {
                if keep_running.load(Ordering::SeqCst) {
                    warn!("failed to receive request: {e}");
                }
            }
        }
    }
}

fn respond(request: Request, writer: &SongWriter, compose: &ComposeConfig, rng: &mut SongRng) {
    let is_get = *request.method() == Method::Get;
    let reply = handle_request(is_get, request.url(), writer, compose, rng);
    debug!("{} {} -> {}", request.method(), request.url(), reply.status);
    if let Err(e) = request.respond(into_response(reply)) {
        warn!("failed to send response: {e}");
    }
}

fn into_response(reply: Reply) -> Response<io::Cursor<Vec<u8>>> {
    Response::from_string(reply.body)
        .with_status_code(reply.status)
        .with_header(header("Content-Type", "application/json"))
        .with_header(header("Access-Control-Allow-Origin", "*"))
}

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("static header is valid")
}
