// songsmith_service: serves nonsense songs over HTTP.
//
// A client asks for a rhyme scheme in the query string and gets back JSON
// lines of nonsense that fit it. The word pool and its rhyme tables are built
// once at startup and shared read-only by every worker.
//
// Module overview:
// - `request.rs`:  Query parsing and routing. Pure functions from a request
//                  line to a status and JSON body, so they test without a
//                  socket.
// - `server.rs`:   `tiny_http` listener and the worker threads that drive
//                  `request.rs`.
// - `message.rs`:  Serde types for the response bodies.
//
// The service runs as a standalone binary (`main.rs`) or embedded via the
// library API (`start_service`).

pub mod message;
pub mod request;
pub mod server;

pub use server::{ServiceConfig, ServiceHandle, start_service};
