use std::net::{Shutdown, TcpStream};

use log::{debug, info, warn};
use tally_protocol::codec::{CodecError, read_message, write_message};
use tally_protocol::{Batch, ServiceRequest, ServiceResponse, TransferResult};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no reachable endpoint among {tried:?}")]
    NoEndpoint { tried: Vec<String> },
    #[error("service refused the session for cluster {cluster}: {reason}")]
    HandshakeRejected { cluster: u32, reason: String },
    #[error("service reported an error: {0}")]
    Service(String),
    #[error("unexpected response to {operation}")]
    UnexpectedResponse { operation: &'static str },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// The one operation the benchmark driver needs from a connection.
/// Kept as a trait so the trial loop can run against a stub service in
/// tests.
pub trait SubmitTransfers {
    /// Submit `batch` and block until the per-entry outcomes arrive.
    fn create_transfers(&mut self, batch: &Batch) -> Result<Vec<TransferResult>, ClientError>;
}

/// Synchronous client holding one exclusive connection to the accounting
/// service. The connection is shut down when the client is dropped, on
/// every exit path.
#[derive(Debug)]
pub struct Client {
    stream: TcpStream,
}

impl Client {
    /// Try each `host:port` endpoint in order and open a session on the
    /// first one that accepts a TCP connection. A reachable endpoint that
    /// rejects the handshake fails the connect; only transport-level
    /// failures fall through to the next endpoint.
    pub fn connect(addresses: &[String], cluster: u32) -> Result<Self, ClientError> {
        for address in addresses {
            let stream = match TcpStream::connect(address.as_str()) {
                Ok(stream) => stream,
                Err(err) => {
                    warn!("endpoint {address} unreachable: {err}");
                    continue;
                }
            };

            // Batches are small and latency is what we measure.
            if let Err(err) = stream.set_nodelay(true) {
                debug!("failed to set TCP_NODELAY on {address}: {err}");
            }

            let mut client = Client { stream };
            client.handshake(cluster)?;
            info!("connected to {address} (cluster {cluster})");
            return Ok(client);
        }

        Err(ClientError::NoEndpoint {
            tried: addresses.to_vec(),
        })
    }

    fn handshake(&mut self, cluster: u32) -> Result<(), ClientError> {
        write_message(&mut self.stream, &ServiceRequest::Hello { cluster })?;

        match read_message(&mut self.stream)? {
            ServiceResponse::HelloAck => Ok(()),
            ServiceResponse::Error(reason) => {
                Err(ClientError::HandshakeRejected { cluster, reason })
            }
            _ => Err(ClientError::UnexpectedResponse {
                operation: "hello",
            }),
        }
    }
}

impl SubmitTransfers for Client {
    fn create_transfers(&mut self, batch: &Batch) -> Result<Vec<TransferResult>, ClientError> {
        let request = ServiceRequest::CreateTransfers(batch.entries().to_vec());
        write_message(&mut self.stream, &request)?;

        match read_message(&mut self.stream)? {
            ServiceResponse::TransferResults(results) => Ok(results),
            ServiceResponse::Error(reason) => Err(ClientError::Service(reason)),
            _ => Err(ClientError::UnexpectedResponse {
                operation: "create_transfers",
            }),
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        // Closing the write half tells the service the session is over;
        // the socket itself is released with the stream.
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
