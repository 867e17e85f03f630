use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

use super::*;

/// One-shot stub service: accepts a single connection on an ephemeral
/// port and hands the stream to `handler`.
fn spawn_stub<F>(handler: F) -> (String, JoinHandle<()>)
where
    F: FnOnce(&mut TcpStream) + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap().to_string();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        handler(&mut stream);
    });
    (address, handle)
}

/// An endpoint nothing is listening on: bind, note the port, close.
fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().to_string()
}

fn accept_hello(stream: &mut TcpStream) -> u32 {
    match read_message(stream).unwrap() {
        ServiceRequest::Hello { cluster } => {
            write_message(stream, &ServiceResponse::HelloAck).unwrap();
            cluster
        }
        other => panic!("expected Hello, got {other:?}"),
    }
}

fn reject_all(stream: &mut TcpStream) {
    match read_message(stream).unwrap() {
        ServiceRequest::CreateTransfers(transfers) => {
            let results: Vec<TransferResult> = (0..transfers.len() as u32)
                .map(|index| TransferResult {
                    index,
                    reason: tally_protocol::RejectReason::IdMustNotBeZero,
                })
                .collect();
            write_message(stream, &ServiceResponse::TransferResults(results)).unwrap();
        }
        other => panic!("expected CreateTransfers, got {other:?}"),
    }
}

fn synthetic_batch(len: usize) -> Batch {
    let mut builder = Batch::builder(len);
    for _ in 0..len {
        builder
            .push(tally_protocol::Transfer {
                id: 0,
                debit_account_id: 0,
                credit_account_id: 0,
                amount: 10,
                ledger: 1,
                code: 1,
            })
            .unwrap();
    }
    builder.build()
}

#[test]
fn connect_performs_handshake_and_submits_batches() {
    let (address, handle) = spawn_stub(|stream| {
        let cluster = accept_hello(stream);
        assert_eq!(cluster, 0);
        reject_all(stream);
    });

    let mut client = Client::connect(&[address], 0).unwrap();
    let results = client.create_transfers(&synthetic_batch(3)).unwrap();

    assert_eq!(results.len(), 3);
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.index, i as u32);
    }

    drop(client);
    handle.join().unwrap();
}

#[test]
fn connect_falls_through_unreachable_endpoints() {
    let (address, handle) = spawn_stub(|stream| {
        accept_hello(stream);
    });

    let endpoints = vec![dead_endpoint(), address];
    let client = Client::connect(&endpoints, 0).unwrap();

    drop(client);
    handle.join().unwrap();
}

#[test]
fn connect_fails_when_no_endpoint_is_reachable() {
    let endpoints = vec![dead_endpoint(), dead_endpoint()];

    let err = Client::connect(&endpoints, 0).unwrap_err();
    match err {
        ClientError::NoEndpoint { tried } => assert_eq!(tried, endpoints),
        other => panic!("expected NoEndpoint, got {other:?}"),
    }
}

#[test]
fn handshake_rejection_does_not_fall_through() {
    let (address, handle) = spawn_stub(|stream| {
        let _: ServiceRequest = read_message(stream).unwrap();
        write_message(
            stream,
            &ServiceResponse::Error("cluster unavailable".to_string()),
        )
        .unwrap();
    });

    let err = Client::connect(&[address], 7).unwrap_err();
    match err {
        ClientError::HandshakeRejected { cluster, reason } => {
            assert_eq!(cluster, 7);
            assert_eq!(reason, "cluster unavailable");
        }
        other => panic!("expected HandshakeRejected, got {other:?}"),
    }
    handle.join().unwrap();
}

#[test]
fn service_error_response_surfaces_as_client_error() {
    let (address, handle) = spawn_stub(|stream| {
        accept_hello(stream);
        let _: ServiceRequest = read_message(stream).unwrap();
        write_message(stream, &ServiceResponse::Error("overloaded".to_string())).unwrap();
    });

    let mut client = Client::connect(&[address], 0).unwrap();
    let err = client.create_transfers(&synthetic_batch(1)).unwrap_err();
    assert!(matches!(err, ClientError::Service(msg) if msg == "overloaded"));

    drop(client);
    handle.join().unwrap();
}
