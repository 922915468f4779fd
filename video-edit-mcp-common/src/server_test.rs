//! Tests for the server builder plumbing.

use crate::server::{shutdown_channel, ServerError};

#[test]
fn shutdown_channel_delivers() {
    let (tx, rx) = shutdown_channel();
    tx.send(()).unwrap();
    assert!(rx.blocking_recv().is_ok());
}

#[test]
fn shutdown_channel_closes_on_drop() {
    let (tx, rx) = shutdown_channel();
    drop(tx);
    // A dropped sender still resolves the receiver, which is what the
    // builder relies on for shutdown.
    assert!(rx.blocking_recv().is_err());
}

#[test]
fn server_error_messages() {
    let err = ServerError::BindFailed {
        port: 8080,
        message: "address in use".to_string(),
    };
    let msg = err.to_string();
    assert!(msg.contains("8080"));
    assert!(msg.contains("address in use"));

    let err = ServerError::Transport("peer hung up".to_string());
    assert!(err.to_string().contains("peer hung up"));
}

#[test]
fn server_error_from_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
    let err: ServerError = io_err.into();
    assert!(matches!(err, ServerError::Io(_)));
}
