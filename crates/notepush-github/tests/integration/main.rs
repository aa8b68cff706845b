//! Integration tests for notepush-github
//!
//! Uses wiremock to simulate the GitHub contents API and verifies
//! end-to-end behavior of the client, the contents operations, and the
//! `IRemoteStore` implementation.

mod common;

mod test_contents;
mod test_remote_store;
