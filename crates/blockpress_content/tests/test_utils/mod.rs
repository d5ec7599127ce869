//! Shared test doubles for the content crate.

#![allow(dead_code, unused_imports)]

pub mod mock_gateway;

pub use mock_gateway::{MockFetcher, MockGateway, MockPersister};
