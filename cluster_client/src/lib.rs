//! Pod client implementations.
//!
//! This crate provides implementations of the `PodClient` trait:
//! - `KubePodClient`: talks to a real API server through `kube`
//! - `MockPodClient`: in-memory pods with call counters (requires `mock-client` feature)

pub mod kube_client;

#[cfg(any(test, feature = "mock-client"))]
pub mod mock;

// Re-export common types
pub use cluster_client_interface::{PodClient, PodClientError};
pub use kube_client::{KubeClientConfig, KubePodClient};

#[cfg(any(test, feature = "mock-client"))]
pub use mock::MockPodClient;
