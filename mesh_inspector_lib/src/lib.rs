//! Correlation of Kubernetes objects that are only linked through labels and
//! endpoint references: which deployments back a service, and which pods an
//! endpoints object points at.

pub mod correlate;
pub mod details;
pub mod endpoints;
pub mod istio;
pub mod labels;
pub mod store;

#[cfg(test)]
mod fixtures;

pub use correlate::correlate;
pub use details::{namespace_overview, service_details, ServiceDetails, ServiceOverview};
pub use endpoints::resolve_pods;
pub use store::{Error, KubeStore, ObjectStore, Result};
