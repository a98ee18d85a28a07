use std::fmt::Debug;
use std::future::Future;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Endpoints, Pod, Service};
use kube::api::ListParams;
use kube::{Api, Client, Resource};
use log::debug;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::istio::{DestinationRule, VirtualService};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to retrieve {resource} in namespace {namespace}: {source}")]
    Retrieval {
        resource: &'static str,
        namespace: String,
        #[source]
        source: kube::Error,
    },

    #[error("{resource} in namespace {namespace} did not have the expected shape: {source}")]
    TypeMismatch {
        resource: &'static str,
        namespace: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{resource} {name} not found in namespace {namespace}")]
    NotFound {
        resource: &'static str,
        namespace: String,
        name: String,
    },
}
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    fn from_kube(resource: &'static str, namespace: &str, name: Option<&str>, error: kube::Error) -> Self {
        match (error, name) {
            (kube::Error::Api(response), Some(name)) if response.code == 404 => Error::NotFound {
                resource,
                namespace: namespace.to_string(),
                name: name.to_string(),
            },
            (kube::Error::SerdeError(source), _) => Error::TypeMismatch {
                resource,
                namespace: namespace.to_string(),
                source,
            },
            (source, _) => Error::Retrieval {
                resource,
                namespace: namespace.to_string(),
                source,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Namespace scoped read access to the objects the correlation works on.
pub trait ObjectStore: Send + Sync {
    fn list_pods(&self, namespace: &str) -> impl Future<Output = Result<Vec<Pod>>> + Send;
    fn list_deployments(&self, namespace: &str) -> impl Future<Output = Result<Vec<Deployment>>> + Send;
    fn list_services(&self, namespace: &str) -> impl Future<Output = Result<Vec<Service>>> + Send;
    fn get_service(&self, namespace: &str, name: &str) -> impl Future<Output = Result<Service>> + Send;
    fn get_endpoints(&self, namespace: &str, service_name: &str) -> impl Future<Output = Result<Endpoints>> + Send;
    fn list_virtual_services(&self, namespace: &str) -> impl Future<Output = Result<Vec<VirtualService>>> + Send;
    fn list_destination_rules(&self, namespace: &str) -> impl Future<Output = Result<Vec<DestinationRule>>> + Send;
}

/// [`ObjectStore`] backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore {
    client: Client
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn list<K>(&self, resource: &'static str, namespace: &str) -> Result<Vec<K>>
        where K: Resource<Scope = k8s_openapi::NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
              K::DynamicType: Default
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let list = api.list(&ListParams::default())
            .await
            .map_err(|e| Error::from_kube(resource, namespace, None, e))?;

        debug!("Listed {} {resource} in namespace {namespace}.", list.items.len());
        Ok(list.items)
    }

    async fn get<K>(&self, resource: &'static str, namespace: &str, name: &str) -> Result<K>
        where K: Resource<Scope = k8s_openapi::NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
              K::DynamicType: Default
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        api.get(name)
            .await
            .map_err(|e| Error::from_kube(resource, namespace, Some(name), e))
    }
}

impl ObjectStore for KubeStore {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>> {
        self.list("pods", namespace).await
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<Deployment>> {
        self.list("deployments", namespace).await
    }

    async fn list_services(&self, namespace: &str) -> Result<Vec<Service>> {
        self.list("services", namespace).await
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service> {
        self.get("service", namespace, name).await
    }

    async fn get_endpoints(&self, namespace: &str, service_name: &str) -> Result<Endpoints> {
        self.get("endpoints", namespace, service_name).await
    }

    async fn list_virtual_services(&self, namespace: &str) -> Result<Vec<VirtualService>> {
        self.list("virtualservices", namespace).await
    }

    async fn list_destination_rules(&self, namespace: &str) -> Result<Vec<DestinationRule>> {
        self.list("destinationrules", namespace).await
    }
}
