use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Endpoints, Pod, Service};
use kube::api::ObjectMeta;
use kube::ResourceExt;
use log::{info, warn};
use serde::Serialize;

use crate::correlate::correlate;
use crate::endpoints::resolve_pods;
use crate::istio::{filter_destination_rules, filter_virtual_services, DestinationRule, VirtualService};
use crate::store::{ObjectStore, Result};

/// Everything known about one service, gathered from a single namespace snapshot.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    pub service: Service,
    pub endpoints: Endpoints,
    /// Pods behind the service's endpoints, in endpoint order.
    pub pods: Vec<Pod>,
    pub deployments: Vec<Deployment>,
    pub virtual_services: Vec<VirtualService>,
    pub destination_rules: Vec<DestinationRule>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServiceOverview {
    pub name: String,
    pub deployments: Vec<String>,
}

pub async fn service_details<S: ObjectStore>(store: &S, namespace: &str, service_name: &str) -> Result<ServiceDetails> {

    let service = store.get_service(namespace, service_name).await?;
    let (pods, deployments, endpoints, virtual_services, destination_rules) = futures::try_join!(
        store.list_pods(namespace),
        store.list_deployments(namespace),
        endpoints_or_empty(store, namespace, service_name),
        store.list_virtual_services(namespace),
        store.list_destination_rules(namespace),
    )?;

    let details = ServiceDetails {
        pods: resolve_pods(&endpoints, &pods).into_iter().cloned().collect(),
        deployments: correlate(&service, &pods, &deployments).into_iter().cloned().collect(),
        virtual_services: filter_virtual_services(&service, &virtual_services).into_iter().cloned().collect(),
        destination_rules: filter_destination_rules(&service, &destination_rules).into_iter().cloned().collect(),
        service,
        endpoints,
    };

    info!("Service {service_name} in {namespace}: {} pods, {} deployments, {} virtual services, {} destination rules.",
        details.pods.len(),
        details.deployments.len(),
        details.virtual_services.len(),
        details.destination_rules.len()
    );
    Ok(details)
}

/// Names of the deployments correlated with every service of `namespace`.
pub async fn namespace_overview<S: ObjectStore>(store: &S, namespace: &str) -> Result<Vec<ServiceOverview>> {

    let (services, pods, deployments) = futures::try_join!(
        store.list_services(namespace),
        store.list_pods(namespace),
        store.list_deployments(namespace),
    )?;

    let overview = services.iter()
        .map(|service| ServiceOverview {
            name: service.name_any(),
            deployments: correlate(service, &pods, &deployments).iter()
                .map(|deployment| deployment.name_any())
                .collect(),
        })
        .collect();

    Ok(overview)
}

// Services with no ready backends may not have an Endpoints object yet.
async fn endpoints_or_empty<S: ObjectStore>(store: &S, namespace: &str, service_name: &str) -> Result<Endpoints> {
    match store.get_endpoints(namespace, service_name).await {
        Err(e) if e.is_not_found() => {
            warn!("No endpoints for service {service_name} in {namespace}.");
            Ok(Endpoints {
                metadata: ObjectMeta {
                    name: Some(service_name.to_string()),
                    namespace: Some(namespace.to_string()),
                    ..Default::default()
                },
                subsets: None,
            })
        }
        result => result,
    }
}
