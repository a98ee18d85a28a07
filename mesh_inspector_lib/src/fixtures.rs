use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    EndpointAddress, EndpointSubset, Endpoints, ObjectReference, Pod, Service, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::api::ObjectMeta;

use crate::labels::Labels;

pub fn labels(pairs: &[(&str, &str)]) -> Labels {
    pairs.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn meta(name: &str, labels: Option<Labels>) -> ObjectMeta {
    ObjectMeta {
        name: (!name.is_empty()).then(|| name.to_string()),
        namespace: Some("default".to_string()),
        labels,
        ..Default::default()
    }
}

pub fn service(name: &str, selector: &[(&str, &str)]) -> Service {
    Service {
        metadata: meta(name, None),
        spec: Some(ServiceSpec {
            selector: Some(labels(selector)),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn pod(name: &str, pod_labels: &[(&str, &str)]) -> Pod {
    Pod {
        metadata: meta(name, Some(labels(pod_labels))),
        ..Default::default()
    }
}

pub fn deployment(name: &str, selector: &[(&str, &str)]) -> Deployment {
    Deployment {
        metadata: meta(name, None),
        spec: Some(DeploymentSpec {
            selector: LabelSelector {
                match_labels: Some(labels(selector)),
                ..Default::default()
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Deployment carrying its labels on its own metadata and no selector.
pub fn labeled_deployment(name: &str, own_labels: &[(&str, &str)]) -> Deployment {
    Deployment {
        metadata: meta(name, Some(labels(own_labels))),
        ..Default::default()
    }
}

pub fn target(kind: &str, name: &str) -> EndpointAddress {
    EndpointAddress {
        target_ref: Some(ObjectReference {
            kind: Some(kind.to_string()),
            name: Some(name.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn endpoints(name: &str, subsets: Vec<Vec<EndpointAddress>>) -> Endpoints {
    Endpoints {
        metadata: meta(name, None),
        subsets: Some(subsets.into_iter()
            .map(|addresses| EndpointSubset {
                addresses: Some(addresses),
                ..Default::default()
            })
            .collect()),
    }
}
