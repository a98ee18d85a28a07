use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use kube::ResourceExt;
use log::debug;

use crate::labels::{matches, Labels};

/// Returns the deployments, in input order, that manage at least one of the pods
/// selected by `service`.
///
/// A deployment with an explicit selector qualifies when that selector matches one
/// of the service's pods. A deployment without one is matched by comparing the
/// service selector against the deployment's own labels instead, so a service can
/// still be tied to a deployment that has no running pods yet.
///
/// A service without a selector selects no pods and yields no deployments.
pub fn correlate<'a>(service: &Service, pods: &[Pod], deployments: &'a [Deployment]) -> Vec<&'a Deployment> {

    let Some(selector) = service_selector(service) else {
        debug!("Service {} has no selector, skipping deployments.", service.name_any());
        return Vec::new();
    };

    let service_pods: Vec<&Pod> = pods.iter()
        .filter(|pod| matches(selector, pod.labels()))
        .collect();

    debug!("Service {} selects {} of {} pods.", service.name_any(), service_pods.len(), pods.len());

    deployments.iter()
        .filter(|deployment| match deployment_selector(deployment) {
            Some(dep_selector) => service_pods.iter()
                .any(|pod| matches(dep_selector, pod.labels())),
            None => matches(selector, direct_labels(deployment)),
        })
        .collect()
}

fn service_selector(service: &Service) -> Option<&Labels> {
    service.spec.as_ref()?
        .selector.as_ref()
        .filter(|selector| !selector.is_empty())
}

/// An empty `match_labels` counts as no selector, so it never selects every pod.
fn deployment_selector(deployment: &Deployment) -> Option<&Labels> {
    deployment.spec.as_ref()?
        .selector.match_labels.as_ref()
        .filter(|selector| !selector.is_empty())
}

/// Pod template labels, or the deployment's own metadata labels when the template has none.
fn direct_labels(deployment: &Deployment) -> &Labels {
    deployment.spec.as_ref()
        .and_then(|spec| spec.template.metadata.as_ref())
        .and_then(|meta| meta.labels.as_ref())
        .filter(|labels| !labels.is_empty())
        .unwrap_or_else(|| deployment.labels())
}
