use std::collections::HashMap;

use k8s_openapi::api::core::v1::{Endpoints, Pod};
use kube::ResourceExt;
use log::debug;

const POD_KIND: &str = "Pod";

/// Names of the pods referenced by the endpoints' addresses, in subset then address
/// order. Addresses without a target reference or pointing to another kind are skipped.
pub fn pod_references(endpoints: &Endpoints) -> impl Iterator<Item = &str> {
    endpoints.subsets.iter()
        .flatten()
        .flat_map(|subset| subset.addresses.iter().flatten())
        .filter_map(|address| address.target_ref.as_ref())
        .filter(|target| target.kind.as_deref() == Some(POD_KIND))
        .filter_map(|target| target.name.as_deref())
}

/// Resolves the pods backing `endpoints`. The result follows the order of the
/// addresses, not of `pods`; a pod referenced twice is returned twice and references
/// to pods missing from `pods` are dropped.
pub fn resolve_pods<'a>(endpoints: &Endpoints, pods: &'a [Pod]) -> Vec<&'a Pod> {

    // Keyed on metadata.name only; a generateName prefix is not a pod name.
    let mut by_name: HashMap<&str, &Pod> = HashMap::with_capacity(pods.len());
    for pod in pods {
        if let Some(name) = pod.metadata.name.as_deref() {
            by_name.entry(name).or_insert(pod);
        }
    }

    pod_references(endpoints)
        .filter_map(|name| {
            let pod = by_name.get(name).copied();
            if pod.is_none() {
                debug!("Endpoints {} reference missing pod {name}.", endpoints.name_any());
            }
            pod
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use k8s_openapi::api::core::v1::{EndpointAddress, EndpointSubset};

    fn names(pods: &[&Pod]) -> Vec<String> {
        pods.iter().map(|p| p.name_any()).collect()
    }

    fn cluster_pods() -> Vec<Pod> {
        ["pod-1", "pod-2", "pod-3", "pod-999", "other"].iter()
            .map(|name| pod(name, &[]))
            .collect()
    }

    #[test]
    fn pods_for_endpoints() {
        let endpoints = endpoints("reviews", vec![
            vec![
                target("Pod", "pod-1"),
                target("Pod", "pod-2"),
                target("Other", "other"),
                EndpointAddress::default(),
            ],
            vec![target("Pod", "pod-3")],
        ]);
        let pods = cluster_pods();

        let resolved = resolve_pods(&endpoints, &pods);
        assert_eq!(names(&resolved), vec!["pod-1", "pod-2", "pod-3"]);
    }

    #[test]
    fn follows_address_order() {
        let endpoints = endpoints("reviews", vec![
            vec![target("Pod", "pod-3")],
            vec![target("Pod", "pod-1"), target("Pod", "pod-2")],
        ]);
        let pods = cluster_pods();

        let resolved = resolve_pods(&endpoints, &pods);
        assert_eq!(names(&resolved), vec!["pod-3", "pod-1", "pod-2"]);
    }

    #[test]
    fn repeated_reference_is_kept() {
        let endpoints = endpoints("reviews", vec![
            vec![target("Pod", "pod-1")],
            vec![target("Pod", "pod-1")],
        ]);
        let pods = cluster_pods();

        assert_eq!(names(&resolve_pods(&endpoints, &pods)), vec!["pod-1", "pod-1"]);
    }

    #[test]
    fn dangling_reference_is_skipped() {
        let endpoints = endpoints("reviews", vec![
            vec![target("Pod", "deleted"), target("Pod", "pod-2")],
        ]);
        let pods = cluster_pods();

        assert_eq!(names(&resolve_pods(&endpoints, &pods)), vec!["pod-2"]);
    }

    #[test]
    fn empty_endpoints() {
        let pods = cluster_pods();

        let no_subsets = Endpoints::default();
        assert!(resolve_pods(&no_subsets, &pods).is_empty());

        let no_addresses = Endpoints {
            subsets: Some(vec![EndpointSubset::default()]),
            ..Default::default()
        };
        assert!(resolve_pods(&no_addresses, &pods).is_empty());
    }

    #[test]
    fn repeated_calls_agree() {
        let endpoints = endpoints("reviews", vec![
            vec![target("Pod", "pod-1"), target("Other", "other"), EndpointAddress::default()],
            vec![target("Pod", "pod-3")],
        ]);
        let pods = cluster_pods();

        let first = names(&resolve_pods(&endpoints, &pods));
        let second = names(&resolve_pods(&endpoints, &pods));
        assert_eq!(first, vec!["pod-1", "pod-3"]);
        assert_eq!(first, second);
    }

    #[test]
    fn first_pod_with_a_name_wins() {
        let endpoints = endpoints("reviews", vec![vec![target("Pod", "pod-1")]]);
        let pods = vec![
            pod("pod-1", &[("version", "v1")]),
            pod("pod-1", &[("version", "v2")]),
        ];

        let resolved = resolve_pods(&endpoints, &pods);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].labels().get("version").map(String::as_str), Some("v1"));
    }

    #[test]
    fn generate_name_is_not_a_pod_name() {
        let endpoints = endpoints("reviews", vec![vec![target("Pod", "reviews-")]]);
        let mut unnamed = pod("", &[]);
        unnamed.metadata.generate_name = Some("reviews-".to_string());

        assert!(resolve_pods(&endpoints, &[unnamed]).is_empty());
    }

    #[test]
    fn kind_is_case_sensitive() {
        let endpoints = endpoints("reviews", vec![vec![target("pod", "pod-1")]]);
        assert_eq!(pod_references(&endpoints).count(), 0);
    }
}
