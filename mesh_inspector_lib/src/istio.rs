use k8s_openapi::api::core::v1::Service;
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

const CLUSTER_DOMAIN: &str = "svc.cluster.local";

/// Routing rules applied to traffic addressed to a set of hosts.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(kind = "VirtualService", group = "networking.istio.io", version = "v1alpha3", namespaced)]
#[kube(shortname = "vs")]
#[serde(rename_all = "camelCase")]
pub struct VirtualServiceSpec {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub gateways: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp: Option<Vec<JsonValue>>,
}

/// Policies applied to traffic once routing has happened.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(kind = "DestinationRule", group = "networking.istio.io", version = "v1alpha3", namespaced)]
#[kube(shortname = "dr")]
#[serde(rename_all = "camelCase")]
pub struct DestinationRuleSpec {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_policy: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsets: Option<Vec<JsonValue>>,
}

/// Whether `host` designates `service`, either by short name, by `name.namespace`
/// or by its fully qualified cluster name. `*` designates every service and a
/// `*.` prefix designates every service whose qualified name ends with the rest.
pub fn host_matches_service(host: &str, service: &Service) -> bool {
    let name = service.name_any();
    if host == "*" || host == name {
        return true;
    }

    let Some(namespace) = service.namespace() else {
        return false;
    };
    let qualified = format!("{name}.{namespace}");
    let fqdn = format!("{qualified}.{CLUSTER_DOMAIN}");

    match host.strip_prefix('*') {
        Some(suffix) if suffix.starts_with('.') => qualified.ends_with(suffix) || fqdn.ends_with(suffix),
        _ => host == qualified || host == fqdn,
    }
}

pub fn filter_virtual_services<'a>(service: &Service, virtual_services: &'a [VirtualService]) -> Vec<&'a VirtualService> {
    virtual_services.iter()
        .filter(|vs| vs.spec.hosts.iter().any(|host| host_matches_service(host, service)))
        .collect()
}

pub fn filter_destination_rules<'a>(service: &Service, rules: &'a [DestinationRule]) -> Vec<&'a DestinationRule> {
    rules.iter()
        .filter(|rule| host_matches_service(&rule.spec.host, service))
        .collect()
}
