use std::collections::HashMap;
use std::net::IpAddr;

use poem::Request;
use serde_json::{json, Value};
use uuid::Uuid;

/// Request context that flows through all layers
///
/// Carries whatever metadata is available at capture time. Everything is
/// best-effort: an empty context is valid and the recorder stores whatever
/// it is handed.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// Unique identifier for this request (for tracing across layers)
    pub request_id: Uuid,

    /// IP address of the client that triggered the operation
    pub remote_addr: Option<IpAddr>,

    /// Endpoint or operation that triggered the mutation
    pub endpoint: Option<String>,

    /// User-Agent header, when the origin is HTTP
    pub user_agent: Option<String>,

    /// Actor who initiated the operation
    pub actor: String,
}

impl RequestContext {
    /// Context for an internal/system operation
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            remote_addr: None,
            endpoint: Some(operation_name.to_string()),
            user_agent: None,
            actor: format!("system:{}", operation_name),
        }
    }

    /// Context for a CLI invocation
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            remote_addr: None,
            endpoint: Some(command_name.to_string()),
            user_agent: None,
            actor: format!("cli:{}", command_name),
        }
    }

    /// Build a context from an incoming HTTP request
    ///
    /// The application is single-tenant with no authentication, so the
    /// actor is the fixed anonymous identity.
    pub fn from_request(req: &Request) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            remote_addr: Self::extract_ip_address(req),
            endpoint: Some(req.uri().path().to_string()),
            user_agent: req.header("User-Agent").map(|ua| ua.to_string()),
            actor: "anonymous".to_string(),
        }
    }

    /// Extract the client IP from proxy headers, falling back to the
    /// socket's remote address
    fn extract_ip_address(req: &Request) -> Option<IpAddr> {
        if let Some(forwarded) = req.header("X-Forwarded-For") {
            if let Some(ip) = forwarded.split(',').next() {
                if let Ok(parsed) = ip.trim().parse() {
                    return Some(parsed);
                }
            }
        }

        if let Some(real_ip) = req.header("X-Real-IP") {
            if let Ok(parsed) = real_ip.parse() {
                return Some(parsed);
            }
        }

        req.remote_addr().as_socket_addr().map(|addr| addr.ip())
    }

    /// Flatten the context into the metadata map stored on a record
    pub fn to_metadata(&self) -> HashMap<String, Value> {
        let mut metadata = HashMap::new();
        metadata.insert("request_id".to_string(), json!(self.request_id.to_string()));
        metadata.insert("actor".to_string(), json!(self.actor));

        if let Some(addr) = self.remote_addr {
            metadata.insert("remote_addr".to_string(), json!(addr.to_string()));
        }
        if let Some(endpoint) = &self.endpoint {
            metadata.insert("endpoint".to_string(), json!(endpoint));
        }
        if let Some(agent) = &self.user_agent {
            metadata.insert("user_agent".to_string(), json!(agent));
        }

        metadata
    }
}
