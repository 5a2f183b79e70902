//! Bridge to the external topology reviewer.
//!
//! The reviewer is unreliable by nature: missing credentials, network
//! failures and blank answers all come back as a readable message, never
//! as an error.

use std::fmt::Write as _;
use std::future::Future;

use netsketch_api::{Error as ApiError, GenerativeClient};
use tracing::{debug, warn};

use crate::model::{DeviceKind, EntityId, Topology};

pub const MISSING_CREDENTIALS_MESSAGE: &str = "Error: no API key is configured for topology \
     analysis. Set NETSKETCH_API_KEY or add `analysis.api_key` to the config file.";

pub const FAILURE_MESSAGE: &str =
    "An error occurred while analyzing the topology. Please try again later.";

pub const EMPTY_ANSWER_MESSAGE: &str = "The analysis service did not produce an answer.";

/// Anything that turns a prompt into text.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, ApiError>> + Send;
}

impl TextGenerator for GenerativeClient {
    async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        self.generate_content(prompt).await
    }
}

/// Plain-text description of the devices and cabling.
///
/// ```text
/// Devices:
/// SERVER-1 (SERVER)
///   - IP: 192.168.1.1/255.255.255.0
///   - OS: Linux
///   - Services: SSH, DNS
///
/// Connections:
///   - SERVER-1 <---> ROUTER-2
/// ```
pub fn describe_topology(topology: &Topology) -> String {
    let mut out = String::from("Devices:\n");
    for node in &topology.nodes {
        let cfg = &node.config;
        let _ = writeln!(out, "{} ({})", cfg.name, node.kind);
        let _ = writeln!(out, "  - IP: {}/{}", cfg.ip_address, cfg.subnet_mask);
        if node.kind == DeviceKind::Server {
            let _ = writeln!(out, "  - OS: {}", cfg.operating_system());
            let services = cfg.services();
            if services.is_empty() {
                out.push_str("  - Services: none\n");
            } else {
                let names: Vec<String> = services.iter().map(ToString::to_string).collect();
                let _ = writeln!(out, "  - Services: {}", names.join(", "));
            }
        }
    }

    out.push_str("\nConnections:\n");
    for link in &topology.links {
        let name = |id: &EntityId| topology.node(id).map_or("?", |n| n.name());
        let _ = writeln!(
            out,
            "  - {} <---> {}",
            name(&link.source_id),
            name(&link.target_id)
        );
    }
    out
}

/// Wrap the description in reviewer instructions.
pub fn build_prompt(topology: &Topology) -> String {
    format!(
        "Act as a network engineer and instructor. Review the following network \
         topology, designed by a student.\n\n\
         {description}\n\
         Tasks:\n\
         1. Assess the logic of the topology (isolated devices, whether the connections make sense).\n\
         2. Check the configuration (IP address consistency, server services compatible with the OS).\n\
         3. If you find mistakes or gaps, suggest fixes.\n\
         4. If the design is good, say so and point out one strength.\n\n\
         Answer in Markdown. Be concise and helpful.\n",
        description = describe_topology(topology)
    )
}

/// Ask `generator` to review `topology`. Never fails.
///
/// `None` means no credentials were available.
pub async fn analyze_topology<G: TextGenerator>(generator: Option<&G>, topology: &Topology) -> String {
    let Some(generator) = generator else {
        warn!("analysis requested without an API key");
        return MISSING_CREDENTIALS_MESSAGE.to_owned();
    };

    let prompt = build_prompt(topology);
    debug!(nodes = topology.nodes.len(), links = topology.links.len(), "requesting analysis");

    match generator.generate(&prompt).await {
        Ok(text) if text.trim().is_empty() => EMPTY_ANSWER_MESSAGE.to_owned(),
        Ok(text) => text,
        Err(ApiError::EmptyResponse) => EMPTY_ANSWER_MESSAGE.to_owned(),
        Err(e) if e.is_credentials() => {
            warn!(error = %e, "analysis credentials rejected");
            MISSING_CREDENTIALS_MESSAGE.to_owned()
        }
        Err(e) => {
            warn!(error = %e, "analysis request failed");
            FAILURE_MESSAGE.to_owned()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{OperatingSystem, Service};
    use crate::store::TopologyStore;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    struct Canned {
        answer: fn() -> Result<String, ApiError>,
        seen: Mutex<Vec<String>>,
    }

    impl Canned {
        fn new(answer: fn() -> Result<String, ApiError>) -> Self {
            Self {
                answer,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for Canned {
        async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
            self.seen.lock().unwrap().push(prompt.to_owned());
            (self.answer)()
        }
    }

    fn sample() -> Topology {
        let mut store = TopologyStore::new();
        let srv = store.add_node(DeviceKind::Server).id;
        let r = store.add_node(DeviceKind::Router).id;
        store.add_node(DeviceKind::PersonalComputer);
        store.toggle_service(&srv, Service::Ssh).unwrap();
        store.toggle_service(&srv, Service::Dns).unwrap();
        store.add_link(&srv, &r, "eth0", "Gi0/0").unwrap();
        store.topology().clone()
    }

    #[test]
    fn description_lists_nodes_and_links() {
        let text = describe_topology(&sample());
        assert_eq!(
            text,
            "Devices:\n\
             SERVER-1 (SERVER)\n\
             \x20 - IP: 192.168.1.1/255.255.255.0\n\
             \x20 - OS: Linux\n\
             \x20 - Services: SSH, DNS\n\
             ROUTER-2 (ROUTER)\n\
             \x20 - IP: 192.168.1.1/255.255.255.0\n\
             PC-3 (PC)\n\
             \x20 - IP: 192.168.1.1/255.255.255.0\n\
             \n\
             Connections:\n\
             \x20 - SERVER-1 <---> ROUTER-2\n"
        );
    }

    #[test]
    fn server_without_services_says_none() {
        let mut store = TopologyStore::new();
        let id = store.add_node(DeviceKind::Server).id;
        store
            .set_operating_system(&id, OperatingSystem::WindowsServer)
            .unwrap();
        let text = describe_topology(store.topology());
        assert!(text.contains("  - OS: Windows Server\n  - Services: none\n"));
    }

    #[test]
    fn prompt_embeds_description() {
        let topo = sample();
        assert!(build_prompt(&topo).contains(&describe_topology(&topo)));
    }

    #[tokio::test]
    async fn missing_generator_degrades_to_message() {
        let text = analyze_topology::<Canned>(None, &sample()).await;
        assert_eq!(text, MISSING_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn answer_is_returned_verbatim() {
        let generator = Canned::new(|| Ok("## Looks fine".to_owned()));
        let text = analyze_topology(Some(&generator), &sample()).await;
        assert_eq!(text, "## Looks fine");
        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("SERVER-1 <---> ROUTER-2"));
    }

    #[tokio::test]
    async fn failures_degrade_to_messages() {
        let failing = Canned::new(|| {
            Err(ApiError::Service {
                status: 500,
                message: "boom".into(),
            })
        });
        assert_eq!(
            analyze_topology(Some(&failing), &sample()).await,
            FAILURE_MESSAGE
        );

        let blank = Canned::new(|| Ok("   ".to_owned()));
        assert_eq!(
            analyze_topology(Some(&blank), &sample()).await,
            EMPTY_ANSWER_MESSAGE
        );

        let empty = Canned::new(|| Err(ApiError::EmptyResponse));
        assert_eq!(
            analyze_topology(Some(&empty), &sample()).await,
            EMPTY_ANSWER_MESSAGE
        );

        let rejected = Canned::new(|| Err(ApiError::InvalidApiKey));
        assert_eq!(
            analyze_topology(Some(&rejected), &sample()).await,
            MISSING_CREDENTIALS_MESSAGE
        );
    }
}
