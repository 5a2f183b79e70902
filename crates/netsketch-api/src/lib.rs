// netsketch-api: async client for the text-generation service used to review topologies

pub mod error;
pub mod generative;
pub mod transport;

pub use error::Error;
pub use generative::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GenerativeClient};
pub use transport::{TlsMode, TransportConfig};
