// hermie-api: Timeout-bounded JSON fetcher for the Hermie device controller

mod deadline;
pub mod error;
pub mod fetcher;
pub mod transport;

pub use error::Error;
pub use fetcher::Fetcher;
pub use transport::{DEFAULT_TIMEOUT, TransportConfig};

pub use reqwest;
pub use reqwest::Method;
pub use reqwest::header::HeaderMap;
pub use url::Url;
