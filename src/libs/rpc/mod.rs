//! Transports, request formatters and response decoders the module core
//! talks to.
pub mod decoder;
pub mod formatter;
pub mod http;
pub mod tester;
pub mod transport;

pub use decoder::{DecodeError, EthDecoder, ResponseDecoder};
pub use formatter::{EthFormatter, RequestFormatter};
pub use http::HttpTransport;
pub use tester::TesterTransport;
pub use transport::{Transport, TransportError};
