pub mod service_definition;
pub use service_definition::{Add, Div, Echo, EchoArgs, register_services};
