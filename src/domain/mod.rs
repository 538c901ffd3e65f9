pub mod appliance;
pub mod candidate;
pub mod catalog;
pub mod configuration;
pub mod request;

pub use appliance::*;
pub use candidate::*;
pub use catalog::*;
pub use configuration::*;
pub use request::*;
