pub mod logging;
pub mod observability;
pub mod reco;
