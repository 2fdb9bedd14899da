// changelog fragment verification module

pub mod config;
pub mod matcher;
pub mod types;
pub mod validator;

pub use config::{
    ExemptionPolicy, FragmentType, PolicyConfig, Section, TowncrierSettings, WhatsNewPolicy,
};
pub use matcher::find_fragment;
pub use types::FragmentCandidate;
pub use validator::validate_fragment;
