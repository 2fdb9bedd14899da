pub mod changelog;
pub mod changelog_checker;
pub mod exemption;
pub mod github;
pub mod severity;
pub mod toml_ops;
pub mod trigger;
pub mod whatsnew;
