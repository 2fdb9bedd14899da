pub mod error;
pub mod utils;

pub use error::*;
pub use utils::changelog::{
    ExemptionPolicy, FragmentCandidate, FragmentType, PolicyConfig, Section, TowncrierSettings,
    WhatsNewPolicy, find_fragment, validate_fragment,
};
pub use utils::changelog_checker::{ChangelogChecker, CheckReport};
pub use utils::exemption::{AUTOMATION_ACCOUNTS, Exemption};
pub use utils::github::{GitHubClient, RepositoryHost};
pub use utils::severity::{Verdict, Violation, ViolationKind};
pub use utils::toml_ops::{TomlDocument, TomlReader, TomlSection};
pub use utils::trigger::{TriggerEvent, TriggerInput};
pub use utils::whatsnew::{WhatsNewStatus, check_whatsnew};
