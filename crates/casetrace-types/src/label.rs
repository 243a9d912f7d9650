//! Classification labels for audit events.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Originating product/service surface of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    /// SharePoint and OneDrive file operations.
    #[strum(serialize = "File Activity")]
    FileActivity,
    /// Azure AD sign-ins and directory changes.
    #[strum(serialize = "Identity & Access")]
    IdentityAccess,
    /// Exchange mailbox and transport operations.
    #[strum(serialize = "Exchange")]
    Exchange,
    /// CRM, Dynamics and Power Platform operations.
    #[strum(serialize = "Business Apps")]
    BusinessApps,
    /// Teams operations.
    #[strum(serialize = "Collaboration")]
    Collaboration,
    /// No workload rule matched.
    #[strum(serialize = "Other")]
    Other,
}

impl Workload {
    /// All workloads in report section order.
    pub fn all() -> impl Iterator<Item = Self> {
        use strum::IntoEnumIterator;
        Self::iter()
    }

    /// Stable slug usable as a document anchor.
    pub fn anchor(&self) -> &'static str {
        match self {
            Self::FileActivity => "file-activity",
            Self::IdentityAccess => "identity-access",
            Self::Exchange => "exchange",
            Self::BusinessApps => "business-apps",
            Self::Collaboration => "collaboration",
            Self::Other => "other",
        }
    }
}

/// Classified purpose of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Reads, previews, sign-ins.
    #[strum(serialize = "Access/Read")]
    AccessRead,
    /// Settings and content changes.
    #[strum(serialize = "Modification")]
    Modification,
    /// Downloads and bulk sync.
    #[strum(serialize = "Exfiltration Risk")]
    ExfiltrationRisk,
    /// Deletes and recycle-bin operations.
    #[strum(serialize = "Deletion")]
    Deletion,
    /// No intent rule matched.
    #[strum(serialize = "Other")]
    Other,
}

impl Intent {
    /// All intents in priority order.
    pub fn all() -> impl Iterator<Item = Self> {
        use strum::IntoEnumIterator;
        Self::iter()
    }
}
