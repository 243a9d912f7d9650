//! Ordered classification rule tables.

use casetrace_types::{ClassifiedEvent, Intent, NormalizedEvent, Workload};

/// Workload rules over the record type, highest priority first.
/// First match wins; substrings are matched case-insensitively.
const WORKLOAD_RULES: &[(&[&str], Workload)] = &[
    (&["sharepoint", "onedrive"], Workload::FileActivity),
    (&["azureactivedirectory", "azuread"], Workload::IdentityAccess),
    (&["exchange"], Workload::Exchange),
    (&["crm", "dynamics", "power"], Workload::BusinessApps),
    (&["microsoftteams", "teams"], Workload::Collaboration),
];

/// Intent rules over the operation, highest priority first.
const INTENT_RULES: &[(&[&str], Intent)] = &[
    (&["access", "preview", "login", "logon"], Intent::AccessRead),
    (&["modif", "set", "update"], Intent::Modification),
    (&["download", "sync"], Intent::ExfiltrationRisk),
    (&["delet", "recycle"], Intent::Deletion),
];

/// Classify a record type and operation pair.
///
/// Pure and total: identical input always yields the identical label pair,
/// and every input receives exactly one label per axis, falling through to
/// `Other` when no rule matches.
pub fn classify(record_type: &str, operation: &str) -> (Workload, Intent) {
    (
        match_rules(WORKLOAD_RULES, record_type).unwrap_or(Workload::Other),
        match_rules(INTENT_RULES, operation).unwrap_or(Intent::Other),
    )
}

fn match_rules<L: Copy>(rules: &[(&[&str], L)], text: &str) -> Option<L> {
    let text = text.to_ascii_lowercase();
    rules
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| text.contains(needle)))
        .map(|(_, label)| *label)
}

/// Attach labels to a normalized event.
pub fn classify_event(event: NormalizedEvent) -> ClassifiedEvent {
    let (workload, intent) = classify(&event.record_type, &event.operation);
    ClassifiedEvent {
        event,
        workload,
        intent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("SharePointFileOperation", Workload::FileActivity; "sharepoint")]
    #[test_case("OneDrive", Workload::FileActivity; "onedrive")]
    #[test_case("AzureActiveDirectoryStsLogon", Workload::IdentityAccess; "aad sts logon")]
    #[test_case("AzureActiveDirectory", Workload::IdentityAccess; "aad directory")]
    #[test_case("ExchangeItem", Workload::Exchange; "exchange item")]
    #[test_case("ExchangeAdmin", Workload::Exchange; "exchange admin")]
    #[test_case("CrmEntityOperation", Workload::BusinessApps; "crm")]
    #[test_case("PowerAppsApp", Workload::BusinessApps; "power platform")]
    #[test_case("Dynamics365", Workload::BusinessApps; "dynamics")]
    #[test_case("MicrosoftTeams", Workload::Collaboration; "teams")]
    #[test_case("SecurityComplianceCenter", Workload::Other; "no workload rule")]
    #[test_case("", Workload::Other; "empty record type")]
    fn workload_rules(record_type: &str, expected: Workload) {
        let (workload, _) = classify(record_type, "X");
        assert_eq!(workload, expected);
    }

    #[test_case("FileAccessed", Intent::AccessRead; "file accessed")]
    #[test_case("FilePreviewed", Intent::AccessRead; "file previewed")]
    #[test_case("UserLoggedIn", Intent::AccessRead; "logged in")]
    #[test_case("FileModified", Intent::Modification; "file modified")]
    #[test_case("Set-Mailbox", Intent::Modification; "set cmdlet")]
    #[test_case("UpdateInboxRules", Intent::Modification; "update")]
    #[test_case("FileDownloaded", Intent::ExfiltrationRisk; "download")]
    #[test_case("FileSyncDownloadedFull", Intent::ExfiltrationRisk; "sync")]
    #[test_case("FileDeleted", Intent::Deletion; "file deleted")]
    #[test_case("FileRecycled", Intent::Deletion; "recycled")]
    #[test_case("HardDeleteItem", Intent::Deletion; "hard delete")]
    #[test_case("SiteColumnCreated", Intent::Other; "no intent rule")]
    #[test_case("", Intent::Other; "empty operation")]
    fn intent_rules(operation: &str, expected: Intent) {
        let (_, intent) = classify("X", operation);
        assert_eq!(intent, expected);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            classify("SHAREPOINT", "fileaccessed"),
            (Workload::FileActivity, Intent::AccessRead)
        );
    }

    #[test]
    fn sts_logon_scenario() {
        let (workload, intent) = classify("AzureActiveDirectoryStsLogon", "UserLoggedIn");
        assert_eq!(workload, Workload::IdentityAccess);
        assert_eq!(intent, Intent::AccessRead);
    }

    #[test]
    fn workload_priority_order_breaks_overlaps() {
        // A record type carrying both markers resolves via rule order.
        let (workload, _) = classify("SharePointExchangeHybrid", "X");
        assert_eq!(workload, Workload::FileActivity);
    }

    #[test]
    fn access_outranks_sync() {
        // "SearchQueryPerformed"-style overlaps resolve to the earlier rule.
        let (_, intent) = classify("X", "SyncAccessRequested");
        assert_eq!(intent, Intent::AccessRead);
    }

    proptest::proptest! {
        #[test]
        fn total_and_deterministic(record_type in ".*", operation in ".*") {
            let first = classify(&record_type, &operation);
            let second = classify(&record_type, &operation);
            proptest::prop_assert_eq!(first, second);
        }
    }
}
