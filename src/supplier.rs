//! Supplier inference from manifest metadata.
//!
//! The manifest rarely names a supplier directly, so it is inferred from the
//! organization block and the developer list. The first rule that yields a
//! value wins:
//!
//! 1. a non-blank organization name
//! 2. the organization shared by every developer
//! 3. the first developer that has a name, or an organization but no email
//! 4. `Organization: NOASSERTION`

use crate::model::{DeveloperInfo, ManifestInfo, NOASSERTION};

/// Infer the SPDX supplier string for a manifest.
#[must_use]
pub fn infer_supplier(manifest: &ManifestInfo) -> String {
    organization_name(manifest)
        .or_else(|| shared_developer_organization(&manifest.developers))
        .or_else(|| first_developer_supplier(&manifest.developers))
        .unwrap_or_else(|| organization(NOASSERTION))
}

fn organization(name: &str) -> String {
    format!("Organization: {name}")
}

fn organization_name(manifest: &ManifestInfo) -> Option<String> {
    let name = manifest.organization.as_ref()?.name.trim();
    (!name.is_empty()).then(|| organization(name))
}

/// Organization of all developers, if they all have the same one.
fn shared_developer_organization(developers: &[DeveloperInfo]) -> Option<String> {
    let (first, rest) = developers.split_first()?;
    let org = first.organization.as_deref()?;
    rest.iter()
        .all(|d| d.organization.as_deref() == Some(org))
        .then(|| organization(org))
}

fn first_developer_supplier(developers: &[DeveloperInfo]) -> Option<String> {
    let developer = developers
        .iter()
        .find(|d| d.name.is_some() || (d.organization.is_some() && d.email.is_none()))?;

    match (&developer.name, &developer.email, &developer.organization) {
        (Some(name), Some(email), _) => Some(format!("Person: {name} ({email})")),
        (Some(name), None, _) => Some(format!("Person: {name}")),
        (None, _, Some(org)) => Some(organization(org)),
        (None, _, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(name: Option<&str>, email: Option<&str>, org: Option<&str>) -> DeveloperInfo {
        DeveloperInfo {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            organization: org.map(str::to_string),
        }
    }

    fn manifest(developers: Vec<DeveloperInfo>) -> ManifestInfo {
        ManifestInfo {
            developers,
            ..ManifestInfo::default()
        }
    }

    #[test]
    fn test_organization_name_wins() {
        let m = manifest(vec![dev(Some("A"), None, Some("Foo"))]).with_organization("  Example ");
        assert_eq!(infer_supplier(&m), "Organization: Example");
    }

    #[test]
    fn test_blank_organization_falls_through() {
        let m = manifest(vec![dev(Some("A"), None, Some("Foo"))]).with_organization("   ");
        assert_eq!(infer_supplier(&m), "Organization: Foo");
    }

    #[test]
    fn test_shared_developer_organization() {
        let m = manifest(vec![
            dev(Some("A"), None, Some("Foo")),
            dev(Some("B"), None, Some("Foo")),
        ]);
        assert_eq!(infer_supplier(&m), "Organization: Foo");
    }

    #[test]
    fn test_mixed_organizations_use_first_named_developer() {
        let m = manifest(vec![
            dev(Some("A"), None, Some("Foo")),
            dev(Some("B"), None, Some("Bar")),
        ]);
        assert_eq!(infer_supplier(&m), "Person: A");
    }

    #[test]
    fn test_developer_without_organization_breaks_sharing() {
        let m = manifest(vec![
            dev(Some("A"), Some("a@example.com"), Some("Foo")),
            dev(Some("B"), None, None),
        ]);
        assert_eq!(infer_supplier(&m), "Person: A (a@example.com)");
    }

    #[test]
    fn test_organization_only_developer() {
        let m = manifest(vec![
            dev(None, Some("x@example.com"), None),
            dev(None, None, Some("Acme")),
            dev(None, None, None),
        ]);
        assert_eq!(infer_supplier(&m), "Organization: Acme");
    }

    #[test]
    fn test_developer_with_org_and_email_is_not_eligible() {
        let m = manifest(vec![
            dev(None, Some("x@example.com"), Some("Acme")),
            dev(None, None, Some("Other")),
        ]);
        assert_eq!(infer_supplier(&m), "Organization: Other");
    }

    #[test]
    fn test_nothing_known() {
        assert_eq!(
            infer_supplier(&ManifestInfo::default()),
            "Organization: NOASSERTION"
        );
        let m = manifest(vec![dev(None, Some("x@example.com"), None)]);
        assert_eq!(infer_supplier(&m), "Organization: NOASSERTION");
    }
}
