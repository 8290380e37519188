//! License expressions attached to compiled packages.
//!
//! Listed licenses carry a canonical SPDX identifier. Licenses that match
//! nothing in the known-license table become [`ExtractedLicense`] entries
//! with a synthetic `LicenseRef-N` id. Within one compilation, every mention
//! of the same normalized URL shares one `Arc`, so identity can be checked
//! with [`LicenseExpression::same_instance`].

use std::fmt;
use std::sync::Arc;

/// Placeholder for "no information available".
pub const NOASSERTION: &str = "NOASSERTION";

/// Prefix of synthetic license identifiers
pub const LICENSE_REF_PREFIX: &str = "LicenseRef-";

/// A license that is not on the SPDX list, declared inside the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractedLicense {
    /// Synthetic id, `LicenseRef-N`
    pub license_id: String,
    pub name: String,
    pub extracted_text: String,
    /// License URL, `https` rewritten to `http`
    pub see_also: String,
}

/// Resolved license expression of a package
#[derive(Debug, Clone)]
pub enum LicenseExpression {
    /// No license information
    NoAssertion,
    /// Canonical SPDX license identifier
    Listed(Arc<str>),
    /// Document-local license
    Extracted(Arc<ExtractedLicense>),
    /// All of the members apply, in declaration order
    Conjunction(Vec<LicenseExpression>),
}

impl LicenseExpression {
    /// Listed license from an SPDX id
    pub fn listed(id: &str) -> Self {
        Self::Listed(Arc::from(id))
    }

    /// True for the NOASSERTION placeholder
    #[must_use]
    pub const fn is_no_assertion(&self) -> bool {
        matches!(self, Self::NoAssertion)
    }

    /// Pointer identity for shared members, structural comparison otherwise.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NoAssertion, Self::NoAssertion) => true,
            (Self::Listed(a), Self::Listed(b)) => Arc::ptr_eq(a, b),
            (Self::Extracted(a), Self::Extracted(b)) => Arc::ptr_eq(a, b),
            (Self::Conjunction(a), Self::Conjunction(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_instance(y))
            }
            _ => false,
        }
    }

    /// Extracted licenses referenced anywhere in this expression
    #[must_use]
    pub fn extracted(&self) -> Vec<&Arc<ExtractedLicense>> {
        match self {
            Self::Extracted(license) => vec![license],
            Self::Conjunction(members) => members.iter().flat_map(Self::extracted).collect(),
            Self::NoAssertion | Self::Listed(_) => Vec::new(),
        }
    }
}

impl PartialEq for LicenseExpression {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NoAssertion, Self::NoAssertion) => true,
            (Self::Listed(a), Self::Listed(b)) => a == b,
            (Self::Extracted(a), Self::Extracted(b)) => a.license_id == b.license_id,
            (Self::Conjunction(a), Self::Conjunction(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LicenseExpression {}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAssertion => f.write_str(NOASSERTION),
            Self::Listed(id) => f.write_str(id),
            Self::Extracted(license) => f.write_str(&license.license_id),
            Self::Conjunction(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

impl Default for LicenseExpression {
    fn default() -> Self {
        Self::NoAssertion
    }
}

/// Check a rendered expression with the `spdx` crate.
///
/// `NOASSERTION` and `NONE` are only valid as the whole expression.
#[must_use]
pub fn is_valid_expression(expr: &str) -> bool {
    if expr == NOASSERTION || expr == "NONE" {
        return true;
    }
    let has_special_member = expr
        .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .any(|token| token == NOASSERTION || token == "NONE");
    !has_special_member && spdx::Expression::parse_mode(expr, spdx::ParseMode::LAX).is_ok()
}

/// `LicenseRef-` ids referenced by a rendered expression
pub fn license_refs(expr: &str) -> impl Iterator<Item = &str> {
    expr.split(|c: char| c.is_whitespace() || c == '(' || c == ')')
        .filter(|token| token.starts_with(LICENSE_REF_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(id: &str) -> LicenseExpression {
        LicenseExpression::Extracted(Arc::new(ExtractedLicense {
            license_id: id.to_string(),
            name: "Custom".to_string(),
            extracted_text: "Custom".to_string(),
            see_also: "http://example.com/license".to_string(),
        }))
    }

    #[test]
    fn test_conjunction_display() {
        let expr = LicenseExpression::Conjunction(vec![
            LicenseExpression::listed("Apache-2.0"),
            extracted("LicenseRef-1"),
        ]);
        assert_eq!(expr.to_string(), "Apache-2.0 AND LicenseRef-1");
        assert_eq!(expr.extracted().len(), 1);
    }

    #[test]
    fn test_same_instance_uses_pointer_identity() {
        let a = extracted("LicenseRef-1");
        let b = a.clone();
        let c = extracted("LicenseRef-1");
        assert!(a.same_instance(&b));
        assert!(!a.same_instance(&c));
        assert_eq!(a, c);
    }

    #[test]
    fn test_expression_validation() {
        assert!(is_valid_expression("NOASSERTION"));
        assert!(is_valid_expression("Apache-2.0 AND LicenseRef-3"));
        assert!(!is_valid_expression("MIT AND NOASSERTION"));
        assert!(!is_valid_expression("(NONE AND MIT)"));
        assert!(!is_valid_expression("AND AND"));
    }

    #[test]
    fn test_license_refs() {
        let refs: Vec<_> = license_refs("(MIT AND LicenseRef-2) AND LicenseRef-10").collect();
        assert_eq!(refs, vec!["LicenseRef-2", "LicenseRef-10"]);
    }
}
