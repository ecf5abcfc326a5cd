//! Scope diffing: which source scopes are absent from the destination.
//!
//! Identity within a site is the `subnet` value alone; no other field
//! participates in the comparison.

use std::collections::HashSet;

use scopesync_api::DhcpScope;

/// Index the subnets present in a scope inventory.
pub fn subnet_index(scopes: &[DhcpScope]) -> HashSet<&str> {
    scopes.iter().filter_map(|s| s.subnet.as_deref()).collect()
}

/// Select the source scopes whose subnet is absent at the destination.
///
/// Output order mirrors the source inventory. Duplicate subnets on the
/// source side are evaluated independently, not deduplicated -- each
/// duplicate is checked against the destination set on its own. A record
/// with no subnet cannot be present at the destination, so it passes
/// through for the sanitize stage to reject as its own failed outcome.
pub fn missing_scopes<'a>(
    source: &'a [DhcpScope],
    destination: &[DhcpScope],
) -> Vec<&'a DhcpScope> {
    let present = subnet_index(destination);
    source
        .iter()
        .filter(|scope| match scope.subnet.as_deref() {
            Some(subnet) => !present.contains(subnet),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(subnet: Option<&str>) -> DhcpScope {
        DhcpScope {
            id: None,
            subnet: subnet.map(Into::into),
            fields: serde_json::Map::new(),
        }
    }

    #[test]
    fn selects_exactly_the_absent_subnets() {
        let source = [
            scope(Some("10.1.1.0/24")),
            scope(Some("10.1.2.0/24")),
            scope(Some("10.1.3.0/24")),
        ];
        let destination = [scope(Some("10.1.2.0/24"))];

        let missing = missing_scopes(&source, &destination);

        let subnets: Vec<_> = missing.iter().map(|s| s.subnet.as_deref()).collect();
        assert_eq!(subnets, [Some("10.1.1.0/24"), Some("10.1.3.0/24")]);
    }

    #[test]
    fn preserves_source_order() {
        let source = [
            scope(Some("10.1.9.0/24")),
            scope(Some("10.1.1.0/24")),
            scope(Some("10.1.5.0/24")),
        ];

        let missing = missing_scopes(&source, &[]);

        let subnets: Vec<_> = missing.iter().map(|s| s.subnet.as_deref()).collect();
        assert_eq!(
            subnets,
            [Some("10.1.9.0/24"), Some("10.1.1.0/24"), Some("10.1.5.0/24")]
        );
    }

    #[test]
    fn source_duplicates_pass_through_independently() {
        let source = [scope(Some("10.1.1.0/24")), scope(Some("10.1.1.0/24"))];

        assert_eq!(missing_scopes(&source, &[]).len(), 2);

        let destination = [scope(Some("10.1.1.0/24"))];
        assert!(missing_scopes(&source, &destination).is_empty());
    }

    #[test]
    fn record_without_subnet_passes_through() {
        let source = [scope(None), scope(Some("10.1.1.0/24"))];
        let destination = [scope(Some("10.1.1.0/24"))];

        let missing = missing_scopes(&source, &destination);

        assert_eq!(missing.len(), 1);
        assert!(missing[0].subnet.is_none());
    }

    #[test]
    fn empty_inputs() {
        assert!(missing_scopes(&[], &[]).is_empty());
        assert!(missing_scopes(&[], &[scope(Some("10.1.1.0/24"))]).is_empty());

        let source = [scope(Some("10.1.1.0/24"))];
        assert_eq!(missing_scopes(&source, &[]).len(), 1);
    }
}
