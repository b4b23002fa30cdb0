//! Credential extraction with legacy fallback.

use crate::request::TrackerRequest;

/// Current parameter name.
pub const CREDENTIAL_PARAM: &str = "credential";
/// Legacy alias, still honoured when `credential` is absent.
pub const LEGACY_PASSKEY_PARAM: &str = "passkey";

/// Return the first non-empty credential, probing in order:
/// route `credential`, query `credential`, route `passkey`, query `passkey`.
pub fn extract_credential(req: &TrackerRequest) -> Option<&str> {
    [CREDENTIAL_PARAM, LEGACY_PASSKEY_PARAM]
        .into_iter()
        .find_map(|name| non_empty(req.route.get(name)).or_else(|| non_empty(req.query.get(name))))
}

fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Params;

    fn req(route: &[(&str, &str)], query: &[(&str, &str)]) -> TrackerRequest {
        TrackerRequest::new(
            route.iter().copied().collect::<Params>(),
            query.iter().copied().collect::<Params>(),
        )
    }

    #[test]
    fn credential_wins_over_legacy_passkey() {
        let r = req(&[("passkey", "legacy-route")], &[("credential", "current"), ("passkey", "legacy")]);
        assert_eq!(extract_credential(&r), Some("current"));
    }

    #[test]
    fn route_wins_over_query_for_same_name() {
        let r = req(&[("credential", "from-route")], &[("credential", "from-query")]);
        assert_eq!(extract_credential(&r), Some("from-route"));
    }

    #[test]
    fn legacy_route_then_legacy_query() {
        let r = req(&[("passkey", "pk-route")], &[("passkey", "pk-query")]);
        assert_eq!(extract_credential(&r), Some("pk-route"));

        let r = req(&[], &[("passkey", "pk-query")]);
        assert_eq!(extract_credential(&r), Some("pk-query"));
    }

    #[test]
    fn empty_values_are_skipped() {
        let r = req(&[("credential", "")], &[("credential", ""), ("passkey", "fallback")]);
        assert_eq!(extract_credential(&r), Some("fallback"));

        let r = req(&[("credential", ""), ("passkey", "")], &[("passkey", "")]);
        assert_eq!(extract_credential(&r), None);
    }

    #[test]
    fn unrelated_params_are_ignored() {
        let r = req(&[("info_hash", "abc")], &[("peer_id", "xyz")]);
        assert_eq!(extract_credential(&r), None);
    }
}
