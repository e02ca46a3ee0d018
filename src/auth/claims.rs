//! Claim set and principal types.

use serde::{Deserialize, Serialize};

/// Claim set carried inside a token.
///
/// Timestamp claims are encoded as numeric strings on the wire (seconds
/// since the Unix epoch); deserialization also accepts plain JSON numbers
/// for interoperability with issuers that encode them as integers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Unique token id; always set by our issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Issuer
    pub iss: String,
    /// Issued-at
    #[serde(with = "ts_string")]
    pub iat: i64,
    /// Not-before
    #[serde(with = "ts_string")]
    pub nbf: i64,
    /// Expiry
    #[serde(with = "ts_string")]
    pub exp: i64,
    /// Audience; absent unless audience validation is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Authorization roles. One role is encoded as a bare string, several
    /// as an array, none as an absent key.
    #[serde(default, skip_serializing_if = "Roles::is_empty")]
    pub role: Roles,
}

/// Zero or more `role` claims.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roles(Vec<String>);

impl Roles {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r == role)
    }
}

impl From<Vec<String>> for Roles {
    fn from(roles: Vec<String>) -> Self {
        Roles(roles)
    }
}

impl Serialize for Roles {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.as_slice() {
            [one] => serializer.serialize_str(one),
            many => many.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Roles {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(String),
            Many(Vec<String>),
        }

        Ok(match OneOrMany::deserialize(deserializer)? {
            OneOrMany::One(role) => Roles(vec![role]),
            OneOrMany::Many(roles) => Roles(roles),
        })
    }
}

/// Serialize an epoch-seconds timestamp as a numeric string; accept either
/// a string or a number when deserializing.
pub(crate) mod ts_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrInt {
            S(String),
            I(i64),
        }

        match StringOrInt::deserialize(deserializer)? {
            StringOrInt::S(s) => s.parse().map_err(de::Error::custom),
            StringOrInt::I(i) => Ok(i),
        }
    }
}

/// Authenticated identity for one request.
///
/// Built from a validated claim set by the authentication middleware and
/// attached to the request extensions; dropped when the request completes.
/// Never persisted.
#[derive(Debug, Clone)]
pub struct Principal {
    claims: Claims,
}

impl Principal {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn username(&self) -> &str {
        &self.claims.sub
    }

    pub fn token_id(&self) -> Option<&str> {
        self.claims.jti.as_deref()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.claims.role.iter().map(String::as_str)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.claims.role.contains(role)
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Flatten into (type, value) pairs, one pair per role.
    pub fn claim_entries(&self) -> Vec<(String, String)> {
        let c = &self.claims;
        let mut entries = vec![("sub".to_string(), c.sub.clone())];
        if let Some(jti) = &c.jti {
            entries.push(("jti".to_string(), jti.clone()));
        }
        entries.push(("iss".to_string(), c.iss.clone()));
        entries.push(("iat".to_string(), c.iat.to_string()));
        entries.push(("nbf".to_string(), c.nbf.to_string()));
        entries.push(("exp".to_string(), c.exp.to_string()));
        if let Some(aud) = &c.aud {
            entries.push(("aud".to_string(), aud.clone()));
        }
        for role in c.role.iter() {
            entries.push(("role".to_string(), role.clone()));
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_claims(roles: Vec<String>) -> Claims {
        Claims {
            sub: "will".to_string(),
            jti: Some("id-1".to_string()),
            iss: "authgate".to_string(),
            iat: 1_700_000_000,
            nbf: 1_700_000_000,
            exp: 1_700_007_200,
            aud: None,
            role: Roles::from(roles),
        }
    }

    #[test]
    fn test_timestamps_serialize_as_strings() {
        let json = serde_json::to_value(sample_claims(vec![])).unwrap();
        assert_eq!(json["iat"], "1700000000");
        assert_eq!(json["exp"], "1700007200");
        // no roles -> no role key at all
        assert!(json.get("role").is_none());
    }

    #[test]
    fn test_timestamps_accept_numbers_and_strings() {
        let from_strings: Claims = serde_json::from_str(
            r#"{"sub":"a","iss":"x","iat":"10","nbf":"10","exp":"20"}"#,
        )
        .unwrap();
        let from_numbers: Claims =
            serde_json::from_str(r#"{"sub":"a","iss":"x","iat":10,"nbf":10,"exp":20}"#).unwrap();
        assert_eq!(from_strings, from_numbers);
        assert_eq!(from_strings.exp, 20);
    }

    #[test]
    fn test_single_role_is_bare_string() {
        let json = serde_json::to_value(sample_claims(vec!["admin".to_string()])).unwrap();
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_multiple_roles_are_an_array() {
        let json =
            serde_json::to_value(sample_claims(vec!["admin".to_string(), "user".to_string()]))
                .unwrap();
        assert_eq!(json["role"][0], "admin");
        assert_eq!(json["role"][1], "user");
    }

    #[test]
    fn test_roles_deserialize_both_forms() {
        let one: Claims = serde_json::from_str(
            r#"{"sub":"a","iss":"x","iat":"1","nbf":"1","exp":"2","role":"admin"}"#,
        )
        .unwrap();
        assert!(one.role.contains("admin"));
        assert_eq!(one.role.len(), 1);

        let many: Claims = serde_json::from_str(
            r#"{"sub":"a","iss":"x","iat":"1","nbf":"1","exp":"2","role":["a","b"]}"#,
        )
        .unwrap();
        assert_eq!(many.role.len(), 2);
    }

    #[test]
    fn test_claim_entries_expand_roles() {
        let principal =
            Principal::new(sample_claims(vec!["admin".to_string(), "user".to_string()]));
        let entries = principal.claim_entries();

        let roles: Vec<&str> = entries
            .iter()
            .filter(|(t, _)| t == "role")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(roles, vec!["admin", "user"]);
        assert!(entries.iter().any(|(t, v)| t == "sub" && v == "will"));
    }
}
