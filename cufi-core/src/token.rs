//! Signed session tokens (JWT).

use std::{collections::HashSet, fmt, str::FromStr};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind as JwtErrorKind, DecodingKey, EncodingKey,
    Header, Validation,
};
use rand::RngCore as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::entities::{Timestamp, UserId};

pub type ClaimMap = Map<String, Value>;

/// Custom claim that carries the id of the logged in user.
pub const USER_ID_CLAIM: &str = "userId";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("The claim '{claim}' has an unexpected type")]
    ClaimTypeMismatch { claim: &'static str },
    #[error("Invalid token: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
    #[error("No secret for algorithm {0:?}")]
    UnsupportedAlgorithm(jsonwebtoken::Algorithm),
    #[error("Invalid signing secret for {0}")]
    InvalidSecret(Algorithm),
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::InvalidToken(err) if matches!(err.kind(), JwtErrorKind::ExpiredSignature))
    }
}

type Result<T> = std::result::Result<T, TokenError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    HS256,
    HS384,
    HS512,
}

impl Algorithm {
    pub const ALL: [Self; 3] = [Self::HS256, Self::HS384, Self::HS512];
}

impl From<Algorithm> for jsonwebtoken::Algorithm {
    fn from(from: Algorithm) -> Self {
        match from {
            Algorithm::HS256 => Self::HS256,
            Algorithm::HS384 => Self::HS384,
            Algorithm::HS512 => Self::HS512,
        }
    }
}

impl TryFrom<jsonwebtoken::Algorithm> for Algorithm {
    type Error = TokenError;
    fn try_from(from: jsonwebtoken::Algorithm) -> Result<Self> {
        match from {
            jsonwebtoken::Algorithm::HS256 => Ok(Self::HS256),
            jsonwebtoken::Algorithm::HS384 => Ok(Self::HS384),
            jsonwebtoken::Algorithm::HS512 => Ok(Self::HS512),
            other => Err(TokenError::UnsupportedAlgorithm(other)),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One secret per supported algorithm.
#[derive(Clone)]
pub struct SigningSecrets {
    hs256: Vec<u8>,
    hs384: Vec<u8>,
    hs512: Vec<u8>,
}

impl SigningSecrets {
    pub fn new(hs256: Vec<u8>, hs384: Vec<u8>, hs512: Vec<u8>) -> Result<Self> {
        for (alg, secret) in Algorithm::ALL.into_iter().zip([&hs256, &hs384, &hs512]) {
            if secret.is_empty() {
                return Err(TokenError::InvalidSecret(alg));
            }
        }
        Ok(Self {
            hs256,
            hs384,
            hs512,
        })
    }

    pub fn from_base64(hs256: &str, hs384: &str, hs512: &str) -> Result<Self> {
        let decode = |alg, encoded: &str| {
            BASE64
                .decode(encoded.trim())
                .map_err(|_| TokenError::InvalidSecret(alg))
        };
        Self::new(
            decode(Algorithm::HS256, hs256)?,
            decode(Algorithm::HS384, hs384)?,
            decode(Algorithm::HS512, hs512)?,
        )
    }

    /// Tokens signed with random secrets are invalidated on restart.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let mut random_secret = |len| {
            let mut secret = vec![0u8; len];
            rng.fill_bytes(&mut secret);
            secret
        };
        Self {
            hs256: random_secret(32),
            hs384: random_secret(48),
            hs512: random_secret(64),
        }
    }

    fn secret(&self, algorithm: Algorithm) -> &[u8] {
        match algorithm {
            Algorithm::HS256 => &self.hs256,
            Algorithm::HS384 => &self.hs384,
            Algorithm::HS512 => &self.hs512,
        }
    }
}

impl fmt::Debug for SigningSecrets {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SigningSecrets").finish_non_exhaustive()
    }
}

/// Registered claim names with a predefined representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedClaim {
    Issuer,
    Subject,
    Audience,
    ExpiresAt,
    NotBefore,
    IssuedAt,
    TokenId,
}

impl ReservedClaim {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Issuer => "iss",
            Self::Subject => "sub",
            Self::Audience => "aud",
            Self::ExpiresAt => "exp",
            Self::NotBefore => "nbf",
            Self::IssuedAt => "iat",
            Self::TokenId => "jti",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let claim = match key {
            "iss" => Self::Issuer,
            "sub" => Self::Subject,
            "aud" => Self::Audience,
            "exp" => Self::ExpiresAt,
            "nbf" => Self::NotBefore,
            "iat" => Self::IssuedAt,
            "jti" => Self::TokenId,
            _ => return None,
        };
        Some(claim)
    }

    /// Time claims are represented as seconds since the epoch.
    pub const fn is_time(self) -> bool {
        matches!(self, Self::ExpiresAt | Self::NotBefore | Self::IssuedAt)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(flatten)]
    pub custom: ClaimMap,
}

impl Claims {
    pub fn build() -> ClaimsBuilder {
        ClaimsBuilder::default()
    }

    pub fn try_from_map(map: ClaimMap) -> Result<Self> {
        map.into_iter()
            .try_fold(Self::build(), |builder, (key, value)| builder.claim(key, value))
            .map(ClaimsBuilder::finish)
    }

    pub fn into_map(self) -> ClaimMap {
        let Self {
            iss,
            sub,
            aud,
            exp,
            nbf,
            iat,
            jti,
            mut custom,
        } = self;
        let strings = [
            (ReservedClaim::Issuer, iss),
            (ReservedClaim::Subject, sub),
            (ReservedClaim::Audience, aud),
            (ReservedClaim::TokenId, jti),
        ];
        for (claim, value) in strings {
            if let Some(value) = value {
                custom.insert(claim.key().to_owned(), value.into());
            }
        }
        let times = [
            (ReservedClaim::ExpiresAt, exp),
            (ReservedClaim::NotBefore, nbf),
            (ReservedClaim::IssuedAt, iat),
        ];
        for (claim, value) in times {
            if let Some(value) = value {
                custom.insert(claim.key().to_owned(), value.into());
            }
        }
        custom
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.custom
            .get(USER_ID_CLAIM)
            .and_then(Value::as_str)
            .map(UserId::from)
    }
}

#[derive(Debug, Default)]
pub struct ClaimsBuilder {
    claims: Claims,
}

impl ClaimsBuilder {
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.claims.iss = Some(issuer.into());
        self
    }
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.claims.sub = Some(subject.into());
        self
    }
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.claims.aud = Some(audience.into());
        self
    }
    pub fn expires_at(mut self, at: Timestamp) -> Self {
        self.claims.exp = Some(at.as_seconds());
        self
    }
    pub fn not_before(mut self, at: Timestamp) -> Self {
        self.claims.nbf = Some(at.as_seconds());
        self
    }
    pub fn issued_at(mut self, at: Timestamp) -> Self {
        self.claims.iat = Some(at.as_seconds());
        self
    }
    pub fn token_id(mut self, id: impl Into<String>) -> Self {
        self.claims.jti = Some(id.into());
        self
    }
    pub fn user_id(mut self, user_id: &UserId) -> Self {
        self.claims
            .custom
            .insert(USER_ID_CLAIM.to_owned(), user_id.as_str().into());
        self
    }

    /// Add a claim by name, checking the type of reserved claims.
    pub fn claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let key = key.into();
        let value = value.into();
        let Some(reserved) = ReservedClaim::from_key(&key) else {
            self.claims.custom.insert(key, value);
            return Ok(self);
        };
        let mismatch = || TokenError::ClaimTypeMismatch {
            claim: reserved.key(),
        };
        if reserved.is_time() {
            let seconds = value.as_i64().ok_or_else(mismatch)?;
            let at = Timestamp::from_seconds(seconds);
            return Ok(match reserved {
                ReservedClaim::ExpiresAt => self.expires_at(at),
                ReservedClaim::NotBefore => self.not_before(at),
                _ => self.issued_at(at),
            });
        }
        let Value::String(s) = value else {
            return Err(mismatch());
        };
        Ok(match reserved {
            ReservedClaim::Issuer => self.issuer(s),
            ReservedClaim::Subject => self.subject(s),
            ReservedClaim::Audience => self.audience(s),
            _ => self.token_id(s),
        })
    }

    pub fn finish(self) -> Claims {
        self.claims
    }
}

#[derive(Debug, Clone)]
pub struct TokenService {
    secrets: SigningSecrets,
}

impl TokenService {
    pub fn new(secrets: SigningSecrets) -> Self {
        Self { secrets }
    }

    pub fn issue(&self, claims: ClaimMap, algorithm: Algorithm) -> Result<String> {
        let claims = Claims::try_from_map(claims)?;
        self.issue_claims(&claims, algorithm)
    }

    pub fn issue_claims(&self, claims: &Claims, algorithm: Algorithm) -> Result<String> {
        let key = EncodingKey::from_secret(self.secrets.secret(algorithm));
        encode(&Header::new(algorithm.into()), claims, &key).map_err(TokenError::Signing)
    }

    pub fn resolve(&self, token: &str) -> Result<ClaimMap> {
        self.resolve_claims(token).map(Claims::into_map)
    }

    /// Verify the signature with the secret of the algorithm that is
    /// named in the header.
    ///
    /// Expiry and not-before claims are only checked if present.
    pub fn resolve_claims(&self, token: &str) -> Result<Claims> {
        let header = decode_header(token).map_err(TokenError::InvalidToken)?;
        let algorithm = Algorithm::try_from(header.alg)?;
        let mut validation = Validation::new(algorithm.into());
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = 0;
        let key = DecodingKey::from_secret(self.secrets.secret(algorithm));
        let data = decode::<Claims>(token, &key, &validation).map_err(TokenError::InvalidToken)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn service() -> TokenService {
        TokenService::new(
            SigningSecrets::new(b"first".to_vec(), b"second".to_vec(), b"third".to_vec()).unwrap(),
        )
    }

    fn map(value: Value) -> ClaimMap {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn resolve_issued_claims() {
        let service = service();
        let claims = map(json!({
            "iss": "culturefinder",
            "sub": "login",
            "iat": 1_700_000_000,
            "userId": "alice",
            "roles": ["user"],
        }));
        for alg in Algorithm::ALL {
            let token = service.issue(claims.clone(), alg).unwrap();
            assert_eq!(service.resolve(&token).unwrap(), claims);
        }
    }

    #[test]
    fn reject_mistyped_reserved_claims() {
        let service = service();
        for claims in [
            json!({ "iss": 42 }),
            json!({ "aud": ["a", "b"] }),
            json!({ "exp": "tomorrow" }),
            json!({ "nbf": 1.5 }),
            json!({ "jti": null }),
        ] {
            let err = service.issue(map(claims), Algorithm::HS256).unwrap_err();
            assert!(matches!(err, TokenError::ClaimTypeMismatch { .. }));
        }
    }

    #[test]
    fn accept_integers_for_time_claims() {
        let claims = Claims::try_from_map(map(json!({ "exp": 4_000_000_000u64, "iat": 0 }))).unwrap();
        assert_eq!(claims.exp, Some(4_000_000_000));
        assert_eq!(claims.iat, Some(0));
    }

    #[test]
    fn reject_tokens_signed_with_other_secrets() {
        let token = service()
            .issue(map(json!({ "userId": "alice" })), Algorithm::HS256)
            .unwrap();
        let other = TokenService::new(SigningSecrets::random());
        assert!(matches!(
            other.resolve(&token),
            Err(TokenError::InvalidToken(_))
        ));
    }

    #[test]
    fn reject_tampered_tokens() {
        let service = service();
        let token = service
            .issue(map(json!({ "userId": "alice" })), Algorithm::HS512)
            .unwrap();
        let forged_payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(r#"{"userId":"mallory"}"#);
        let mut parts: Vec<_> = token.split('.').collect();
        parts[1] = forged_payload.as_str();
        assert!(service.resolve(&parts.join(".")).is_err());
        assert!(service.resolve("not a token").is_err());
        assert!(service.resolve("").is_err());
    }

    #[test]
    fn reject_algorithms_without_secret() {
        let header = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let token = format!("{header}.e30.c2lnbmF0dXJl");
        assert!(matches!(
            service().resolve(&token),
            Err(TokenError::UnsupportedAlgorithm(jsonwebtoken::Algorithm::RS256))
        ));
    }

    #[test]
    fn reject_expired_tokens() {
        let service = service();
        let claims = Claims::build()
            .user_id(&"alice".into())
            .expires_at(Timestamp::from_seconds(1_000))
            .finish();
        let token = service.issue_claims(&claims, Algorithm::HS256).unwrap();
        let err = service.resolve(&token).unwrap_err();
        assert!(err.is_expired());

        let claims = Claims::build()
            .expires_at(Timestamp::now() + Duration::from_secs(3600))
            .finish();
        let token = service.issue_claims(&claims, Algorithm::HS256).unwrap();
        assert!(service.resolve(&token).is_ok());
    }

    #[test]
    fn read_user_id_claim() {
        let claims = Claims::build().user_id(&"bob".into()).finish();
        assert_eq!(claims.user_id(), Some(UserId::from("bob")));
        assert_eq!(Claims::default().user_id(), None);
    }

    #[test]
    fn decode_base64_secrets() {
        assert!(SigningSecrets::from_base64("c2VjcmV0", "c2VjcmV0", "c2VjcmV0").is_ok());
        assert!(matches!(
            SigningSecrets::from_base64("c2VjcmV0", "", "c2VjcmV0"),
            Err(TokenError::InvalidSecret(Algorithm::HS384))
        ));
        assert!(SigningSecrets::from_base64("!!", "c2VjcmV0", "c2VjcmV0").is_err());
    }
}
