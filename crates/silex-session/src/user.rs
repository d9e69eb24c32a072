//! The user session model: who is logged in, and for how long.
//!
//! A [`User`] is built from the claims of an access token. Everything it
//! knows (names, rights, expiry) comes from the token, so it can answer
//! "is this session about to expire?" or "may this user do X?" without
//! asking the server.
//!
//! # Token lifetime
//!
//! ```text
//! issued                    renewal point                 expire
//!   │──────── 2/3 of lifetime ──────│──── last third ────────│
//!   │      need_renew() = false     │  need_renew() = true   │ false again
//! ```
//!
//! Renewal is attempted at the two-thirds point rather than at the
//! boundary, leaving the last third for the renewal round trip.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use silex_token::{Claims, TokenDecoder};

use crate::SessionError;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The one anonymous identity, built on first use and never mutated.
static ANONYMOUS: LazyLock<User> = LazyLock::new(|| User {
    first_name: "Anonymous".to_string(),
    last_name: String::new(),
    email: "anonymous@opensilex.org".to_string(),
    ..User::default()
});

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// The identity of whoever is using the client.
///
/// Either built from a decoded token (then [`is_logged_in`](Self::is_logged_in)
/// is `true`) or the [`anonymous`](Self::anonymous) identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    first_name: String,
    last_name: String,
    email: String,
    full_name: Option<String>,
    admin: bool,
    credentials: BTreeSet<String>,

    /// Expiration instant, seconds since epoch.
    expire: i64,

    /// Start of the token's lifetime, milliseconds since epoch. The `iat`
    /// claim when the issuer sets one, otherwise the moment of decoding.
    issued_at_ms: i64,

    token: String,
    logged_in: bool,
}

/// Placeholder values shown before any token has been decoded.
impl Default for User {
    fn default() -> Self {
        Self {
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            email: "jean.dupont@opensilex.org".to_string(),
            full_name: None,
            admin: false,
            credentials: BTreeSet::new(),
            expire: 0,
            issued_at_ms: 0,
            token: String::new(),
            logged_in: false,
        }
    }
}

impl User {
    /// The process-wide anonymous identity.
    ///
    /// Every call returns a reference to the same value. It is never
    /// logged in, is not an admin, and holds no credentials.
    pub fn anonymous() -> &'static User {
        &ANONYMOUS
    }

    /// Decodes `token` and builds the logged-in user it describes.
    ///
    /// Doesn't touch any store; see
    /// [`Sessions::from_token`](crate::Sessions::from_token) for the
    /// version that also persists the token.
    ///
    /// # Errors
    /// Returns [`SessionError::Decode`] if the token is malformed or a
    /// required claim is missing.
    pub fn decode<D: TokenDecoder>(
        token: &str,
        decoder: &D,
    ) -> Result<Self, SessionError> {
        Self::decode_at(token, decoder, now_ms())
    }

    /// Like [`decode`](Self::decode), with an explicit clock.
    pub fn decode_at<D: TokenDecoder>(
        token: &str,
        decoder: &D,
        now_ms: i64,
    ) -> Result<Self, SessionError> {
        let claims = decoder.decode_claims(token)?;
        Ok(Self::from_claims(token, claims, now_ms))
    }

    /// Builds the logged-in user described by already-decoded `claims`.
    ///
    /// `decoded_at_ms` stands in for the issue instant when the token has
    /// no `iat` claim (or an `iat` that isn't before `exp`).
    pub fn from_claims(
        token: impl Into<String>,
        claims: Claims,
        decoded_at_ms: i64,
    ) -> Self {
        let issued_at_ms = claims
            .iat
            .filter(|iat| *iat < claims.exp)
            .map(|iat| iat.saturating_mul(1000))
            .unwrap_or(decoded_at_ms);

        Self {
            first_name: claims.first_name,
            last_name: claims.last_name,
            email: claims.email,
            full_name: claims.full_name,
            admin: claims.is_admin,
            credentials: claims.credentials,
            expire: claims.exp,
            issued_at_ms,
            token: token.into(),
            logged_in: true,
        }
    }

    // -- Expiry ------------------------------------------------------------

    /// Milliseconds until the token expires. Negative once expired.
    pub fn expiration_ms(&self) -> i64 {
        self.expiration_ms_at(now_ms())
    }

    /// [`expiration_ms`](Self::expiration_ms) as seen at `now_ms`.
    pub fn expiration_ms_at(&self, now_ms: i64) -> i64 {
        self.expire.saturating_mul(1000).saturating_sub(now_ms)
    }

    /// Total lifetime of the token in milliseconds, issue to expiry.
    pub fn lifetime_ms(&self) -> i64 {
        self.expire
            .saturating_mul(1000)
            .saturating_sub(self.issued_at_ms)
            .max(0)
    }

    /// Milliseconds until the renewal point, two thirds into the token's
    /// lifetime. Zero or negative once that point has passed.
    ///
    /// At the moment the token is issued this is `floor(2/3 * expiration_ms())`,
    /// the delay to arm a renewal timer with.
    pub fn inactivity_renew_delay_ms(&self) -> i64 {
        self.inactivity_renew_delay_ms_at(now_ms())
    }

    /// [`inactivity_renew_delay_ms`](Self::inactivity_renew_delay_ms) as
    /// seen at `now_ms`.
    pub fn inactivity_renew_delay_ms_at(&self, now_ms: i64) -> i64 {
        let renew_after = self.lifetime_ms().saturating_mul(2).div_euclid(3);
        let elapsed = now_ms.saturating_sub(self.issued_at_ms);
        renew_after.saturating_sub(elapsed)
    }

    /// `true` while the token is still valid but past its renewal point.
    pub fn need_renew(&self) -> bool {
        self.need_renew_at(now_ms())
    }

    /// [`need_renew`](Self::need_renew) as seen at `now_ms`.
    pub fn need_renew_at(&self, now_ms: i64) -> bool {
        self.expiration_ms_at(now_ms) > 0
            && self.inactivity_renew_delay_ms_at(now_ms) <= 0
    }

    // -- Rights ------------------------------------------------------------

    /// `true` if the user is an admin, or holds every requested credential.
    ///
    /// Asking for nothing is always granted.
    ///
    /// ```rust
    /// use silex_session::User;
    ///
    /// let anonymous = User::anonymous();
    /// assert!(anonymous.has_credentials::<[&str; 0], _>([]));
    /// assert!(!anonymous.has_credentials(["users-read"]));
    /// ```
    pub fn has_credentials<I, S>(&self, requested: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.admin {
            return true;
        }
        requested
            .into_iter()
            .all(|credential| self.credentials.contains(credential.as_ref()))
    }

    // -- Accessors ---------------------------------------------------------

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// The display name from the token, or "first last".
    pub fn full_name(&self) -> String {
        match &self.full_name {
            Some(name) => name.clone(),
            None if self.last_name.is_empty() => self.first_name.clone(),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn set_admin(&mut self, admin: bool) {
        self.admin = admin;
    }

    pub fn credentials(&self) -> &BTreeSet<String> {
        &self.credentials
    }

    /// Expiration instant in seconds since epoch (0 when not logged in).
    pub fn expire(&self) -> i64 {
        self.expire
    }

    /// The raw token this user was decoded from (empty when not logged in).
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value for an `Authorization` header carrying this user's token.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Time-dependent behavior is tested through the `*_at` variants with
    //! a fixed clock, so nothing here sleeps.

    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn claims(exp_secs: i64, admin: bool, credentials: &[&str]) -> Claims {
        Claims {
            exp: exp_secs,
            iat: None,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.org".into(),
            full_name: None,
            is_admin: admin,
            credentials: credentials.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// A user whose token expires `lifetime_secs` after `NOW`, decoded at `NOW`.
    fn user_expiring_in(lifetime_secs: i64) -> User {
        User::from_claims(
            "tok",
            claims(NOW / 1000 + lifetime_secs, false, &["read"]),
            NOW,
        )
    }

    // =====================================================================
    // Defaults and anonymous
    // =====================================================================

    #[test]
    fn test_default_user_has_placeholders_and_is_logged_out() {
        let user = User::default();
        assert_eq!(user.first_name(), "Jean");
        assert_eq!(user.last_name(), "Dupont");
        assert_eq!(user.email(), "jean.dupont@opensilex.org");
        assert!(!user.is_logged_in());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_anonymous_returns_same_instance() {
        let a = User::anonymous();
        let b = User::anonymous();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_anonymous_fields() {
        let anonymous = User::anonymous();
        assert_eq!(anonymous.first_name(), "Anonymous");
        assert_eq!(anonymous.last_name(), "");
        assert_eq!(anonymous.email(), "anonymous@opensilex.org");
        assert_eq!(anonymous.full_name(), "Anonymous");
        assert!(!anonymous.is_admin());
        assert!(!anonymous.is_logged_in());
        assert!(anonymous.credentials().is_empty());
    }

    // =====================================================================
    // from_claims
    // =====================================================================

    #[test]
    fn test_from_claims_populates_identity_and_logs_in() {
        let mut c = claims(NOW / 1000 + 30, true, &["read", "write"]);
        c.full_name = Some("Ada King".into());

        let user = User::from_claims("raw-token", c, NOW);

        assert!(user.is_logged_in());
        assert!(user.is_admin());
        assert_eq!(user.first_name(), "Ada");
        assert_eq!(user.full_name(), "Ada King");
        assert_eq!(user.token(), "raw-token");
        assert_eq!(user.authorization_header(), "Bearer raw-token");
        assert_eq!(user.credentials().len(), 2);
    }

    #[test]
    fn test_full_name_falls_back_to_first_and_last() {
        let user = user_expiring_in(30);
        assert_eq!(user.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_from_claims_uses_iat_when_present() {
        let mut c = claims(NOW / 1000 + 30, false, &[]);
        c.iat = Some(NOW / 1000 - 60);

        let user = User::from_claims("t", c, NOW);

        assert_eq!(user.lifetime_ms(), 90_000);
    }

    #[test]
    fn test_from_claims_ignores_iat_after_exp() {
        let mut c = claims(NOW / 1000 + 30, false, &[]);
        c.iat = Some(NOW / 1000 + 31);

        let user = User::from_claims("t", c, NOW);

        assert_eq!(user.lifetime_ms(), 30_000);
    }

    // =====================================================================
    // Expiry arithmetic
    // =====================================================================

    #[test]
    fn test_expiration_ms_is_exp_millis_minus_now() {
        let user = user_expiring_in(30);
        assert_eq!(user.expiration_ms_at(NOW), 30_000);
        assert_eq!(user.expiration_ms_at(NOW + 10_000), 20_000);
    }

    #[test]
    fn test_expiration_ms_negative_after_expiry() {
        let user = user_expiring_in(30);
        assert_eq!(user.expiration_ms_at(NOW + 31_000), -1_000);
    }

    #[test]
    fn test_renew_delay_at_issue_is_two_thirds_of_expiration() {
        let user = user_expiring_in(30);
        assert_eq!(user.inactivity_renew_delay_ms_at(NOW), 20_000);

        // floor(2/3 * 10_000) = 6_666
        let user = User::from_claims("t", claims(NOW / 1000 + 10, false, &[]), NOW);
        assert_eq!(user.inactivity_renew_delay_ms_at(NOW), 6_666);
    }

    #[test]
    fn test_renew_delay_counts_down_with_elapsed_time() {
        let user = user_expiring_in(30);
        assert_eq!(user.inactivity_renew_delay_ms_at(NOW + 5_000), 15_000);
        assert_eq!(user.inactivity_renew_delay_ms_at(NOW + 25_000), -5_000);
    }

    #[test]
    fn test_need_renew_false_before_two_thirds() {
        let user = user_expiring_in(30);
        assert!(!user.need_renew_at(NOW));
        assert!(!user.need_renew_at(NOW + 19_999));
    }

    #[test]
    fn test_need_renew_true_in_last_third() {
        let user = user_expiring_in(30);
        assert!(user.need_renew_at(NOW + 20_001));
        assert!(user.need_renew_at(NOW + 29_999));
    }

    #[test]
    fn test_need_renew_false_once_expired() {
        let user = user_expiring_in(30);
        assert!(!user.need_renew_at(NOW + 30_000));
        assert!(!user.need_renew_at(NOW + 3_600_000));
    }

    #[test]
    fn test_need_renew_false_for_anonymous() {
        assert!(!User::anonymous().need_renew_at(NOW));
        assert!(User::anonymous().expiration_ms_at(NOW) < 0);
    }

    #[test]
    fn test_expiry_arithmetic_saturates_on_huge_exp() {
        let user = User::from_claims("t", claims(i64::MAX, false, &[]), NOW);
        assert!(user.expiration_ms_at(NOW) > 0);
        assert!(!user.need_renew_at(NOW));
    }

    // =====================================================================
    // has_credentials
    // =====================================================================

    #[test]
    fn test_has_credentials_empty_request_is_granted() {
        let none: [&str; 0] = [];
        assert!(User::anonymous().has_credentials(none));
        assert!(user_expiring_in(30).has_credentials(none));
    }

    #[test]
    fn test_has_credentials_requires_all() {
        let user = User::from_claims(
            "t",
            claims(NOW / 1000 + 30, false, &["read", "write"]),
            NOW,
        );

        assert!(user.has_credentials(["read"]));
        assert!(user.has_credentials(["write", "read"]));
        assert!(!user.has_credentials(["read", "delete"]));
    }

    #[test]
    fn test_has_credentials_admin_bypasses_check() {
        let user = User::from_claims("t", claims(NOW / 1000 + 30, true, &[]), NOW);
        assert!(user.has_credentials(["anything"]));
    }

    #[test]
    fn test_has_credentials_accepts_owned_strings() {
        let user = user_expiring_in(30);
        let wanted = vec!["read".to_string()];
        assert!(user.has_credentials(&wanted));
    }

    // =====================================================================
    // Mutators
    // =====================================================================

    #[test]
    fn test_setters_do_not_change_login_state() {
        let mut user = User::default();
        user.set_first_name("Marie");
        user.set_last_name("Curie");
        user.set_email("marie@example.org");
        user.set_admin(true);

        assert_eq!(user.full_name(), "Marie Curie");
        assert_eq!(user.email(), "marie@example.org");
        assert!(user.is_admin());
        assert!(!user.is_logged_in());
    }

    // =====================================================================
    // The 30-second scenario
    // =====================================================================

    #[test]
    fn test_thirty_second_read_only_token_scenario() {
        let user = user_expiring_in(30);

        assert!(user.has_credentials(["read"]));
        assert!(!user.has_credentials(["write"]));
        assert!(!user.need_renew_at(NOW));
        assert!(user.need_renew_at(NOW + 20_500));
    }
}
