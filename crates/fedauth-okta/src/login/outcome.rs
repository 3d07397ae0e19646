/// Result of a login attempt. Each variant decides what the caller does next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Logged in, the session token can be redeemed through an embed link.
    Success {
        #[allow(missing_docs)]
        session_token: String,
    },
    /// A one-time passcode is needed, pass it to
    /// [`OktaClient::verify_passcode`](crate::OktaClient::verify_passcode).
    PasscodeChallenge {
        #[allow(missing_docs)]
        factor_id: String,
        #[allow(missing_docs)]
        state_token: String,
    },
    /// The push wait was cancelled and no passcode factor is available. It can be resumed with
    /// [`OktaClient::verify_push`](crate::OktaClient::verify_push).
    PushPending {
        #[allow(missing_docs)]
        factor_id: String,
        #[allow(missing_docs)]
        state_token: String,
    },
    /// Every push was denied and no passcode factor is available.
    PushRejected {
        #[allow(missing_docs)]
        factor_id: String,
        #[allow(missing_docs)]
        state_token: String,
    },
    /// The provider refused the username or password.
    InvalidPassword,
    /// The user has to enroll a factor with the provider before logging in.
    EnrollmentRequired,
    /// The provider answered with a status, or a factor set, this client does not handle.
    Unknown {
        /// The `status` field of the response, if there was one.
        raw_status: Option<String>,
    },
}
