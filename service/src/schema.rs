//! Identifiers of the storage relations and columns.
//!
//! Shared by the query builders and the [`Database`] implementations, so that
//! a [`Description`] built by the former is understood by the latter.
//!
//! [`Database`]: crate::infra::Database
//! [`Description`]: common::Description

/// `users` relation.
pub mod users {
    /// Name of the relation.
    pub const TABLE: &str = "users";
    /// Primary key.
    pub const ID: &str = "user_id";
    /// Login name.
    pub const USER_NAME: &str = "username";
    /// Salutation.
    pub const SALUTATION: &str = "salutation";
    /// First name.
    pub const FIRST_NAME: &str = "first_name";
    /// Middle name.
    pub const MIDDLE_NAME: &str = "middle_name";
    /// Last name.
    pub const LAST_NAME: &str = "last_name";
    /// Name suffix.
    pub const SUFFIX: &str = "suffix";
    /// Initials.
    pub const INITIALS: &str = "initials";
    /// Email address.
    pub const EMAIL: &str = "email";
    /// Affiliation.
    pub const AFFILIATION: &str = "affiliation";
    /// Country code.
    pub const COUNTRY: &str = "country";
    /// Homepage.
    pub const URL: &str = "url";
    /// ORCID iD.
    pub const ORCID: &str = "orcid";
    /// Biography.
    pub const BIOGRAPHY: &str = "biography";
    /// Email signature.
    pub const SIGNATURE: &str = "signature";
    /// External authentication source.
    pub const AUTH_ID: &str = "auth_id";
    /// External authentication identifier.
    pub const AUTH_STRING: &str = "auth_string";
    /// Gender.
    pub const GENDER: &str = "gender";
    /// Phone number.
    pub const PHONE: &str = "phone";
    /// Mailing address.
    pub const MAILING_ADDRESS: &str = "mailing_address";
    /// Billing address.
    pub const BILLING_ADDRESS: &str = "billing_address";
    /// Private notes.
    pub const GOSSIP: &str = "gossip";
    /// Disabled flag.
    pub const DISABLED: &str = "disabled";
    /// Reason of disabling.
    pub const DISABLED_REASON: &str = "disabled_reason";
    /// Registration date.
    pub const DATE_REGISTERED: &str = "date_registered";
    /// Email validation date.
    pub const DATE_VALIDATED: &str = "date_validated";
    /// Last login date.
    pub const DATE_LAST_LOGIN: &str = "date_last_login";
    /// Forced password change flag.
    pub const MUST_CHANGE_PASSWORD: &str = "must_change_password";
}

/// `user_groups` relation.
pub mod user_groups {
    /// Name of the relation.
    pub const TABLE: &str = "user_groups";
    /// Primary key.
    pub const ID: &str = "user_group_id";
    /// Owning tenant.
    pub const CONTEXT_ID: &str = "context_id";
    /// Granted role.
    pub const ROLE_ID: &str = "role_id";
    /// Whether the group title is shown.
    pub const SHOW_TITLE: &str = "show_title";
    /// Whether users may join the group themselves.
    pub const PERMIT_SELF_REGISTRATION: &str = "permit_self_registration";
    /// Whether members only recommend decisions.
    pub const RECOMMEND_ONLY: &str = "recommend_only";
}

/// `user_user_groups` relation (group memberships).
pub mod user_user_groups {
    /// Name of the relation.
    pub const TABLE: &str = "user_user_groups";
    /// Member.
    pub const USER_ID: &str = "user_id";
    /// Group.
    pub const USER_GROUP_ID: &str = "user_group_id";
}

/// `user_group_stage` relation (workflow stages a group takes part in).
pub mod user_group_stage {
    /// Name of the relation.
    pub const TABLE: &str = "user_group_stage";
    /// Group.
    pub const USER_GROUP_ID: &str = "user_group_id";
    /// Workflow stage.
    pub const STAGE_ID: &str = "stage_id";
}

/// `stage_assignments` relation (participants of a submission).
pub mod stage_assignments {
    /// Name of the relation.
    pub const TABLE: &str = "stage_assignments";
    /// Submission.
    pub const SUBMISSION_ID: &str = "submission_id";
    /// Group the participant acts as.
    pub const USER_GROUP_ID: &str = "user_group_id";
    /// Participant.
    pub const USER_ID: &str = "user_id";
}

/// `section_editors` relation (editorial assignments to sections).
pub mod section_editors {
    /// Name of the relation.
    pub const TABLE: &str = "section_editors";
    /// Owning tenant.
    pub const CONTEXT_ID: &str = "context_id";
    /// Section.
    pub const SECTION_ID: &str = "section_id";
    /// Editor.
    pub const USER_ID: &str = "user_id";
}

/// `interests` relation (reviewing interest vocabulary).
pub mod interests {
    /// Name of the relation.
    pub const TABLE: &str = "interests";
    /// Primary key.
    pub const ID: &str = "interest_id";
    /// Interest label.
    pub const LABEL: &str = "label";
}

/// `user_interests` relation.
pub mod user_interests {
    /// Name of the relation.
    pub const TABLE: &str = "user_interests";
    /// Interested user.
    pub const USER_ID: &str = "user_id";
    /// Interest.
    pub const INTEREST_ID: &str = "interest_id";
}
