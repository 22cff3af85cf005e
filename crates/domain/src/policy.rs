use serde::{Deserialize, Serialize};

use crate::{PolicyConditionId, PolicyId, ProjectId};

wire_enum!(
    /// How conditions of a policy combine.
    PolicyOperator, "policy operator" {
        /// Every condition must match.
        All => "ALL",
        /// Any condition may match.
        Any => "ANY",
    }
);

wire_enum!(
    /// Violation state raised by a policy.
    ViolationState, "violation state" {
        /// Informational.
        Info => "INFO",
        /// Warning.
        Warn => "WARN",
        /// Failure.
        Fail => "FAIL",
    }
);

impl Default for PolicyOperator {
    fn default() -> Self {
        Self::All
    }
}

impl Default for ViolationState {
    fn default() -> Self {
        Self::Info
    }
}

wire_enum!(
    /// Attribute a policy condition inspects.
    ConditionSubject, "policy condition subject" {
        /// Component age.
        Age => "AGE",
        /// Group, name and version coordinates.
        Coordinates => "COORDINATES",
        /// CPE.
        Cpe => "CPE",
        /// License.
        License => "LICENSE",
        /// License group.
        LicenseGroup => "LICENSE_GROUP",
        /// Package URL.
        PackageUrl => "PACKAGE_URL",
        /// Vulnerability severity.
        Severity => "SEVERITY",
        /// SWID tag identifier.
        SwidTagId => "SWID_TAGID",
        /// Component version.
        Version => "VERSION",
        /// Component hash.
        ComponentHash => "COMPONENT_HASH",
        /// CWE identifier.
        Cwe => "CWE",
        /// Vulnerability identifier.
        VulnerabilityId => "VULNERABILITY_ID",
        /// Distance to the latest version.
        VersionDistance => "VERSION_DISTANCE",
        /// EPSS score.
        Epss => "EPSS",
    }
);

wire_enum!(
    /// Comparison a policy condition applies.
    ConditionOperator, "policy condition operator" {
        /// Equal.
        Is => "IS",
        /// Not equal.
        IsNot => "IS_NOT",
        /// Regular expression match.
        Matches => "MATCHES",
        /// Regular expression mismatch.
        NoMatch => "NO_MATCH",
        /// Numeric greater than.
        NumericGreaterThan => "NUMERIC_GREATER_THAN",
        /// Numeric less than.
        NumericLessThan => "NUMERIC_LESS_THAN",
        /// Numeric equal.
        NumericEqual => "NUMERIC_EQUAL",
        /// Numeric not equal.
        NumericNotEqual => "NUMERIC_NOT_EQUAL",
        /// Numeric greater than or equal.
        NumericGreaterThanOrEqual => "NUMERIC_GREATER_THAN_OR_EQUAL",
        /// Numeric less than or equal.
        NumericLesserThanOrEqual => "NUMERIC_LESSER_THAN_OR_EQUAL",
        /// Contains all values.
        ContainsAll => "CONTAINS_ALL",
        /// Contains any value.
        ContainsAny => "CONTAINS_ANY",
    }
);

/// Desired policy attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyInput {
    /// Policy name.
    pub name: String,
    /// Condition combinator.
    pub operator: PolicyOperator,
    /// Raised violation state.
    pub violation_state: ViolationState,
}

/// Desired policy condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConditionInput {
    /// Inspected attribute.
    pub subject: ConditionSubject,
    /// Comparison.
    pub operator: ConditionOperator,
    /// Compared value.
    pub value: String,
}

/// Policy condition as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCondition {
    /// Server-assigned identifier.
    pub id: PolicyConditionId,
    /// Inspected attribute.
    pub subject: ConditionSubject,
    /// Comparison.
    pub operator: ConditionOperator,
    /// Compared value.
    pub value: String,
}

/// Policy as reported by the server.
///
/// `include_children` and `global` are computed by the server, which resets
/// them on every write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Server-assigned identifier.
    pub id: PolicyId,
    /// Policy name.
    pub name: String,
    /// Condition combinator.
    pub operator: PolicyOperator,
    /// Raised violation state.
    pub violation_state: ViolationState,
    /// Conditions in server order.
    pub conditions: Vec<PolicyCondition>,
    /// Projects the policy is limited to.
    pub projects: Vec<ProjectId>,
    /// Whether child projects inherit the policy.
    pub include_children: bool,
    /// Whether the policy applies to every project.
    pub global: bool,
}
