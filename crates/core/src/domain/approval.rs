use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::format::dates::optional_timestamp;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown approval status `{0}`")]
pub struct UnknownStatus(pub String);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown approver role `{0}`")]
pub struct UnknownRole(pub String);

/// Document state as reported by the backend.
///
/// The wire spelling drifts between document types (`Acknowledge` vs
/// `Acknowledged`, `Revision` vs `Revised`); parsing accepts every observed
/// variant and serialization always emits the past-tense form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApprovalStatus {
    Draft,
    Prepared,
    Checked,
    Acknowledged,
    Approved,
    Received,
    Rejected,
    Revised,
    Closed,
}

impl ApprovalStatus {
    pub const ALL: [ApprovalStatus; 9] = [
        Self::Draft,
        Self::Prepared,
        Self::Checked,
        Self::Acknowledged,
        Self::Approved,
        Self::Received,
        Self::Rejected,
        Self::Revised,
        Self::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Prepared => "Prepared",
            Self::Checked => "Checked",
            Self::Acknowledged => "Acknowledged",
            Self::Approved => "Approved",
            Self::Received => "Received",
            Self::Rejected => "Rejected",
            Self::Revised => "Revised",
            Self::Closed => "Closed",
        }
    }

    /// The stage this status records, if it is a stage status at all.
    pub fn stage(&self) -> Option<ApprovalStage> {
        match self {
            Self::Prepared => Some(ApprovalStage::Prepared),
            Self::Checked => Some(ApprovalStage::Checked),
            Self::Acknowledged => Some(ApprovalStage::Acknowledged),
            Self::Approved => Some(ApprovalStage::Approved),
            Self::Received => Some(ApprovalStage::Received),
            Self::Closed => Some(ApprovalStage::Closed),
            Self::Draft | Self::Rejected | Self::Revised => None,
        }
    }

    /// Rejection and revision branch off the chain and carry a mandatory reason.
    pub fn requires_reason(&self) -> bool {
        matches!(self, Self::Rejected | Self::Revised)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "prepared" | "prepare" => Ok(Self::Prepared),
            "checked" | "check" => Ok(Self::Checked),
            "acknowledged" | "acknowledge" => Ok(Self::Acknowledged),
            "approved" | "approve" => Ok(Self::Approved),
            "received" | "receive" => Ok(Self::Received),
            "rejected" | "reject" => Ok(Self::Rejected),
            "revised" | "revise" | "revision" => Ok(Self::Revised),
            "closed" | "close" => Ok(Self::Closed),
            _ => Err(UnknownStatus(value.to_string())),
        }
    }
}

impl TryFrom<String> for ApprovalStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApprovalStatus> for String {
    fn from(value: ApprovalStatus) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApprovalStage {
    Prepared,
    Checked,
    Acknowledged,
    Approved,
    Received,
    Closed,
}

impl ApprovalStage {
    pub fn status(&self) -> ApprovalStatus {
        match self {
            Self::Prepared => ApprovalStatus::Prepared,
            Self::Checked => ApprovalStatus::Checked,
            Self::Acknowledged => ApprovalStatus::Acknowledged,
            Self::Approved => ApprovalStatus::Approved,
            Self::Received => ApprovalStatus::Received,
            Self::Closed => ApprovalStatus::Closed,
        }
    }

    /// Verb form used as `StatusAt` by the shared status endpoint.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Prepared => "Prepare",
            Self::Checked => "Check",
            Self::Acknowledged => "Acknowledge",
            Self::Approved => "Approve",
            Self::Received => "Receive",
            Self::Closed => "Close",
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::Prepared => Role::Preparer,
            Self::Checked => Role::Checker,
            Self::Acknowledged => Role::Acknowledger,
            Self::Approved => Role::Approver,
            Self::Received => Role::Receiver,
            Self::Closed => Role::Closer,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Preparer,
    Checker,
    Acknowledger,
    Approver,
    Receiver,
    Closer,
}

impl Role {
    pub fn stage(&self) -> ApprovalStage {
        match self {
            Self::Preparer => ApprovalStage::Prepared,
            Self::Checker => ApprovalStage::Checked,
            Self::Acknowledger => ApprovalStage::Acknowledged,
            Self::Approver => ApprovalStage::Approved,
            Self::Receiver => ApprovalStage::Received,
            Self::Closer => ApprovalStage::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preparer => "preparer",
            Self::Checker => "checker",
            Self::Acknowledger => "acknowledger",
            Self::Approver => "approver",
            Self::Receiver => "receiver",
            Self::Closer => "closer",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "preparer" => Ok(Self::Preparer),
            "checker" => Ok(Self::Checker),
            "acknowledger" => Ok(Self::Acknowledger),
            "approver" => Ok(Self::Approver),
            "receiver" => Ok(Self::Receiver),
            "closer" => Ok(Self::Closer),
            _ => Err(UnknownRole(value.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// Who executed a stage and when.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StageStamp {
    pub by: Option<String>,
    pub by_name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Approval sub-object attached to every document, in the backend's field layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    #[serde(default)]
    pub approval_status: Option<ApprovalStatus>,

    #[serde(default)]
    pub prepared_by: Option<String>,
    #[serde(default)]
    pub prepared_by_name: Option<String>,
    #[serde(default, with = "optional_timestamp")]
    pub prepared_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub checked_by: Option<String>,
    #[serde(default)]
    pub checked_by_name: Option<String>,
    #[serde(default, with = "optional_timestamp")]
    pub checked_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub acknowledged_by: Option<String>,
    #[serde(default)]
    pub acknowledged_by_name: Option<String>,
    #[serde(default, with = "optional_timestamp")]
    pub acknowledged_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub approved_by_name: Option<String>,
    #[serde(default, with = "optional_timestamp")]
    pub approved_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub received_by: Option<String>,
    #[serde(default)]
    pub received_by_name: Option<String>,
    #[serde(default, with = "optional_timestamp")]
    pub received_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub closed_by: Option<String>,
    #[serde(default)]
    pub closed_by_name: Option<String>,
    #[serde(default, with = "optional_timestamp")]
    pub closed_date: Option<DateTime<Utc>>,

    #[serde(default, with = "optional_timestamp")]
    pub rejected_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_remarks: Option<String>,

    #[serde(default)]
    pub revision_number: Option<u32>,
    #[serde(default, with = "optional_timestamp")]
    pub revision_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub revision_remarks: Option<String>,
}

impl ApprovalRecord {
    pub fn prepared(actor: &Actor, at: DateTime<Utc>) -> Self {
        let mut record = Self { approval_status: Some(ApprovalStatus::Prepared), ..Self::default() };
        record.stamp(ApprovalStage::Prepared, actor, at);
        record
    }

    pub fn stamp_of(&self, stage: ApprovalStage) -> StageStamp {
        let (by, by_name, date) = match stage {
            ApprovalStage::Prepared => (&self.prepared_by, &self.prepared_by_name, self.prepared_date),
            ApprovalStage::Checked => (&self.checked_by, &self.checked_by_name, self.checked_date),
            ApprovalStage::Acknowledged => {
                (&self.acknowledged_by, &self.acknowledged_by_name, self.acknowledged_date)
            }
            ApprovalStage::Approved => (&self.approved_by, &self.approved_by_name, self.approved_date),
            ApprovalStage::Received => (&self.received_by, &self.received_by_name, self.received_date),
            ApprovalStage::Closed => (&self.closed_by, &self.closed_by_name, self.closed_date),
        };
        StageStamp { by: by.clone(), by_name: by_name.clone(), date }
    }

    pub fn stamp(&mut self, stage: ApprovalStage, actor: &Actor, at: DateTime<Utc>) {
        let (by, by_name, date) = match stage {
            ApprovalStage::Prepared => {
                (&mut self.prepared_by, &mut self.prepared_by_name, &mut self.prepared_date)
            }
            ApprovalStage::Checked => {
                (&mut self.checked_by, &mut self.checked_by_name, &mut self.checked_date)
            }
            ApprovalStage::Acknowledged => (
                &mut self.acknowledged_by,
                &mut self.acknowledged_by_name,
                &mut self.acknowledged_date,
            ),
            ApprovalStage::Approved => {
                (&mut self.approved_by, &mut self.approved_by_name, &mut self.approved_date)
            }
            ApprovalStage::Received => {
                (&mut self.received_by, &mut self.received_by_name, &mut self.received_date)
            }
            ApprovalStage::Closed => {
                (&mut self.closed_by, &mut self.closed_by_name, &mut self.closed_date)
            }
        };
        *by = Some(actor.id.clone());
        *by_name = Some(actor.name.clone());
        *date = Some(at);
    }

    /// Declared status, or the latest stage evidenced by the stamped dates.
    pub fn effective_status(&self) -> ApprovalStatus {
        if let Some(status) = self.approval_status {
            return status;
        }

        let evidence = [
            (self.rejected_date, ApprovalStatus::Rejected),
            (self.closed_date, ApprovalStatus::Closed),
            (self.received_date, ApprovalStatus::Received),
            (self.approved_date, ApprovalStatus::Approved),
            (self.acknowledged_date, ApprovalStatus::Acknowledged),
            (self.checked_date, ApprovalStatus::Checked),
            (self.prepared_date, ApprovalStatus::Prepared),
        ];
        evidence
            .into_iter()
            .find_map(|(date, status)| date.map(|_| status))
            .unwrap_or(ApprovalStatus::Draft)
    }

    /// Copy of this record moved to `target`, preserving every earlier stamp.
    pub fn advanced(
        &self,
        target: ApprovalStatus,
        actor: &Actor,
        at: DateTime<Utc>,
        remarks: Option<&str>,
    ) -> Self {
        let mut next = self.clone();
        next.approval_status = Some(target);

        match target {
            ApprovalStatus::Rejected => {
                next.rejected_date = Some(at);
                next.rejection_remarks = remarks.map(|value| value.trim().to_string());
            }
            ApprovalStatus::Revised => {
                next.revision_number = Some(self.revision_number.unwrap_or(0) + 1);
                next.revision_date = Some(at);
                next.revision_remarks = remarks.map(|value| value.trim().to_string());
            }
            ApprovalStatus::Draft => {}
            stage_status => {
                if let Some(stage) = stage_status.stage() {
                    next.stamp(stage, actor, at);
                }
            }
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{Actor, ApprovalRecord, ApprovalStage, ApprovalStatus};

    #[test]
    fn status_parsing_accepts_observed_spelling_drift() {
        assert_eq!("Acknowledge".parse::<ApprovalStatus>(), Ok(ApprovalStatus::Acknowledged));
        assert_eq!(" acknowledged ".parse::<ApprovalStatus>(), Ok(ApprovalStatus::Acknowledged));
        assert_eq!("Revision".parse::<ApprovalStatus>(), Ok(ApprovalStatus::Revised));
        assert_eq!("CLOSE".parse::<ApprovalStatus>(), Ok(ApprovalStatus::Closed));
        assert!("Pending".parse::<ApprovalStatus>().is_err());
    }

    #[test]
    fn status_serializes_with_canonical_spelling() {
        let status: ApprovalStatus = serde_json::from_value(json!("Acknowledge")).expect("alias");
        assert_eq!(serde_json::to_value(status).expect("serialize"), json!("Acknowledged"));
    }

    #[test]
    fn record_decodes_backend_layout() {
        let record: ApprovalRecord = serde_json::from_value(json!({
            "approvalStatus": "Checked",
            "preparedBy": "u-1",
            "preparedByName": "Rina",
            "preparedDate": "2025-03-01T08:00:00",
            "checkedBy": "u-2",
            "checkedByName": "Budi",
            "checkedDate": "2025-03-02T09:30:00Z",
            "rejectionRemarks": null,
            "revisionNumber": null
        }))
        .expect("decode record");

        assert_eq!(record.approval_status, Some(ApprovalStatus::Checked));
        assert_eq!(record.stamp_of(ApprovalStage::Checked).by_name.as_deref(), Some("Budi"));
        assert!(record.prepared_date.is_some());
        assert!(record.acknowledged_date.is_none());
    }

    #[test]
    fn effective_status_falls_back_to_latest_stamped_date() {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).single().expect("timestamp");
        let mut record = ApprovalRecord::default();
        assert_eq!(record.effective_status(), ApprovalStatus::Draft);

        record.prepared_date = Some(at);
        record.checked_date = Some(at);
        assert_eq!(record.effective_status(), ApprovalStatus::Checked);

        record.rejected_date = Some(at);
        assert_eq!(record.effective_status(), ApprovalStatus::Rejected);
    }

    #[test]
    fn advancing_preserves_earlier_stamps() {
        let preparer = Actor::new("u-1", "Rina");
        let checker = Actor::new("u-2", "Budi");
        let prepared_at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).single().expect("timestamp");
        let checked_at = Utc.with_ymd_and_hms(2025, 3, 2, 8, 0, 0).single().expect("timestamp");

        let record = ApprovalRecord::prepared(&preparer, prepared_at);
        let checked = record.advanced(ApprovalStatus::Checked, &checker, checked_at, None);

        assert_eq!(checked.approval_status, Some(ApprovalStatus::Checked));
        assert_eq!(checked.prepared_by.as_deref(), Some("u-1"));
        assert_eq!(checked.checked_by.as_deref(), Some("u-2"));
        assert_eq!(checked.checked_date, Some(checked_at));
    }

    #[test]
    fn revision_increments_revision_number() {
        let actor = Actor::new("u-3", "Sari");
        let at = Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0).single().expect("timestamp");
        let record = ApprovalRecord { revision_number: Some(1), ..ApprovalRecord::default() };

        let revised = record.advanced(ApprovalStatus::Revised, &actor, at, Some("  fix totals "));

        assert_eq!(revised.revision_number, Some(2));
        assert_eq!(revised.revision_remarks.as_deref(), Some("fix totals"));
        assert_eq!(revised.revision_date, Some(at));
    }
}
