use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::approval::{ApprovalRecord, ApprovalStage, ApprovalStatus};
use crate::format::currency::parse_currency;
use crate::format::dates::parse_flexible_timestamp;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown document kind `{0}`")]
pub struct UnknownDocumentKind(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PurchaseRequest,
    Reimbursement,
    CashAdvance,
    Settlement,
    OutgoingPayment,
    ArInvoice,
}

/// How a document type's backend expects approval transitions to arrive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    /// `PATCH {base}/approval/{id}` carrying the full approval record.
    NestedApprovalPatch,
    /// `PUT {base}/approvals/{id}` carrying the full approval record.
    ApprovalsPut,
    /// `POST {base}/status` with `{id, UserId, StatusAt, Action, Remarks}`.
    StatusPost,
    /// `PATCH {base}/{role}/{id}/{approve|reject}` plus `POST {base}/revision/{id}`.
    RoleActionPatch,
}

impl TransitionStyle {
    /// Styles whose request body replaces the whole stored approval record.
    pub fn sends_full_record(&self) -> bool {
        matches!(self, Self::NestedApprovalPatch | Self::ApprovalsPut)
    }
}

const STANDARD_CHAIN: [ApprovalStage; 5] = [
    ApprovalStage::Prepared,
    ApprovalStage::Checked,
    ApprovalStage::Acknowledged,
    ApprovalStage::Approved,
    ApprovalStage::Received,
];

const CLOSABLE_CHAIN: [ApprovalStage; 6] = [
    ApprovalStage::Prepared,
    ApprovalStage::Checked,
    ApprovalStage::Acknowledged,
    ApprovalStage::Approved,
    ApprovalStage::Received,
    ApprovalStage::Closed,
];

impl DocumentKind {
    pub const ALL: [DocumentKind; 6] = [
        Self::PurchaseRequest,
        Self::Reimbursement,
        Self::CashAdvance,
        Self::Settlement,
        Self::OutgoingPayment,
        Self::ArInvoice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PurchaseRequest => "purchase_request",
            Self::Reimbursement => "reimbursement",
            Self::CashAdvance => "cash_advance",
            Self::Settlement => "settlement",
            Self::OutgoingPayment => "outgoing_payment",
            Self::ArInvoice => "ar_invoice",
        }
    }

    /// Ordered stages every document of this kind moves through.
    pub fn stages(&self) -> &'static [ApprovalStage] {
        match self {
            Self::CashAdvance | Self::Settlement => &CLOSABLE_CHAIN,
            _ => &STANDARD_CHAIN,
        }
    }

    pub fn transition_style(&self) -> TransitionStyle {
        match self {
            Self::ArInvoice => TransitionStyle::NestedApprovalPatch,
            Self::OutgoingPayment => TransitionStyle::ApprovalsPut,
            Self::Reimbursement => TransitionStyle::RoleActionPatch,
            Self::PurchaseRequest | Self::CashAdvance | Self::Settlement => {
                TransitionStyle::StatusPost
            }
        }
    }

    pub fn default_resource_path(&self) -> &'static str {
        match self {
            Self::PurchaseRequest => "/api/pr/item",
            Self::Reimbursement => "/api/reimbursements",
            Self::CashAdvance => "/api/cash-advance",
            Self::Settlement => "/api/settlements",
            Self::OutgoingPayment => "/api/staging-outgoing-payments",
            Self::ArInvoice => "/api/ar-invoices",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = UnknownDocumentKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "purchase_request" | "pr" => Ok(Self::PurchaseRequest),
            "reimbursement" | "reim" => Ok(Self::Reimbursement),
            "cash_advance" | "cash" | "ca" => Ok(Self::CashAdvance),
            "settlement" | "settle" => Ok(Self::Settlement),
            "outgoing_payment" | "op" => Ok(Self::OutgoingPayment),
            "ar_invoice" | "invoice" | "ar" => Ok(Self::ArInvoice),
            _ => Err(UnknownDocumentKind(value.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseRequestType {
    Item,
    Service,
}

/// A concrete REST collection: a document kind plus the base path it lives under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub kind: DocumentKind,
    pub base_path: String,
}

impl ResourceDescriptor {
    pub fn for_kind(kind: DocumentKind) -> Self {
        Self { kind, base_path: kind.default_resource_path().to_string() }
    }

    pub fn purchase_request(request_type: PurchaseRequestType) -> Self {
        let base_path = match request_type {
            PurchaseRequestType::Item => "/api/pr/item",
            PurchaseRequestType::Service => "/api/pr/service",
        };
        Self { kind: DocumentKind::PurchaseRequest, base_path: base_path.to_string() }
    }

    pub fn item_path(&self, id: &DocumentId) -> String {
        format!("{}/{}", self.base_path, id.as_str())
    }
}

const ID_KEYS: [&str; 5] = ["stagingID", "stagingId", "id", "Id", "docEntry"];
const NUMBER_KEYS: [&str; 7] =
    ["docNum", "voucherNo", "invoiceNo", "purchaseRequestNo", "cashAdvanceNo", "settlementNumber", "counterRef"];
const COUNTERPARTY_KEYS: [&str; 6] =
    ["cardName", "customerName", "employeeName", "requesterName", "payTo", "vendorName"];
const DATE_KEYS: [&str; 5] = ["docDate", "invoiceDate", "submissionDate", "postingDate", "createdAt"];
const AMOUNT_KEYS: [&str; 5] = ["docTotal", "totalAmount", "amount", "grandTotal", "trsfrSum"];
const APPROVAL_KEYS: [&str; 3] = ["approval", "arInvoiceApprovalSummary", "approvalSummary"];

/// Row shown on a dashboard, projected out of whatever shape a list endpoint returns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub kind: DocumentKind,
    pub document_number: String,
    pub counterparty: String,
    pub document_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub status: ApprovalStatus,
}

impl DocumentSummary {
    /// Projects a raw document. Returns `None` when no identifier is present.
    pub fn from_json(kind: DocumentKind, document: &Value) -> Option<Self> {
        let id = first_string(document, &ID_KEYS)?;

        Some(Self {
            id: DocumentId(id),
            kind,
            document_number: first_string(document, &NUMBER_KEYS).unwrap_or_default(),
            counterparty: first_string(document, &COUNTERPARTY_KEYS).unwrap_or_default(),
            document_date: first_string(document, &DATE_KEYS)
                .and_then(|raw| parse_flexible_timestamp(&raw))
                .map(|timestamp| timestamp.date_naive()),
            amount: first_amount(document, &AMOUNT_KEYS),
            status: status_of(document),
        })
    }
}

/// Approval record of a raw document: the nested approval object when
/// present, else approval fields stored flat on the document itself.
pub fn approval_of(document: &Value) -> Option<ApprovalRecord> {
    let nested = APPROVAL_KEYS
        .iter()
        .filter_map(|key| document.get(*key))
        .find(|value| value.is_object())
        .and_then(|value| serde_json::from_value::<ApprovalRecord>(value.clone()).ok());
    if nested.is_some() {
        return nested;
    }

    serde_json::from_value::<ApprovalRecord>(document.clone())
        .ok()
        .filter(|record| record.prepared_date.is_some() || record.prepared_by.is_some())
}

/// Current status of a raw document: approval sub-object first, then a
/// top-level `status`, else `Draft`.
pub fn status_of(document: &Value) -> ApprovalStatus {
    if let Some(record) = approval_of(document) {
        return record.effective_status();
    }

    ["approvalStatus", "status"]
        .iter()
        .filter_map(|key| document.get(*key).and_then(Value::as_str))
        .find_map(|raw| raw.parse().ok())
        .unwrap_or(ApprovalStatus::Draft)
}

fn first_string(document: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|key| document.get(*key)).find_map(|value| match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn first_amount(document: &Value, keys: &[&str]) -> Decimal {
    keys.iter()
        .filter_map(|key| document.get(*key))
        .find_map(|value| match value {
            Value::Number(number) => number.to_string().parse::<Decimal>().ok(),
            Value::String(text) => Some(parse_currency(text)),
            _ => None,
        })
        .unwrap_or(Decimal::ZERO)
}
