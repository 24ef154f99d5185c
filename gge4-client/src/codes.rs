//! Processor and bank response codes.
//!
//! The gateway forwards the issuing network's response code in
//! `bank_resp_code`. Every known code is listed here with its classification,
//! the display code used in the gateway's documentation, a short name, the
//! recommended merchant action and a longer comment.
//!
//! The table is sorted by code and never mutated; lookups are a binary search.
//!
//! # Examples
//!
//! ```
//! use gge4_client::codes::{self, Classification};
//!
//! let entry = codes::lookup(303).unwrap();
//! assert_eq!(entry.name, "Processor Decline");
//! assert_eq!(entry.classification, Classification::Decline);
//!
//! assert!(codes::lookup(42).is_none());
//! assert_eq!(codes::UNMAPPED.code, codes::UNMAPPED_CODE);
//! ```

use std::fmt;

use serde::Serialize;

/// Code reported when the gateway's answer cannot be tied to a known entry.
pub const UNMAPPED_CODE: u32 = 42;

/// How a response code affects the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    /// Transaction went through (`S`).
    Success,
    /// Request was rejected by the gateway or processor before reaching the issuer (`R`).
    Reject,
    /// Issuer declined the transaction (`D`).
    Decline,
    /// Rejected at authorization time or declined at settlement, depending on the
    /// transaction (`R/D`).
    RejectOrDecline,
}

impl Classification {
    /// Returns the letter code used in the gateway documentation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "S",
            Self::Reject => "R",
            Self::Decline => "D",
            Self::RejectOrDecline => "R/D",
        }
    }

    /// Returns true for [`Classification::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the response code table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseCodeEntry {
    /// Numeric code as sent in `bank_resp_code`.
    pub code: u32,
    /// Outcome class.
    pub classification: Classification,
    /// Zero-padded code as printed in the gateway documentation.
    pub display_code: &'static str,
    /// Short name, used as the error message.
    pub name: &'static str,
    /// Recommended action (`Fix`, `Cust`, `Resend`, `Call`, `Voice`, `Wait`, ...).
    pub action: &'static str,
    /// Longer description.
    pub comments: &'static str,
}

/// Fallback entry for codes that are missing from [`RESPONSE_CODES`].
pub static UNMAPPED: ResponseCodeEntry = ResponseCodeEntry {
    code: UNMAPPED_CODE,
    classification: Classification::Reject,
    display_code: "042",
    name: "Unmapped Response Code",
    action: "Call",
    comments: "The gateway reported an error code that is not listed in the processor response table",
};

/// Looks up a response code.
///
/// Returns `None` when the code is not in the table.
#[must_use]
pub fn lookup(code: u32) -> Option<&'static ResponseCodeEntry> {
    RESPONSE_CODES
        .binary_search_by_key(&code, |entry| entry.code)
        .ok()
        .map(|idx| &RESPONSE_CODES[idx])
}

/// Looks up a response code, falling back to [`UNMAPPED`].
#[must_use]
pub fn lookup_or_unmapped(code: u32) -> &'static ResponseCodeEntry {
    lookup(code).unwrap_or(&UNMAPPED)
}

const fn entry(
    code: u32,
    classification: Classification,
    display_code: &'static str,
    name: &'static str,
    action: &'static str,
    comments: &'static str,
) -> ResponseCodeEntry {
    ResponseCodeEntry { code, classification, display_code, name, action, comments }
}

use Classification::{Decline, Reject, RejectOrDecline, Success};

/// Every response code published for the gateway, sorted by `code`.
#[rustfmt::skip]
pub static RESPONSE_CODES: &[ResponseCodeEntry] = &[
    entry(0, Decline, "000", "No Answer", "Resend", "First Data received no answer from auth network"),
    entry(100, Success, "100", "Approved", "N/A", "Successfully approved"),
    entry(101, Success, "101", "Validated", "N/A", "Account Passed edit checks"),
    entry(102, Success, "102", "Verified", "N/A", "Account Passed external negative file"),
    entry(103, Success, "103", "Pre-Noted", "N/A", "Passed Pre-Note"),
    entry(104, Success, "104", "No Reason to Decline", "N/A", "Successfully approved"),
    entry(105, Success, "105", "Received and Stored", "N/A", "Successfully approved"),
    entry(106, Success, "106", "Provided Auth", "N/A", "Successfully approved Note: Indicates customized code was used in processing"),
    entry(107, Success, "107", "Request Received", "N/A", "Successfully approved Note: Indicates customized code was used in processing"),
    entry(108, Success, "108", "Approved for Activation", "N/A", "Successfully Activated"),
    entry(109, Success, "109", "Previously Processed Transaction", "N/A", "Transaction was not re-authorized with the Debit Network because it was previously processed"),
    entry(110, Success, "110", "BIN Alert", "N/A", "Successfully approved Note: Indicates customized code was used in processing"),
    entry(111, Success, "111", "Approved for Partial", "N/A", "Successfully approved Note: Indicates customized code was used in processing"),
    entry(164, Success, "164", "Conditional Approval", "Wait", "Conditional Approval - Hold shipping for 24 hours"),
    entry(201, Reject, "201", "Invalid CC Number", "Cust", "Bad check digit, length, or other credit card problem"),
    entry(202, Reject, "202", "Bad Amount Nonnumeric Amount", "If", "Amount sent was zero, unreadable, over ceiling limit, or exceeds maximum allowable amount."),
    entry(203, Reject, "203", "Zero Amount", "Fix", "Amount sent was zero"),
    entry(204, Reject, "204", "Other Error", "Fix", "Unidentifiable error"),
    entry(205, Reject, "205", "Bad Total Auth Amount", "Fix", "The sum of the authorization amount from extended data information does not equal detail record authorization Amount. Amount sent was zero, unreadable, over ceiling limit, or exceeds Maximum allowable amount."),
    entry(218, Reject, "218", "Invalid SKU Number", "Fix", "Non‐numeric value was sent"),
    entry(219, Reject, "219", "Invalid Credit Plan", "Fix", "Non‐numeric value was sent"),
    entry(220, Reject, "220", "Invalid Store Number", "Fix", "Non‐numeric value was sent"),
    entry(225, Reject, "225", "Invalid Field Data", "Fix", "Data within transaction is incorrect"),
    entry(227, Reject, "227", "Missing Companion Data", "Fix", "Specific and relevant data within transaction is absent"),
    entry(229, Reject, "229", "Percents do not total 100", "Fix", "FPO monthly payments do not total 100 Note: FPO only"),
    entry(230, Reject, "230", "Payments do not total 100", "Fix", "FPO monthly payments do not total 100 Note: FPO only"),
    entry(231, Reject, "231", "Invalid Division Number", "Fix", "Division number incorrect"),
    entry(233, Reject, "233", "Does not match MOP", "Fix", "Credit card number does not match method of payment type or invalid BIN"),
    entry(234, Reject, "234", "Duplicate Order Number", "Fix", "Unique to authorization recycle transactions. Order number already exists in system Note: Auth Recycle only"),
    entry(235, Reject, "235", "FPO Locked", "Resend", "FPO change not allowed Note: FPO only"),
    entry(236, Reject, "236", "Auth Recycle Host System Down", "Resend", "Authorization recycle host system temporarily unavailable Note: Auth Recycle only"),
    entry(237, Reject, "237", "FPO Not Approved", "Call", "Division does not participate in FPO. Contact your First Data Representative for information on getting set up for FPO Note: FPO only"),
    entry(238, Reject, "238", "Invalid Currency", "Fix", "Currency does not match First Data merchant setup for division"),
    entry(239, Reject, "239", "Invalid MOP for Division", "Fix", "Method of payment is invalid for the division"),
    entry(240, Reject, "240", "Auth Amount for Division", "Fix", "Used by FPO"),
    entry(241, Reject, "241", "Illegal Action", "Fix", "Invalid action attempted"),
    entry(243, Reject, "243", "Invalid Purchase Level 3", "Fix", "Data is inaccurate or missing, or the BIN is ineligible for P‐card"),
    entry(244, Reject, "244", "Invalid Encryption Format", "Fix", "Invalid encryption flag. Data is Inaccurate."),
    entry(245, Reject, "245", "Missing or Invalid Secure Payment Data", "Fix", "Visa or MasterCard authentication data not in appropriate Base 64 encoding format or data provided on A non‐e‐Commerce transaction."),
    entry(246, Reject, "246", "Merchant not MasterCard Secure code Enabled", "Call", "Division does not participate in MasterCard Secure Code. Contact your First Data Representative for information on getting setup for MasterCard SecureCode."),
    entry(247, Reject, "247", "Check conversion Data Error", "Fix", "Proper data elements were not sent"),
    entry(248, Reject, "248", "Blanks not passed in reserved field", "Fix", "Blanks not passed in Reserved Field"),
    entry(249, Reject, "249", "Invalid (MCC)", "Fix", "Invalid Merchant Category (MCC) sent"),
    entry(251, Reject, "251", "Invalid Start Date", "Fix", "Incorrect start date or card may require an issue number, but a start date was submitted."),
    entry(252, Reject, "252", "Invalid Issue Number", "Fix", "Issue number invalid for this BIN."),
    entry(253, Reject, "253", "Invalid Tran. Type", "Fix", "If an “R” (Retail Indicator) is sent for a transaction with a MOTO Merchant Category Code (MCC)"),
    entry(257, Reject, "257", "Missing Cust Service Phone", "Fix", "Card was authorized, but AVS did not match. The 100 was overwritten with a 260 per the merchant’s request Note: Conditional deposits only"),
    entry(258, Reject, "258", "Not Authorized to Send Record", "Call", "Division does not participate in Soft Merchant Descriptor. Contact your First Data Representative for information on getting set up for Soft Merchant Descriptor."),
    entry(260, Decline, "260", "Soft AVS", "Cust.", "Authorization network could not reach the bank which issued the card"),
    entry(261, Reject, "261", "Account Not Eligible For Division’s Setup", "N/A", "Account number not eligible for division’s Account Updater program setup"),
    entry(262, Reject, "262", "Authorization Code Response Date Invalid", "Fix", "Authorization code and/or response date are invalid. Note: MOP = MC, MD, VI only"),
    entry(263, Reject, "263", "Partial Authorization Not Allowed or Partial Authorization Request Note Valid", "Fix", "Action code or division does not allow partial authorizations or partial authorization request is not valid."),
    entry(264, Reject, "264", "Duplicate Deposit Transaction", "N/A", "Transaction is a duplicate of a previously deposited transaction. Transaction will not be processed."),
    entry(265, Reject, "265", "Missing QHP Amount", "Fix", "Missing QHP Amount"),
    entry(266, Reject, "266", "Invalid QHP Amount", "Fix", "QHP amount greater than transaction amount"),
    entry(274, Reject, "274", "Transaction Not Supported", "N/A", "The requested transaction type is blocked from being used with this card. Note: This may be the result of either an association rule, or a merchant boarding option."),
    entry(301, Decline, "301", "Issuer unavailable", "Resend", "Authorization network could not reach the bank which issued the card"),
    entry(302, Decline, "302", "Credit Floor", "Wait", "Insufficient funds"),
    entry(303, Decline, "303", "Processor Decline", "Cust.", "Generic decline – No other information is being provided by the Issuer"),
    entry(304, Decline, "304", "Not On File", "Cust.", "No card record, or invalid/nonexistent to account specified"),
    entry(305, Decline, "305", "Already Reversed", "N/A", "Transaction previously reversed. Note: MOP = any Debit MOP, SV, MC, MD, VI only"),
    entry(306, Decline, "306", "Amount Mismatch", "Fix", "Requested reversal amount does not match original approved authorization amount. Note: MOP = MC, MD, VI only"),
    entry(307, Decline, "307", "Authorization Not Found", "Fix", "Transaction cannot be matched to an authorization that was stored in the database. Note: MOP = MC, MD, VI only"),
    entry(351, Reject, "351", "TransArmor Service Unavailable", "Resend", "TransArmor Service temporarily unavailable."),
    entry(352, Decline, "352", "Expired Lock", "Cust.", "ValueLink - Lock on funds has expired."),
    entry(353, Reject, "353", "TransArmor Invalid Token or PAN", "Fix", "TransArmor Service encountered a problem converting the given Token or PAN with the given Token Type."),
    entry(354, Reject, "354", "TransArmor Invalid Result", "Cust", "TransArmor Service encountered a problem with the resulting Token/PAN."),
    entry(401, Decline, "401", "Call", "Voice", "Issuer wants voice contact with cardholder"),
    entry(402, Decline, "402", "Default Call", "Voice", "Decline"),
    entry(501, Decline, "501", "Pickup", "Cust", "Card Issuer wants card returned"),
    entry(502, Decline, "502", "Lost/Stolen", "Cust", "Card reported as lost/stolen Note: Does not apply to American Express"),
    entry(503, Decline, "503", "Fraud/ Security Violation", "Cust", "CID did not match Note: Discover only"),
    entry(505, Decline, "505", "Negative File", "Cust", "On negative file"),
    entry(508, Decline, "508", "Excessive PIN try", "Cust", "Allowable number of PIN tries exceeded"),
    entry(509, Decline, "509", "Over the limit", "Cust", "Exceeds withdrawal or activity amount limit"),
    entry(510, Decline, "510", "Over Limit Frequency", "Cust", "Exceeds withdrawal or activity count limit"),
    entry(519, Decline, "519", "On negative file", "Cust", "Account number appears on negative file"),
    entry(521, Decline, "521", "Insufficient funds", "Cust", "Insufficient funds/over credit limit"),
    entry(522, Decline, "522", "Card is expired", "Cust", "Card has expired"),
    entry(524, Decline, "524", "Altered Data", "Fix", "Altered Data\\Magnetic stripe incorrect"),
    entry(530, Decline, "530", "Do Not Honor", "Cust", "Generic Decline – No other information is being provided by the issuer. Note: This is a hard decline for BML (will never pass with recycle attempts)"),
    entry(531, Decline, "531", "CVV2/VAK Failure", "Cust", "Issuer has declined auth request because CVV2 or VAK failed"),
    entry(534, Decline, "534", "Do Not Honor - High Fraud", "Cust", "The transaction has failed PayPal or Google Checkout risk models"),
    entry(570, Decline, "570", "Stop payment order one time recurring/ installment", "Fix", "Cardholder has requested this one recurring/installment payment be stopped."),
    entry(571, Decline, "571", "Revocation of Authorization for All Recurring / Installments", "Cust", "Cardholder has requested all recurring/installment payments be stopped"),
    entry(572, Decline, "572", "Revocation of All Authorizations – Closed Account", "Cust", "Cardholder has requested that all authorizations be stopped for this account due to closed account. Note: Visa only"),
    entry(580, Decline, "580", "Account previously activated", "Cust", "Account previously activated"),
    entry(581, Decline, "581", "Unable to void", "Fix", "Unable to void"),
    entry(582, Decline, "582", "Block activation failed", "Fix", "Reserved for Future Use"),
    entry(583, Decline, "583", "Block Activation Failed", "Fix", "Reserved for Future Use"),
    entry(584, Decline, "584", "Issuance Does Not Meet Minimum Amount", "Fix", "Issuance does not meet minimum amount"),
    entry(585, Decline, "585", "No Original Authorization Found", "N/A", "No original authorization found"),
    entry(586, Decline, "586", "Outstanding Authorization, Funds on Hold", "N/A", "Outstanding Authorization, funds on hold"),
    entry(587, Decline, "587", "Activation Amount Incorrect", "Fix", "Activation amount incorrect"),
    entry(588, Decline, "588", "Block Activation Failed", "Fix", "Reserved for Future Use"),
    entry(589, Decline, "589", "CVD Value Failure", "Cust", "Magnetic stripe CVD value failure"),
    entry(590, Decline, "590", "Maximum Redemption Limit Met", "Cust", "Maximum redemption limit met"),
    entry(591, Decline, "591", "Invalid CC Number", "Cust", "Bad check digit, length or other credit card problem. Issuer generated"),
    entry(592, Decline, "592", "Bad Amount", "Fix", "Amount sent was zero or unreadable. Issuer generated"),
    entry(594, Decline, "594", "Other Error", "Fix", "Unidentifiable error. Issuer generated"),
    entry(595, Decline, "595", "New Card Issued", "Cust", "New Card Issued"),
    entry(596, Decline, "596", "Suspected Fraud", "Cust", "Issuer has flagged account as suspected fraud"),
    entry(599, Decline, "599", "Refund Not Allowed", "N/A", "Refund Not Allowed"),
    entry(602, Decline, "602", "Invalid Institution Code", "Fix", "Card is bad, but passes MOD 10 check digit routine, wrong BIN"),
    entry(603, Decline, "603", "Invalid Institution", "Cust", "Institution not valid (i.e. possible merger)"),
    entry(605, Decline, "605", "Invalid Expiration Date", "Cust", "Card has expired or bad date sent. Confirm proper date"),
    entry(606, Decline, "606", "Invalid Transaction Type", "Cust", "Issuer does not allow this type of transaction"),
    entry(607, Decline, "607", "Invalid Amount", "Fix", "Amount not accepted by network"),
    entry(610, Decline, "610", "BIN Block", "Cust", "Merchant has requested First Data not process credit cards with this BIN"),
    entry(704, Success, "704", "FPO Accepted", "N/A", "Stored in FPO database"),
    entry(740, Reject, "740", "Match Failed", "Fix", "Unable to validate the debit. Authorization Record - based on amount, action code, and MOP (Batch response reason code for Debit Only)"),
    entry(741, RejectOrDecline, "741", "Validation Failed", "Fix", "Unable to validate the Debit Authorization Record - based on amount, action code, and MOP (Batch response reason code for Debit Only)"),
    entry(750, RejectOrDecline, "750", "Invalid Transit Routing Number", "Fix", "EC - ABA transit routing number is invalid, failed check digit"),
    entry(751, RejectOrDecline, "751", "Transit Routing Number Unknown", "Fix", "Transit routing number not on list of current acceptable numbers."),
    entry(752, Reject, "752", "Missing Name", "Fix", "Pertains to deposit transactions only"),
    entry(753, Reject, "753", "Invalid Account Type", "Fix", "Pertains to deposit transactions only"),
    entry(754, RejectOrDecline, "754", "Account Closed", "Cust", "Bank account has been closed For PayPal and GoogleCheckout – the customer’s account was closed / restricted"),
    entry(802, Decline, "802", "Positive ID", "Voice", "Issuer requires further information"),
    entry(806, Decline, "806", "Restraint", "Cust", "Card has been restricted"),
    entry(811, Decline, "811", "Invalid Security Code", "Fix", "American Express CID is incorrect"),
    entry(813, Decline, "813", "Invalid PIN", "Cust", "PIN for online debit transactions is incorrect"),
    entry(825, Decline, "825", "No Account", "Cust", "Account does not exist"),
    entry(833, Decline, "833", "Invalid Merchant", "Fix", "Service Established (SE) number is incorrect, closed or Issuer does not allow this type of transaction"),
    entry(834, Reject, "834", "Unauthorized User", "Fix", "Method of payment is invalid for the division"),
    entry(902, Decline, "902", "Process Unavailable", "Resend/ Call/ Cust.", "System error/malfunction with Issuer For Debit – The link is down or setup issue; contact your First Data Representative."),
    entry(903, Decline, "903", "Invalid Expiration", "Cust", "Invalid or expired expiration date"),
    entry(904, Decline, "904", "Invalid Effective", "Cust./ Resend", "Card not active"),
];
