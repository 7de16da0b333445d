//! AI assistant connector.
//!
//! # Responsibility
//! - Build prompts from CRM records and a serialized snapshot.
//! - Turn every transport or parse failure into a fixed fallback value.
//!
//! # Invariants
//! - Public operations never return errors.
//! - Empty responses map to the per-operation "empty" fallback.

use crate::controller::AppState;
use crate::model::activity::ActivityLogEntry;
use crate::model::contact::Contact;
use crate::model::deal::Deal;
use crate::model::notification::Notification;
use crate::model::profile::UserProfile;
use crate::model::task::Task;
use log::{info, warn};
use serde::{Deserialize, Serialize};

pub mod gemini;
pub mod prompt;
pub mod transport;

pub use gemini::GeminiTransport;
pub use transport::{AssistantError, AssistantResult, GenerateRequest, GenerativeTransport};

pub const QUERY_EMPTY: &str = "I couldn't find an answer to that.";
pub const QUERY_FAILED: &str = "Sorry, I could not process your request right now.";
pub const ANALYSIS_FAILED: &str = "Could not analyze deal at this time.";
pub const ANALYSIS_FAILED_ACTION: &str = "Review manually.";
pub const EMAIL_EMPTY: &str = "Unable to generate draft.";
pub const EMAIL_FAILED: &str = "Error generating email. Please check your API key.";
pub const SUMMARY_EMPTY: &str = "No summary available.";
pub const SUMMARY_FAILED: &str = "Error summarizing contact.";

/// Borrowed view of every collection, serialized into query prompts.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CrmSnapshot<'a> {
    pub contacts: &'a [Contact],
    pub deals: &'a [Deal],
    pub tasks: &'a [Task],
    pub activities: &'a [ActivityLogEntry],
    pub notifications: &'a [Notification],
    pub profile: &'a UserProfile,
}

impl<'a> CrmSnapshot<'a> {
    pub fn from_state(state: &'a AppState) -> Self {
        Self {
            contacts: &state.contacts,
            deals: &state.deals,
            tasks: &state.tasks,
            activities: &state.activities,
            notifications: &state.notifications,
            profile: &state.profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealAnalysis {
    pub analysis: String,
    /// Empty when the model omitted it.
    #[serde(default)]
    pub recommended_action: String,
}

impl DealAnalysis {
    pub fn fallback() -> Self {
        Self {
            analysis: ANALYSIS_FAILED.to_string(),
            recommended_action: ANALYSIS_FAILED_ACTION.to_string(),
        }
    }
}

pub struct AssistantService<T: GenerativeTransport> {
    transport: T,
}

impl<T: GenerativeTransport> AssistantService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Free-form question about the current CRM data. Returns Markdown text.
    pub fn answer_query(&self, query: &str, snapshot: &CrmSnapshot<'_>) -> String {
        let request = serde_json::to_string_pretty(snapshot)
            .map(|json| GenerateRequest::text(prompt::answer_query(query, &json)))
            .map_err(|err| AssistantError::Parse(err.to_string()));
        self.text_or_fallback(
            "answer_query",
            request.and_then(|request| self.transport.generate(&request)),
            QUERY_EMPTY,
            QUERY_FAILED,
        )
    }

    /// Risk analysis plus one next step. Code fences around the JSON are tolerated.
    pub fn analyze_deal(&self, deal: &Deal, contact: &Contact) -> DealAnalysis {
        match self.try_analyze_deal(deal, contact) {
            Ok(analysis) => {
                info!(
                    "event=assistant_call module=assistant status=ok op=analyze_deal deal_id={}",
                    deal.id
                );
                analysis
            }
            Err(err) => {
                warn!(
                    "event=assistant_call module=assistant status=fallback op=analyze_deal deal_id={} error_kind={}",
                    deal.id,
                    err.kind()
                );
                DealAnalysis::fallback()
            }
        }
    }

    pub fn generate_email_draft(&self, contact: &Contact, context: &str) -> String {
        let request = GenerateRequest::text(prompt::email_draft(contact, context));
        self.text_or_fallback(
            "generate_email_draft",
            self.transport.generate(&request),
            EMAIL_EMPTY,
            EMAIL_FAILED,
        )
    }

    /// HTML bullet list summarizing `notes` for the contact.
    pub fn summarize_contact_history(&self, contact: &Contact, notes: &[String]) -> String {
        let request = GenerateRequest::text(prompt::contact_summary(contact, notes));
        self.text_or_fallback(
            "summarize_contact_history",
            self.transport.generate(&request),
            SUMMARY_EMPTY,
            SUMMARY_FAILED,
        )
    }

    fn try_analyze_deal(&self, deal: &Deal, contact: &Contact) -> AssistantResult<DealAnalysis> {
        let request = GenerateRequest::json(prompt::analyze_deal(deal, contact));
        let raw = self.transport.generate(&request)?;
        let cleaned = prompt::strip_code_fences(&raw);
        if cleaned.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        serde_json::from_str(&cleaned).map_err(|err| AssistantError::Parse(err.to_string()))
    }

    fn text_or_fallback(
        &self,
        op: &str,
        result: AssistantResult<String>,
        empty: &str,
        failed: &str,
    ) -> String {
        match result {
            Ok(text) if text.trim().is_empty() => {
                warn!("event=assistant_call module=assistant status=empty op={op}");
                empty.to_string()
            }
            Ok(text) => {
                info!(
                    "event=assistant_call module=assistant status=ok op={op} chars={}",
                    text.len()
                );
                text
            }
            Err(err) => {
                warn!(
                    "event=assistant_call module=assistant status=fallback op={op} error_kind={}",
                    err.kind()
                );
                failed.to_string()
            }
        }
    }
}
