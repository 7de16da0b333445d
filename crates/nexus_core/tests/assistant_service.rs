use nexus_core::assistant::{
    AssistantError, AssistantResult, AssistantService, CrmSnapshot, DealAnalysis,
    GenerateRequest, GenerativeTransport, ANALYSIS_FAILED, EMAIL_EMPTY, EMAIL_FAILED,
    QUERY_EMPTY, QUERY_FAILED, SUMMARY_EMPTY, SUMMARY_FAILED,
};
use nexus_core::seed;
use nexus_core::store::slots::MemorySlotStorage;
use nexus_core::store::Store;
use nexus_core::CrmController;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Replies in order and records every request.
#[derive(Default)]
struct ScriptedTransport {
    replies: RefCell<VecDeque<AssistantResult<String>>>,
    requests: RefCell<Vec<GenerateRequest>>,
}

impl ScriptedTransport {
    fn replying(replies: Vec<AssistantResult<String>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requests: RefCell::default(),
        }
    }
}

impl GenerativeTransport for ScriptedTransport {
    fn generate(&self, request: &GenerateRequest) -> AssistantResult<String> {
        self.requests.borrow_mut().push(request.clone());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(AssistantError::EmptyResponse))
    }
}

fn every_error_kind() -> Vec<AssistantError> {
    vec![
        AssistantError::Timeout,
        AssistantError::Network {
            message: "connection refused".to_string(),
            retryable: true,
        },
        AssistantError::Http { status: 503 },
        AssistantError::MissingCredentials,
        AssistantError::EmptyResponse,
        AssistantError::Parse("bad json".to_string()),
    ]
}

#[test]
fn query_embeds_snapshot_and_returns_text() {
    let session =
        CrmController::bootstrap(Store::new(MemorySlotStorage::new())).unwrap();
    let assistant = AssistantService::new(ScriptedTransport::replying(vec![Ok(
        "**Avengers Global Rollout** is your largest open deal.".to_string(),
    )]));

    let answer = assistant.answer_query("What is my biggest deal?", &session.snapshot());

    assert!(answer.contains("Avengers Global Rollout"));
    let requests = assistant.transport().requests.borrow();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].json_response);
    assert!(requests[0].prompt.contains("What is my biggest deal?"));
    assert!(requests[0].prompt.contains("\"closeDate\""));
    assert!(requests[0].prompt.contains("Sarah Sales"));
}

#[test]
fn query_falls_back_on_empty_and_errors() {
    let state = nexus_core::AppState {
        contacts: seed::contacts(),
        deals: seed::deals(),
        tasks: seed::tasks(),
        activities: seed::activities(),
        notifications: Vec::new(),
        profile: seed::default_profile(),
    };
    let snapshot = CrmSnapshot::from_state(&state);

    let empty = AssistantService::new(ScriptedTransport::replying(vec![Ok("  ".to_string())]));
    assert_eq!(empty.answer_query("anything?", &snapshot), QUERY_EMPTY);

    for err in every_error_kind() {
        let failing = AssistantService::new(ScriptedTransport::replying(vec![Err(err)]));
        assert_eq!(failing.answer_query("anything?", &snapshot), QUERY_FAILED);
    }
}

#[test]
fn deal_analysis_tolerates_code_fences() {
    let assistant = AssistantService::new(ScriptedTransport::replying(vec![Ok(
        "```json\n{\"analysis\": \"Security review is the main risk.\", \"recommendedAction\": \"Send the SOC 2 report.\"}\n```"
            .to_string(),
    )]));
    let deal = &seed::deals()[0];
    let contact = &seed::contacts()[0];

    let analysis = assistant.analyze_deal(deal, contact);

    assert_eq!(
        analysis,
        DealAnalysis {
            analysis: "Security review is the main risk.".to_string(),
            recommended_action: "Send the SOC 2 report.".to_string(),
        }
    );
    assert!(assistant.transport().requests.borrow()[0].json_response);
}

#[test]
fn deal_analysis_falls_back_on_malformed_empty_or_failed_replies() {
    let deal = &seed::deals()[1];
    let contact = &seed::contacts()[1];
    let mut replies: Vec<AssistantResult<String>> = vec![
        Ok("not json at all".to_string()),
        Ok("```json\n```".to_string()),
        Ok("{\"recommendedAction\": \"missing analysis\"}".to_string()),
    ];
    replies.extend(every_error_kind().into_iter().map(Err));

    for reply in replies {
        let assistant = AssistantService::new(ScriptedTransport::replying(vec![reply]));
        let analysis = assistant.analyze_deal(deal, contact);
        assert_eq!(analysis, DealAnalysis::fallback());
        assert_eq!(analysis.analysis, ANALYSIS_FAILED);
    }
}

#[test]
fn deal_analysis_keeps_reply_without_recommended_action() {
    let assistant = AssistantService::new(ScriptedTransport::replying(vec![Ok(
        "{\"analysis\": \"Champion left the account.\"}".to_string(),
    )]));

    let analysis = assistant.analyze_deal(&seed::deals()[2], &seed::contacts()[2]);

    assert_eq!(analysis.analysis, "Champion left the account.");
    assert_eq!(analysis.recommended_action, "");
}

#[test]
fn email_draft_fallbacks() {
    let contact = &seed::contacts()[2];

    let ok = AssistantService::new(ScriptedTransport::replying(vec![Ok(
        "Hi Carol, ...".to_string(),
    )]));
    assert_eq!(ok.generate_email_draft(contact, "follow up"), "Hi Carol, ...");
    let prompt = &ok.transport().requests.borrow()[0].prompt;
    assert!(prompt.contains("Carol Danvers"));
    assert!(prompt.contains("follow up"));

    let empty = AssistantService::new(ScriptedTransport::replying(vec![Ok(String::new())]));
    assert_eq!(empty.generate_email_draft(contact, "follow up"), EMAIL_EMPTY);

    for err in every_error_kind() {
        let failing = AssistantService::new(ScriptedTransport::replying(vec![Err(err)]));
        assert_eq!(failing.generate_email_draft(contact, "follow up"), EMAIL_FAILED);
    }
}

#[test]
fn contact_summary_fallbacks() {
    let contact = &seed::contacts()[0];
    let notes = vec![
        "Sent proposal v2".to_string(),
        "Security review pending".to_string(),
    ];

    let ok = AssistantService::new(ScriptedTransport::replying(vec![Ok(
        "<ul><li>Proposal sent</li></ul>".to_string(),
    )]));
    assert_eq!(
        ok.summarize_contact_history(contact, &notes),
        "<ul><li>Proposal sent</li></ul>"
    );
    assert!(ok.transport().requests.borrow()[0]
        .prompt
        .contains("Sent proposal v2\nSecurity review pending"));

    let empty = AssistantService::new(ScriptedTransport::replying(vec![Ok(String::new())]));
    assert_eq!(empty.summarize_contact_history(contact, &notes), SUMMARY_EMPTY);

    let failing = AssistantService::new(ScriptedTransport::replying(vec![Err(
        AssistantError::Timeout,
    )]));
    assert_eq!(failing.summarize_contact_history(contact, &notes), SUMMARY_FAILED);
}
