//! Prompt builders and response cleanup.

use crate::model::contact::Contact;
use crate::model::deal::Deal;
use once_cell::sync::Lazy;
use regex::Regex;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_-]*").expect("code fence pattern is valid"));

/// Removes Markdown code fences (with or without a language tag) and trims.
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw, "").trim().to_string()
}

pub fn answer_query(query: &str, snapshot_json: &str) -> String {
    format!(
        "You are Nexus, an assistant embedded in a sales CRM.\n\
         Answer the user's question using only the CRM data below.\n\
         Be concise and use Markdown for lists or emphasis.\n\n\
         CRM data (JSON):\n{snapshot_json}\n\n\
         Question: {query}\n"
    )
}

pub fn analyze_deal(deal: &Deal, contact: &Contact) -> String {
    format!(
        "Analyze the following sales deal:\n\
         Deal Title: {title}\n\
         Amount: ${amount}\n\
         Stage: {stage}\n\
         Current Probability: {probability}%\n\
         Contact: {name} ({position} at {company})\n\
         Contact Notes: {notes}\n\n\
         Provide a brief risk analysis (2-3 sentences) and one concrete recommended next step to move the deal forward.\n\
         Return the response as a JSON object with keys \"analysis\" and \"recommendedAction\".\n\
         Do not use Markdown formatting for the JSON.\n",
        title = deal.title,
        amount = deal.amount,
        stage = deal.stage,
        probability = deal.probability,
        name = contact.full_name(),
        position = contact.position,
        company = contact.company,
        notes = contact.notes,
    )
}

pub fn email_draft(contact: &Contact, context: &str) -> String {
    format!(
        "You are an expert sales representative. Write a professional, personalized cold email to {name}, \
         who is the {position} at {company}.\n\n\
         Context for the email: {context}\n\n\
         Keep it concise (under 150 words), persuasive, and professional.\n\
         Do not include subject lines or placeholders like [Your Name]; return only the body text.\n",
        name = contact.full_name(),
        position = contact.position,
        company = contact.company,
    )
}

pub fn contact_summary(contact: &Contact, notes: &[String]) -> String {
    format!(
        "Summarize the relationship status with {name} from {company}.\n\
         Based on these notes/activities:\n{notes}\n\n\
         Provide a bulleted summary of key points in HTML format (using <ul> and <li>).\n",
        name = contact.full_name(),
        company = contact.company,
        notes = notes.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::{analyze_deal, strip_code_fences};
    use crate::seed;

    #[test]
    fn strips_tagged_and_bare_fences() {
        assert_eq!(
            strip_code_fences("```json\n{\"analysis\":\"a\"}\n```"),
            "{\"analysis\":\"a\"}"
        );
        assert_eq!(strip_code_fences("```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("  {\"x\":1} "), "{\"x\":1}");
    }

    #[test]
    fn deal_prompt_carries_deal_and_contact_fields() {
        let deal = &seed::deals()[0];
        let contact = &seed::contacts()[0];
        let prompt = analyze_deal(deal, contact);
        assert!(prompt.contains(&deal.title));
        assert!(prompt.contains("Stage: Negotiation"));
        assert!(prompt.contains(&contact.company));
        assert!(prompt.contains("recommendedAction"));
    }
}
