//! Prompts - Remediation analysis and chat instructions

use serde_json::Value;

use crate::report::{ScanReport, Vulnerability};

/// Conversation key used when no report is in context
pub const GENERAL_CONVERSATION: &str = "general";

/// Persona for the chat assistant
pub const CHAT_PERSONA: &str =
    "You are a helpful cybersecurity assistant for a threat analysis dashboard.";

/// Conversation key for a chat about `report` (or the general conversation)
pub fn conversation_key(report: Option<&ScanReport>) -> &str {
    report.map_or(GENERAL_CONVERSATION, |r| r.id.as_str())
}

/// Prompt asking for a remediation plan for one finding
pub fn remediation_prompt(vulnerability: &Vulnerability, report: &ScanReport) -> String {
    let asset = if vulnerability.affected_asset.is_empty() {
        "unknown"
    } else {
        vulnerability.affected_asset.as_str()
    };

    format!(
        "As a senior cybersecurity expert, provide a detailed but concise remediation plan \
for the following vulnerability found during the scan \"{report}\".

Vulnerability: {name}
Severity: {severity}
Description: {description}
Affected Asset: {asset}
Current Remediation Suggestion: {remediation}

Explain the risk in one short paragraph, then give prioritized, actionable steps \
to fix it. Format the response in markdown.",
        report = report.name,
        name = vulnerability.name,
        severity = vulnerability.severity,
        description = vulnerability.description,
        remediation = vulnerability.remediation,
    )
}

/// System instruction opening a chat conversation
///
/// With a report in context, the instruction carries the report as JSON.
/// Attack paths are left out to keep the context small.
pub fn chat_instruction(report: Option<&ScanReport>) -> String {
    let Some(report) = report else {
        return format!(
            "{} Answer questions about security scanning, vulnerabilities and remediation.",
            CHAT_PERSONA
        );
    };

    format!(
        "{} You are currently discussing the scan report \"{}\". \
Use this report data to answer questions:\n{}",
        CHAT_PERSONA,
        report.name,
        report_context(report)
    )
}

fn report_context(report: &ScanReport) -> String {
    let mut value = serde_json::to_value(report).unwrap_or(Value::Null);
    if let Value::Object(map) = &mut value {
        map.remove("attackPaths");
    }
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::seed_reports;

    fn production() -> ScanReport {
        seed_reports().unwrap().remove(0)
    }

    #[test]
    fn remediation_prompt_carries_finding_details() {
        let report = production();
        let vuln = &report.vulnerabilities()[0];
        let prompt = remediation_prompt(vuln, &report);

        assert!(prompt.contains("cybersecurity expert"));
        assert!(prompt.contains(&report.name));
        assert!(prompt.contains(&vuln.name));
        assert!(prompt.contains(&vuln.affected_asset));
        assert!(prompt.contains(&vuln.remediation));
        assert!(prompt.contains("markdown"));
    }

    #[test]
    fn chat_instruction_embeds_report_without_paths() {
        let report = production();
        let instruction = chat_instruction(Some(&report));

        assert!(instruction.starts_with(CHAT_PERSONA));
        assert!(instruction.contains("Production Kubernetes Cluster Scan"));
        assert!(instruction.contains("\"vulnerabilities\""));
        assert!(!instruction.contains("attackPaths"));
        assert!(!instruction.contains("Crown Jewels"));
    }

    #[test]
    fn general_conversation() {
        assert_eq!(conversation_key(None), GENERAL_CONVERSATION);
        assert!(chat_instruction(None).starts_with(CHAT_PERSONA));

        let report = production();
        assert_eq!(conversation_key(Some(&report)), "scan-001");
    }
}
