//! Instruction templates for the legal document tasks.
//!
//! Each chunked task has one static template with a single `{document}`
//! placeholder. The chat task has its own system instruction and a template
//! that embeds both the user's question and the whole document.

use serde::{Deserialize, Serialize};

/// System instruction sent with every chunked task.
pub const SYSTEM_INSTRUCTION: &str = "You are a legal expert AI assistant.";

/// Placeholder replaced by the chunk text.
pub const DOCUMENT_PLACEHOLDER: &str = "document";

/// Placeholder replaced by the user's question (chat only).
pub const QUESTION_PLACEHOLDER: &str = "question";

/// Returned by the fail-soft chat boundary when the completion call fails.
pub const CHAT_APOLOGY: &str = "I apologize, but I encountered an error. Could you please rephrase your question or specify what you'd like to know about the document?";

pub const SUMMARY_TEMPLATE: &str = r#"You are an expert legal AI assistant specialized in Serbian law. Your primary task is to create SHORT, HIGH-EFFICIENCY summaries of legal documents. Every summary must be concise and focused only on the most critical information a lawyer needs to know.

CORE REQUIREMENTS:

Maximum length: 600 words total
Focus on actionable information
Prioritize only the most critical points
Use precise, economical language

SUMMARY STRUCTURE:

BASIC INFORMATION (2–3 lines)
Case/Document Number: [Number, Date, Type]
Parties: [Only main parties]
Forum: [Court/Authority]

CRITICAL OVERVIEW (30–40 words)
One short paragraph covering the key issue and current status.

KEY LEGAL ELEMENTS
Primary Legal Issue: [Most important legal question]
Essential Facts:
• [Max 3 bullet points]
Decisive Arguments:
• [Strongest argument for each side]
Key Evidence:
• [Only evidence that determines the case outcome]

OUTCOME & IMPACT (2–3 bullets)
• Decision/Status
• Urgent required action
• Main risk/opportunity

VITAL REFERENCES
• Primary legal provision
• Precedent (if applicable)

WRITING GUIDELINES:
Use short, declarative sentences
Include only information that affects decision-making
Exclude background unless essential
Focus on conclusions rather than explanations
Highlight only time-sensitive elements

Please deliver a short summary of the following document, strictly following the length and format requirements above:
{document}

Always respond in English, regardless of the document language."#;

pub const APPEAL_TEMPLATE: &str = r#"You are a legal assistant specialized in drafting formal appeals based on the provided legal document.
Analyze the document and generate an appeal following the structure below:

1. Header
[NAME OF COURT]
[JURISDICTION]
[Case Number]
[NAME OF APPELLANT], Appellant
vs.
[NAME OF RESPONDENT], Respondent

2. APPEAL / NOTICE OF APPEAL
[Formal notice of appeal]

3. Statement of Jurisdiction
[Explanation of the court’s jurisdiction]

4. Statement of Facts
[Factual background]

5. Issues on Appeal
[List of specific issues being appealed]

6. Argument
[Detailed arguments for each issue]

7. Conclusion
[Requested outcome]

8. Signature and Contact Information
[Signature and details]

9. Certificate of Service
[Proof of service]

Analyze the following document and fill in this structure:
{document}
Always respond in English, regardless of the document language."#;

pub const REVIEW_TEMPLATE: &str = r#"You are an expert in Serbian law, an AI legal analyst with deep knowledge of Serbian contract, commercial and civil law.
Where applicable, follow the guidelines below for specific document types. Create a focused legal review of the document (maximum 750 words). Your goal is to produce a concise, actionable overview that Serbian lawyers can immediately use.

SUMMARY FOR ENFORCEMENT (3–4 sentences max)
- Type of document, purpose, and parties
- Applicable law and jurisdiction
- Key financial or business obligations
- Critical compliance status

HIGH-PRIORITY ANALYSIS
A. Legal Compliance (Top 3 critical issues)
- Compliance problems with Serbian law, referencing specific statutes
- Missing mandatory clauses required by the Serbian Civil Code
- Consumer protection law issues (if applicable)
- EU law implications affecting validity

B. Risk Assessment (Top 3 by severity)
- Business/legal risks with potential impact
- Concerns about enforceability before Serbian courts
- Deviations from Serbian market practice
- Conflicts with recent Supreme Court precedents

ACTION PLAN (maximum 5 points)
- Required amendments for legal compliance
- Specific clause modifications needed
- Additional recommended provisions
- Steps to mitigate risks
- Practical guidance for implementation

REVIEW REQUIREMENTS
- Reference specific Serbian laws, regulations, and case law
- Focus on essential issues, not formatting
- Prioritize problems based on legal/business impact
- Keep the language clear and action-oriented
- Include business-critical EU law implications (when relevant)

FINAL SUMMARY
A 3-sentence conclusion highlighting the most urgent issue requiring immediate attention.

REVIEW PARAMETERS
- Each section must be direct and concise
- Focus on major legal issues, not minor technicalities
- Include only relevant case law references
- Maintain practical business context
- Emphasize any urgent compliance issues

Analyze the following document according to these parameters:
{document}
Always respond in English, regardless of the document language."#;

pub const LAWSUIT_TEMPLATE: &str = r#"You are an AI assistant designed to help Serbian lawyers draft legal complaints and related documents.
Analyze the document and generate a legal complaint following the structure below:

[Name of Court]
[Jurisdiction]
[Case Number]

PLAINTIFF: [Extract from document]
DEFENDANT: [Extract from document]

COMPLAINT

I. INTRODUCTION
[Generate an introduction based on the document]

II. JURISDICTION AND VENUE
[Determine the proper jurisdiction]

III. PARTIES
[Details about the parties extracted from the document]

IV. FACTUAL ALLEGATIONS
[Extract and organize the facts]

V. CAUSES OF ACTION
[Legal grounds for the claim]

VI. DAMAGES
[Specify the damages]

VII. PRAYER FOR RELIEF
[Formulate the requested remedies]

VIII. REQUEST FOR JUDICIAL PANEL
[Standard request]

IX. EXHIBITS
[List supporting evidence]

Analyze the following document and complete the structure:
{document}
Always respond in English, regardless of the document language."#;

pub const LAWSUIT_RESPONSE_TEMPLATE: &str = r#"You are an AI assistant designed to help Serbian lawyers prepare legal answers to lawsuits.
Analyze the document and generate an answer to the complaint using the structure below:

[Name of Court]
[Jurisdiction]
[Case Number]

Defendant: [Extract from document]
Address: [Defendant’s Address]
Phone: [Defendant’s Phone]
Email: [Defendant’s Email]

ANSWER TO COMPLAINT

I. INTRODUCTION
[Generate an introduction based on the document]

II. RESPONSE TO FACTUAL ALLEGATIONS
[Address each allegation made by the plaintiff individually]

III. LEGAL ARGUMENTS
[Legal arguments and counterarguments]

IV. EVIDENCE
[List and describe supporting evidence]

V. REQUEST FOR RELIEF
[Formulate the defendant’s requests]

VI. EXHIBITS
[List the exhibits]

Analyze the following document and complete the structure:
{document}
Always respond in English, regardless of the document language."#;

pub const CONTRACT_ANALYSIS_TEMPLATE: &str = r#"You are a legal contract analyst specialized in Serbian law.
Please analyze the following contract according to these criteria:

1. Basic Elements of the Contract:
   - Offer and acceptance
   - Consideration and intent
   - Capacity to contract
   - Compliance with the Law on Obligations (Zakon o obligacionim odnosima)

2. Key Clauses:
   - Identification and explanation of important provisions
   - Assessment of clarity and enforceability
   - Recommendations for improvement
   - Potential legal ambiguities

3. Legal Compliance:
   - Verification of compliance with Serbian laws
   - References to relevant regulations
   - Alignment with case law
   - Regulatory concerns

4. Risk Assessment:
   - Legal risks
   - Financial risks
   - Operational risks
   - Recommendations for mitigation

5. Special Provisions:
   - Choice of law and jurisdiction
   - International aspects (if any)
   - Sector-specific requirements
   - Data protection and confidentiality

6. Recommendations for Improvement:
   - Specific proposed amendments
   - Additional protective measures
   - Alignment with best practices
   - Legal optimization

Analyze the following contract:
{document}
Always respond in English, regardless of the document language."#;

pub const CHAT_SYSTEM_INSTRUCTION: &str = r#"You are the "Legal Chat Helper Agent," designed to assist users in working with legal documents.
Your role is to:
- Guide users through document-related tasks
- Explain content in simple, easy-to-understand language
- Help interpret specific sections of documents
- Suggest relevant actions (summaries, appeals, reviews, etc.)
- Stay neutral and professional
- Provide accurate, helpful responses

When responding:
1. First understand if the user needs:
   - An explanation of the document
   - Help editing or modifying the document
   - Guidance on using other agents
   - General legal questions

2. Provide clear, structured guidance
3. Suggest practical next steps
4. Base your response strictly on the provided document
Always respond in English, regardless of the document language."#;

pub const CHAT_TEMPLATE: &str = r#"Based on this legal document, please help with the following:

User Question: {question}

Document Content:
---
{document}
---

Please provide a helpful and detailed response while maintaining professional legal tone.
Always respond in English, regardless of the document language."#;

/// A chunked document-processing task.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Task {
    /// Short structured summary (at most 600 words)
    Summary,
    /// Formal appeal draft
    Appeal,
    /// Focused legal review (at most 750 words)
    Review,
    /// Complaint draft
    Lawsuit,
    /// Answer to a complaint
    #[value(alias = "lawsuit_response")]
    #[serde(alias = "lawsuit_response")]
    LawsuitResponse,
    /// Six-section contract analysis
    #[value(aliases = ["contract", "contract_analysis"])]
    #[serde(alias = "contract", alias = "contract_analysis")]
    ContractAnalysis,
}

impl Task {
    /// Every chunked task, in display order.
    pub fn all() -> &'static [Task] {
        &[
            Task::Summary,
            Task::Appeal,
            Task::Review,
            Task::Lawsuit,
            Task::LawsuitResponse,
            Task::ContractAnalysis,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Task::Summary => "summary",
            Task::Appeal => "appeal",
            Task::Review => "review",
            Task::Lawsuit => "lawsuit",
            Task::LawsuitResponse => "lawsuit-response",
            Task::ContractAnalysis => "contract-analysis",
        }
    }

    /// Parse a task name. Underscores are accepted in place of hyphens.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "summary" => Some(Task::Summary),
            "appeal" => Some(Task::Appeal),
            "review" => Some(Task::Review),
            "lawsuit" => Some(Task::Lawsuit),
            "lawsuit-response" => Some(Task::LawsuitResponse),
            "contract-analysis" | "contract" => Some(Task::ContractAnalysis),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Task::Summary => "Structured summary of at most 600 words",
            Task::Appeal => "Structured appeal draft",
            Task::Review => "Structured legal review of at most 750 words",
            Task::Lawsuit => "Structured complaint draft",
            Task::LawsuitResponse => "Structured answer-to-complaint draft",
            Task::ContractAnalysis => "Six-section contract analysis",
        }
    }

    /// The instruction template for this task.
    pub fn template(&self) -> &'static str {
        match self {
            Task::Summary => SUMMARY_TEMPLATE,
            Task::Appeal => APPEAL_TEMPLATE,
            Task::Review => REVIEW_TEMPLATE,
            Task::Lawsuit => LAWSUIT_TEMPLATE,
            Task::LawsuitResponse => LAWSUIT_RESPONSE_TEMPLATE,
            Task::ContractAnalysis => CONTRACT_ANALYSIS_TEMPLATE,
        }
    }

    /// Prefix of the error string returned when the task fails.
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Task::Summary => "Error generating summary",
            Task::Appeal => "Error generating appeal",
            Task::Review => "Error generating review",
            Task::Lawsuit => "Error generating lawsuit",
            Task::LawsuitResponse => "Error generating lawsuit response",
            Task::ContractAnalysis => "Error analyzing contract",
        }
    }

    /// Label used in log lines ("summary agent", "contract analysis agent").
    pub fn agent_label(&self) -> &'static str {
        match self {
            Task::Summary => "summary agent",
            Task::Appeal => "appeal agent",
            Task::Review => "review agent",
            Task::Lawsuit => "lawsuit agent",
            Task::LawsuitResponse => "lawsuit response agent",
            Task::ContractAnalysis => "contract analysis agent",
        }
    }

    /// Render this task's template around one chunk.
    pub fn render(&self, chunk: &str) -> String {
        render(self.template(), &[(DOCUMENT_PLACEHOLDER, chunk)])
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Render the chat user instruction around a question and the full document.
pub fn render_chat(document: &str, question: &str) -> String {
    render(
        CHAT_TEMPLATE,
        &[
            (QUESTION_PLACEHOLDER, question),
            (DOCUMENT_PLACEHOLDER, document),
        ],
    )
}

/// Substitute `{name}` placeholders in a single pass over the template.
///
/// Substituted values are copied verbatim and never rescanned, so a value
/// that itself contains `{document}` comes through untouched. Braces that do
/// not name a known variable are kept as-is.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let matched = vars.iter().find(|(name, _)| {
            tail.starts_with(*name) && tail[name.len()..].starts_with('}')
        });
        match matched {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);

    out
}
