//! Prompt construction for intelligence brief generation.
//!
//! The template instructs the model to emit the five canonical sections
//! with numbered ATX headings. The section classifier downstream does not
//! depend on the model honoring this (heading aliases absorb rephrasing),
//! but a compliant response classifies cleanly into all five buckets.

use prepcall_core::CreateBriefRequest;

/// System message for brief generation.
pub const BRIEF_SYSTEM_PROMPT: &str = "You are a presales intelligence analyst \
who generates comprehensive, actionable meeting briefs.";

/// Build the user prompt for one brief request.
///
/// `enrichment` is an opaque block of external signal (company data, recent
/// news) gathered ahead of generation; when present it is appended as
/// context the model should weigh, when absent the prompt works standalone.
pub fn build_brief_prompt(request: &CreateBriefRequest, enrichment: Option<&str>) -> String {
    let mut context = format!("Company: {}\n", request.company_name);
    if let Some(date) = request.meeting_date {
        context.push_str(&format!("Meeting Date: {}\n", date.format("%Y-%m-%d")));
    }
    if let Some(ref attendees) = request.attendees {
        context.push_str(&format!("Attendees: {}\n", attendees));
    }

    let mut prompt = format!(
        "You are a presales intelligence analyst. Generate a comprehensive brief \
for an upcoming meeting.

{context}
Generate a detailed intelligence brief with the following sections:

# 1. COMPANY CONTEXT
- Brief company overview
- Recent news and developments
- Business priorities and challenges
- Industry position

# 2. ATTENDEE ANALYSIS (if attendees provided)
- Role and background of each attendee
- Likely priorities and concerns
- Best approach for engagement

# 3. TECH STACK & SECURITY POSTURE
- Known technologies in use
- Potential security gaps or vulnerabilities
- Modernization needs

# 4. COMPETITIVE LANDSCAPE
- Current vendors/solutions they likely use
- Competitive positioning
- Key differentiators to emphasize

# 5. SUGGESTED QUESTIONS & TALKING POINTS
- Discovery questions to ask
- Likely objections and how to address them
- Value propositions to emphasize
- Topics to avoid

Format the output as clear, scannable markdown under those headings. Be \
specific and actionable. Focus on what a presales engineer needs to know to \
run an effective technical discovery call."
    );

    if let Some(enrichment) = enrichment.map(str::trim).filter(|e| !e.is_empty()) {
        prompt.push_str(&format!(
            "\n\nRecent external signal gathered about the company (may be \
incomplete; weigh it where relevant):\n\n{}",
            enrichment
        ));
    }

    prompt
}
