// Career-fit explanation prompt templates.

pub const EXPLAIN_SYSTEM: &str = "You are a helpful AI career coach.";

pub const EXPLAIN_PROMPT_TEMPLATE: &str = "Given the resume: {resume}...\n\n\
Explain why this person is suitable for the job title: '{job_title}'.\n\
Respond in 2-3 sentences in professional English.";
