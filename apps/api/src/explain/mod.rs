// Career-fit explanation
// A one-shot advisory call: why does this résumé suit a given job title?

pub mod explainer;
pub mod handlers;
pub mod prompts;
