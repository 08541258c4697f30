//! Grounding-constrained prompt construction.
//!
//! The prompt instructs the model to answer strictly from the supplied
//! document and to fall back to a fixed sentence when the document does not
//! contain the answer. Grounding is enforced by instruction only; there is
//! no technical guarantee the model complies.

/// Sentence the model is told to reproduce verbatim when the document does
/// not answer the question.
pub const GROUNDING_FALLBACK: &str = "The document does not contain this information.";

/// Builds the prompt sent to the model.
///
/// Pure and total: identical inputs produce identical output, and any pair
/// of strings is accepted, empty ones included. Document and question are
/// inserted verbatim with no escaping; validating non-emptiness is the
/// caller's job. The result is whitespace-trimmed.
pub fn build_prompt(document_text: &str, question: &str) -> String {
    let prompt = format!(
        r#"Answer the user's question strictly using the provided document context.
If the answer is not present, respond exactly with:
"{GROUNDING_FALLBACK}"

Document:
{document_text}

Question:
{question}"#
    );
    prompt.trim().to_string()
}
