//! Instruction template for transaction extraction

/// Builds the prompt sent to the model for one document
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a prompt builder for already-truncated document text
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::with_capacity(EXTRACTION_INSTRUCTIONS.len() + self.text.len() + 64);

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        prompt.push_str("Here is the statement text:\n");
        prompt.push_str("---\n");
        prompt.push_str(self.text);
        prompt.push_str("\n---\n");

        prompt
    }
}

/// Keep at most `max_chars` characters of `text`
///
/// Counts Unicode scalar values, so a multi-byte character is never split. Returns the
/// kept prefix and whether anything was dropped.
///
/// # Examples
///
/// ```
/// use tally_extractor::truncate_chars;
///
/// assert_eq!(truncate_chars("héllo", 2), ("hé", true));
/// assert_eq!(truncate_chars("hi", 10), ("hi", false));
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"You are a financial data expert.
Analyze the following bank statement text and extract all transactions.

Return ONLY a raw JSON array. Do not use Markdown formatting.
Each object in the array must have these exact fields:
- "date_time": (String, format "DD-MMM-YYYY")
- "vendor": (String, clean merchant name)
- "amount": (Number, positive float)
- "type": (String, either "credit" or "debit")
- "category": (String, e.g., "Food", "Travel", "Bills", "Transfer")
- "source": (String, guess the bank name or "Unknown")"#;
