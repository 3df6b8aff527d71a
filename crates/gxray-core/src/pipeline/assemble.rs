//! Build the result for one transaction: display fields plus snippets.

use crate::batch::{self, BatchShape};
use crate::capture::Transaction;
use crate::error::FetchError;
use crate::language::SnippetLanguage;
use crate::translate::{SnippetOutcome, Translator};

use super::{BatchSnippet, SnippetResult};

impl SnippetResult {
    /// Display fields of `transaction` with no snippets yet.
    fn display(transaction: &Transaction) -> Self {
        Self {
            request_line: transaction.request_line(),
            method: transaction.method.clone(),
            url: transaction.url.clone(),
            request_body: transaction.request_text().to_string(),
            response_body: transaction.response_text(),
            snippet: SnippetOutcome::Generated(String::new()),
            batch_pairs: Vec::new(),
            batch_snippets: Vec::new(),
        }
    }

    /// Result for a transaction whose processing did not complete.
    pub(crate) fn failed(transaction: &Transaction, err: FetchError) -> Self {
        Self {
            snippet: SnippetOutcome::Failed(err),
            ..Self::display(transaction)
        }
    }
}

/// Translates `transaction` and, for a batch envelope, each of its
/// sub-requests. Blocks on the network; run it on the blocking pool.
pub(crate) fn assemble(
    translator: &Translator,
    language: SnippetLanguage,
    transaction: &Transaction,
) -> SnippetResult {
    let mut result = SnippetResult::display(transaction);

    if let shape @ BatchShape::Batch { .. } = BatchShape::of(transaction) {
        let base = batch::base_url(&transaction.url);
        result.batch_pairs = shape.into_pairs();
        result.batch_snippets = result
            .batch_pairs
            .iter()
            .map(|pair| {
                let request = &pair.request;
                let url = request.absolute_url(base);
                let body = request.body_text();
                let body = (!body.is_empty()).then_some(body.as_str());
                BatchSnippet {
                    id: request.id.clone(),
                    method: request.method.clone(),
                    url: request.url.clone(),
                    snippet: translator.fetch_snippet(language, &request.method, &url, body),
                }
            })
            .collect();
    }

    result.snippet = translator.fetch_snippet(
        language,
        &transaction.method,
        &transaction.url,
        transaction.request_body.as_deref(),
    );
    result
}
