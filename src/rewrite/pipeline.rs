//! Selector-bound mutators applied in one streaming pass.
//!
//! The rewriter is built from `Send` handler types, so a streaming rewrite
//! lives inside the response body and is driven by whichever task polls it:
//!
//! ```text
//! source stream → RewriteStream::poll_next → rewriter.write → sink → output chunk
//! ```
//!
//! Nothing runs between polls. A client that stops reading stops the
//! upstream read too, and dropping the body drops the rewriter.

use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{ready, Context, Poll};

use bytes::{Bytes, BytesMut};
use futures_util::stream::{BoxStream, Stream, StreamExt, TryStreamExt};
use lol_html::send::{HtmlRewriter, Settings};
use lol_html::{element, OutputSink, Selector};

use crate::rewrite::{Mutator, RewriteError};

type ChunkResult = Result<Bytes, RewriteError>;

#[derive(Debug, Clone)]
struct Binding {
    selector: String,
    mutator: Mutator,
}

/// An ordered list of `(selector, mutator)` bindings.
///
/// Every element matching a selector receives each mutator bound to that
/// selector, in registration order. The rewriter itself is created per
/// transformation; nothing is shared between documents.
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    bindings: Vec<Binding>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a mutator to a CSS selector.
    ///
    /// The selector is validated here so a bad one fails at setup.
    pub fn on(mut self, selector: &str, mutator: Mutator) -> Result<Self, RewriteError> {
        selector
            .parse::<Selector>()
            .map_err(|e| RewriteError::Selector {
                selector: selector.to_string(),
                reason: e.to_string(),
            })?;

        self.bindings.push(Binding {
            selector: selector.to_string(),
            mutator,
        });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Rewrite a complete in-memory document.
    pub fn transform_bytes(&self, input: &[u8]) -> Result<Vec<u8>, RewriteError> {
        let mut output = Vec::with_capacity(input.len());
        let mut rewriter = HtmlRewriter::new(settings(&self.bindings), |chunk: &[u8]| {
            output.extend_from_slice(chunk)
        });
        rewriter.write(input).map_err(rewriting_error)?;
        rewriter.end().map_err(rewriting_error)?;
        Ok(output)
    }

    /// Rewrite a document as it streams in.
    ///
    /// Lazy: the source is read only while the returned stream is polled,
    /// and each source chunk yields whatever output it completes.
    pub fn apply<S, E>(&self, source: S) -> RewriteStream
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        let sink = ChunkSink::default();
        let rewriter = HtmlRewriter::new(settings(&self.bindings), sink.clone());

        RewriteStream {
            source: source
                .map_err(|e| RewriteError::Source(Box::new(e)))
                .boxed(),
            rewriter: Some(rewriter),
            sink,
        }
    }
}

/// Output collected by the rewriter between two polls.
#[derive(Clone, Default)]
struct ChunkSink(Arc<Mutex<BytesMut>>);

impl ChunkSink {
    fn take(&self) -> Bytes {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .split()
            .freeze()
    }
}

impl OutputSink for ChunkSink {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(chunk);
    }
}

/// Rewritten output of [`TransformPipeline::apply`].
///
/// Ends after the first error.
pub struct RewriteStream {
    source: BoxStream<'static, ChunkResult>,
    // `None` once the document is finished or has failed
    rewriter: Option<HtmlRewriter<'static, ChunkSink>>,
    sink: ChunkSink,
}

impl std::fmt::Debug for RewriteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewriteStream")
            .field("finished", &self.rewriter.is_none())
            .finish_non_exhaustive()
    }
}

// No field is structurally pinned.
impl Unpin for RewriteStream {}

impl Stream for RewriteStream {
    type Item = ChunkResult;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            let Some(rewriter) = this.rewriter.as_mut() else {
                return Poll::Ready(None);
            };

            match ready!(this.source.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => {
                    if let Err(e) = rewriter.write(&chunk) {
                        tracing::warn!(error = %e, "Streaming rewrite failed");
                        this.rewriter = None;
                        return Poll::Ready(Some(Err(rewriting_error(e))));
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Source stream failed mid-document");
                    this.rewriter = None;
                    return Poll::Ready(Some(Err(e)));
                }
                None => {
                    if let Some(rewriter) = this.rewriter.take() {
                        if let Err(e) = rewriter.end() {
                            tracing::warn!(error = %e, "Failed to finish rewrite");
                            return Poll::Ready(Some(Err(rewriting_error(e))));
                        }
                    }
                }
            }

            let output = this.sink.take();
            if !output.is_empty() {
                return Poll::Ready(Some(Ok(output)));
            }
        }
    }
}

fn settings(bindings: &[Binding]) -> Settings<'static, 'static> {
    Settings {
        element_content_handlers: bindings
            .iter()
            .map(|binding| {
                let mutator = binding.mutator.clone();
                element!(binding.selector.as_str(), move |el| mutator.apply(el))
            })
            .collect(),
        ..Settings::new_send()
    }
}

fn rewriting_error(e: impl std::fmt::Display) -> RewriteError {
    RewriteError::Rewrite(e.to_string())
}
