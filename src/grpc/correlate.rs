//! Positional correlation for bidirectional-stream exchanges.
//!
//! The channel does not label responses with a request identifier; pairing
//! is purely positional, the i-th read corresponds to the i-th write. One
//! drain loop backs every streaming verb, parameterized by the pre-encoded
//! outbound burst and a per-response decoder.

use crate::{Error, Result};
use async_trait::async_trait;
use futures::stream::Iter;
use std::future::Future;
use std::vec;

/// Read side of a bidirectional exchange.
#[async_trait]
pub(crate) trait MessageSource<Resp> {
    /// Next response, or `None` once the server closed the stream.
    async fn recv(&mut self) -> Result<Option<Resp>>;
}

#[async_trait]
impl<Resp: Send> MessageSource<Resp> for tonic::Streaming<Resp> {
    async fn recv(&mut self) -> Result<Option<Resp>> {
        Ok(self.message().await?)
    }
}

/// The fully materialized outbound burst handed to a streaming stub.
pub(crate) type Burst<Req> = Iter<vec::IntoIter<Req>>;

/// Write the whole burst, then drain exactly one response per request, in
/// request order. Fails with [`Error::StreamTruncated`] when the stream ends
/// early; never reads past the expected count.
pub(crate) async fn exchange<Req, Resp, Out, S, Fut, Source, D>(
    requests: Vec<Req>,
    send: S,
    mut decode: D,
) -> Result<Vec<Out>>
where
    S: FnOnce(Burst<Req>) -> Fut,
    Fut: Future<Output = Result<Source>>,
    Source: MessageSource<Resp>,
    D: FnMut(Resp) -> Out,
{
    let expected = requests.len();
    tracing::debug!(expected, "writing streaming burst");
    let mut source = send(futures::stream::iter(requests)).await?;
    let mut collected = Vec::with_capacity(expected);
    while collected.len() < expected {
        match source.recv().await? {
            Some(response) => collected.push(decode(response)),
            None => {
                return Err(Error::StreamTruncated {
                    received: collected.len(),
                    expected,
                })
            }
        }
    }
    Ok(collected)
}
