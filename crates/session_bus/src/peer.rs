use crate::codec::BusCodec;
use crate::error::BusError;
use crate::handle::BusHandle;
use crate::handler::HandlerRegistry;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs one bus connection until the peer hangs up or `cancel` fires.
///
/// The connection is attached to `handle` for the duration of the call.
/// Outbound messages are written by a dedicated task; inbound messages are
/// dispatched through `handlers` sequentially, in arrival order.
pub async fn serve_peer<S>(
    stream: S,
    handle: BusHandle,
    handlers: Arc<HandlerRegistry>,
    cancel: CancellationToken,
) -> Result<(), BusError>
where
    S: AsyncRead + AsyncWrite + Send + Unpin + 'static,
{
    let (mut sink, mut frames) = Framed::new(stream, BusCodec::new()).split();
    let (outbound, mut queue) = mpsc::unbounded_channel();
    let generation = handle.attach(outbound).await;
    debug!("Bus peer attached (generation {})", generation);

    let writer = tokio::spawn(async move {
        while let Some(message) = queue.recv().await {
            if let Err(e) = sink.send(message).await {
                warn!("Failed to write to bus peer: {}", e);
                break;
            }
        }
    });

    let result = loop {
        tokio::select! {
            _ = cancel.cancelled() => break Ok(()),
            frame = frames.next() => match frame {
                Some(Ok(message)) => handlers.dispatch(message).await,
                Some(Err(e)) => break Err(e),
                None => break Ok(()),
            },
        }
    };

    handle.detach(generation).await;
    writer.abort();
    debug!("Bus peer detached (generation {})", generation);
    result
}
