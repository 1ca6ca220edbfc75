use anyhow::{bail, Result};
use futures::{stream, Stream};
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use super::signal::BrowserSignal;

/// Browsers cap native-messaging frames at 1 MiB in the host direction,
/// anything larger means the stream is desynchronized.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Reads one native-messaging frame: a little-endian u32 length prefix
/// followed by that many bytes of utf-8 json. `None` on a clean EOF.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }

    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        bail!("Refusing a {len} byte frame, the bridge must be desynchronized");
    }

    let mut frame = vec![0u8; len];
    reader.read_exact(&mut frame).await?;
    Ok(Some(frame))
}

/// Writes one message with the native-messaging length prefix and flushes it,
/// the browser side reads frame by frame.
pub async fn write_message<W: AsyncWrite + Unpin, T: Serialize>(
    writer: &mut W,
    message: &T,
) -> Result<()> {
    let body = serde_json::to_vec(message)?;
    if body.len() > MAX_FRAME_LEN {
        bail!("Outbound message of {} bytes exceeds the frame limit", body.len());
    }

    writer.write_all(&(body.len() as u32).to_le_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Turns a frame source into a stream of parsed signals. Frames that aren't
/// valid signals are dropped with a warning, a browser update must not be
/// able to wedge the tracker. The stream ends on EOF.
pub fn signal_stream<R: AsyncRead + Unpin>(
    reader: R,
) -> impl Stream<Item = Result<BrowserSignal>> {
    stream::unfold(reader, |mut reader| async move {
        loop {
            match read_frame(&mut reader).await {
                Ok(Some(frame)) => match serde_json::from_slice::<BrowserSignal>(&frame) {
                    Ok(signal) => return Some((Ok(signal), reader)),
                    Err(e) => {
                        warn!(
                            "Skipping an unparsable frame {:?}: {e}",
                            String::from_utf8_lossy(&frame)
                        );
                    }
                },
                Ok(None) => return None,
                Err(e) => return Some((Err(e), reader)),
            }
        }
    })
}
