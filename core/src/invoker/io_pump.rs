use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;

use crate::error::InvokerError;
use crate::util::RingBytes;

pub fn pump_stdout<R>(rd: R, ring: Arc<RingBytes>) -> JoinHandle<Result<u64, InvokerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    pump(rd, ring, "stdout")
}

pub fn pump_stderr<R>(rd: R, ring: Arc<RingBytes>) -> JoinHandle<Result<u64, InvokerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    pump(rd, ring, "stderr")
}

/// Drain one output channel to EOF, retaining the newest bytes in `ring`.
///
/// Each channel gets its own pump task so a worker blocked writing to one
/// pipe can never stall the read of the other.
fn pump<R>(
    mut rd: R,
    ring: Arc<RingBytes>,
    label: &'static str,
) -> JoinHandle<Result<u64, InvokerError>>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; 16 * 1024];
        let mut total = 0u64;

        loop {
            let n = rd.read(&mut buf).await.map_err(|e| InvokerError::StreamIo {
                stream: label,
                source: e,
            })?;
            if n == 0 {
                break;
            }
            ring.push(&buf[..n]);
            total += n as u64;
        }

        Ok(total)
    })
}
